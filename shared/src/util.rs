/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an order number from the current timestamp.
///
/// Format: `ORD<unix millis>`, e.g. `ORD1755772800000`. Uniqueness is
/// backed by the UNIQUE index on `orders.order_no`; a same-millisecond
/// collision surfaces as a duplicate error instead of a silent overwrite.
pub fn generate_order_no() -> String {
    format!("ORD{}", now_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        let ms = now_millis();
        // 2024-01-01 as a sanity lower bound
        assert!(ms > 1_704_067_200_000);
    }

    #[test]
    fn test_generate_order_no_format() {
        let no = generate_order_no();
        assert!(no.starts_with("ORD"));
        assert!(no[3..].chars().all(|c| c.is_ascii_digit()));
        assert!(no.len() > 10);
    }
}
