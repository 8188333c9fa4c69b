//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 业务时区下的今天
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// N 天前的零点 → Unix millis (业务时区)
pub fn days_ago_start_millis(days: i64, tz: Tz) -> i64 {
    let date = today(tz) - Duration::days(days);
    day_start_millis(date, tz)
}

/// N 个月前的月初零点 → Unix millis (业务时区)
///
/// 按日历月回退，不是固定 30 天。
pub fn months_ago_start_millis(months: u32, tz: Tz) -> i64 {
    let today = today(tz);
    let total = today.year() * 12 + today.month0() as i32 - months as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12));
    let first = NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1).unwrap_or(today);
    day_start_millis(first, tz)
}

/// 解析日期时间字符串 → Unix millis
///
/// 依次尝试 RFC3339、`YYYY-MM-DD HH:MM:SS` (业务时区)、`YYYY-MM-DD` (当日零点)。
pub fn parse_datetime_millis(value: &str, tz: Tz) -> AppResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive
            .and_local_timezone(tz)
            .latest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| naive.and_utc().timestamp_millis()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day_start_millis(date, tz));
    }
    Err(AppError::validation(format!(
        "Invalid datetime format: {}",
        value
    )))
}

/// Unix millis → `YYYY-MM-DD` (业务时区)
pub fn format_day(millis: i64, tz: Tz) -> String {
    millis_to_tz(millis, tz).format("%Y-%m-%d").to_string()
}

/// Unix millis → `YYYY-MM` (业务时区)
pub fn format_month(millis: i64, tz: Tz) -> String {
    millis_to_tz(millis, tz).format("%Y-%m").to_string()
}

fn millis_to_tz(millis: i64, tz: Tz) -> DateTime<Tz> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
        .with_timezone(&tz)
}
