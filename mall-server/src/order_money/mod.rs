//! Money calculation utilities using rust_decimal for precision
//!
//! Order payloads carry monetary values as `f64` on the wire. Everything in
//! here converts to `Decimal` first, does the arithmetic, and only converts
//! back to `f64` at the storage/serialization edge.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};
use shared::models::order::{OrderCreate, OrderItemInput};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i64 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::OrderItemInvalid,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

/// Validate a single order line before it reaches the database.
pub fn validate_order_item(item: &OrderItemInput) -> Result<(), AppError> {
    require_finite(item.price, "price")?;
    if item.price <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::OrderItemInvalid,
            format!("price must be positive, got {}", item.price),
        ));
    }
    if item.price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::OrderItemInvalid,
            format!(
                "price exceeds maximum allowed ({}), got {}",
                MAX_PRICE, item.price
            ),
        ));
    }

    if item.quantity <= 0 {
        return Err(AppError::with_message(
            ErrorCode::OrderItemInvalid,
            format!("quantity must be positive, got {}", item.quantity),
        ));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::OrderItemInvalid,
            format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, item.quantity
            ),
        ));
    }

    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the boundary.
/// If NaN/Infinity somehow reaches here, logs an error and returns ZERO
/// to avoid silent data corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with max input ≤ 1_000_000 (validated at boundary)
        // is always within f64 representable range (~1.8e308)
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Sum order lines (price × quantity per line) with precise arithmetic.
pub fn items_total(items: &[OrderItemInput]) -> Decimal {
    let total: Decimal = items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum();

    total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a whole order payload before creation.
///
/// Checks that the order has at least one line, every line passes
/// [`validate_order_item`], and the declared `total_amount` matches the
/// recomputed item sum within [`MONEY_TOLERANCE`].
pub fn validate_order(data: &OrderCreate) -> Result<(), AppError> {
    if data.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    for item in &data.items {
        validate_order_item(item)?;
    }

    if !data.total_amount.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::OrderTotalMismatch,
            format!(
                "total_amount must be a finite number, got {}",
                data.total_amount
            ),
        ));
    }

    let computed = items_total(&data.items);
    let declared = to_decimal(data.total_amount);
    if (computed - declared).abs() >= MONEY_TOLERANCE {
        return Err(AppError::with_message(
            ErrorCode::OrderTotalMismatch,
            format!(
                "total_amount {} does not match item sum {}",
                data.total_amount,
                to_f64(computed)
            ),
        )
        .with_detail("declared", data.total_amount)
        .with_detail("computed", to_f64(computed)));
    }

    Ok(())
}
