//! Data models
//!
//! Shared between the server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod admin;
pub mod order;
pub mod product;
pub mod promotion;
pub mod user;

// Re-exports
pub use admin::*;
pub use order::*;
pub use product::*;
pub use promotion::*;
pub use user::*;

/// Map a stored status flag to its API label (1 = active)
pub fn status_label(status: i64) -> &'static str {
    if status == 1 { "active" } else { "inactive" }
}

/// Parse an API status label into the stored flag
pub fn status_flag(label: &str) -> Option<i64> {
    match label {
        "active" => Some(1),
        "inactive" => Some(0),
        _ => None,
    }
}
