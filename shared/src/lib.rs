//! Shared types for the mall backend
//!
//! Common types used across the workspace including HTTP types,
//! error types, response structures, and domain models.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Error system re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
