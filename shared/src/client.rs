//! Client-related types shared between server and frontend
//!
//! Common request/response types used in API communication.

use serde::{Deserialize, Serialize};

use crate::models::{AdminResponse, UserResponse};

// Re-export ApiResponse from the error module
pub use crate::error::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Login response data; `token` carries the `Bearer ` prefix so clients
/// can use it as the Authorization header value directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Admin login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub admin: AdminResponse,
    pub token: String,
}

/// Authenticated identity echoed by token verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
}
