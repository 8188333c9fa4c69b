//! User Model

use serde::{Deserialize, Serialize};

/// User entity (会员用户), full DB row including the password hash.
///
/// Never serialized to clients; use [`UserResponse`] for API output.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub balance: f64,
    pub points: i64,
    pub status: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User response (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub balance: f64,
    pub points: i64,
    pub status: i64,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            phone: u.phone,
            email: u.email,
            balance: u.balance,
            points: u.points,
            status: u.status,
            created_at: u.created_at,
        }
    }
}

/// Create user payload (registration and admin-side creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Update user payload (contact fields only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
}
