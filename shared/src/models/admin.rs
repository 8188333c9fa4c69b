//! Admin Model

use serde::{Deserialize, Serialize};

/// Admin role with full management rights, protected from modification
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
/// Default admin role
pub const ROLE_ADMIN: &str = "admin";

/// Admin entity (管理员), full DB row including the password hash.
///
/// Never serialized to clients; use [`AdminResponse`] for API output.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: i64,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Admin response (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AdminResponse {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: i64,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

impl From<Admin> for AdminResponse {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            username: a.username,
            name: a.name,
            role: a.role,
            phone: a.phone,
            email: a.email,
            status: a.status,
            last_login: a.last_login,
            created_at: a.created_at,
        }
    }
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreate {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Update admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
