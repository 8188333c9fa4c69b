//! Promotion Model

use serde::{Deserialize, Serialize};

/// Promotion entity (促销活动)
///
/// `start_time` / `end_time` are unix millis. The `active` label is
/// derived from the current time at read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Promotion {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub promotion_type: String,
    pub start_time: i64,
    pub end_time: i64,
    pub discount_value: Option<f64>,
    pub min_amount: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Promotion {
    /// Whether the promotion window contains the given instant
    pub fn is_active_at(&self, now_millis: i64) -> bool {
        self.start_time <= now_millis && now_millis <= self.end_time
    }
}

/// Promotion view with the computed status label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionView {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub promotion_type: String,
    pub start_time: i64,
    pub end_time: i64,
    pub discount_value: Option<f64>,
    pub min_amount: Option<f64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PromotionView {
    /// Render a promotion with its status computed at `now_millis`
    pub fn at(p: Promotion, now_millis: i64) -> Self {
        let status = if p.is_active_at(now_millis) {
            "active"
        } else {
            "inactive"
        };
        Self {
            id: p.id,
            name: p.name,
            promotion_type: p.promotion_type,
            start_time: p.start_time,
            end_time: p.end_time,
            discount_value: p.discount_value,
            min_amount: p.min_amount,
            status: status.to_string(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Create promotion payload; times accepted as RFC3339 or
/// `YYYY-MM-DD HH:MM:SS` strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub promotion_type: String,
    pub start_time: String,
    pub end_time: String,
    pub discount_value: Option<f64>,
    pub min_amount: Option<f64>,
}

/// Update promotion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub promotion_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub discount_value: Option<f64>,
    pub min_amount: Option<f64>,
}
