//! Order Model
//!
//! Orders move through a fixed lifecycle:
//!
//! ```text
//!            process
//! pending ─────────────> completed
//!    │
//!    │ cancel (restores stock)
//!    └─────────────────> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal; no transition leaves them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Stored string form (also the wire form)
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether this state admits no further transitions
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Legal transitions: pending -> completed, pending -> cancelled
    pub const fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Order entity (订单)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub total_amount: f64,
    /// One of `pending` / `completed` / `cancelled`; all changes go
    /// through [`OrderStatus::can_transition_to`]
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item; `price` is the unit price captured at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Order joined with the owning username (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderWithUser {
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub username: Option<String>,
    pub total_amount: f64,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One line of a create-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub user_id: i64,
    pub total_amount: f64,
    pub items: Vec<OrderItemInput>,
}

/// Aggregate order counters for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStats {
    #[serde(rename = "totalOrders")]
    pub total_orders: i64,
    #[serde(rename = "pendingOrders")]
    pub pending_orders: i64,
    #[serde(rename = "completedOrders")]
    pub completed_orders: i64,
    #[serde(rename = "todayIncome")]
    pub today_income: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(s.as_str()), Ok(s));
        }
        assert!(OrderStatus::from_str("shipped").is_err());
        assert!(OrderStatus::from_str("Pending").is_err());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for target in [
                OrderStatus::Pending,
                OrderStatus::Completed,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_no_self_transition() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Completed).unwrap(),
            "\"completed\""
        );
        let s: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(s, OrderStatus::Cancelled);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = OrderStats {
            total_orders: 10,
            pending_orders: 3,
            completed_orders: 6,
            today_income: 128.5,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"totalOrders\":10"));
        assert!(json.contains("\"pendingOrders\":3"));
        assert!(json.contains("\"completedOrders\":6"));
        assert!(json.contains("\"todayIncome\":128.5"));
    }
}
