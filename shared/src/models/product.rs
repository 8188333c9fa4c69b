//! Product Model

use serde::{Deserialize, Serialize};

use super::status_label;

/// Product entity (商品)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// 1 = active, 0 = inactive
    pub status: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product row joined with accumulated sales (for list views)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductWithSales {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: i64,
    pub sales_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product view with the status flag rendered as a label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub sales_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ProductWithSales> for ProductView {
    fn from(p: ProductWithSales) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            price: p.price,
            stock: p.stock,
            description: p.description,
            image_url: p.image_url,
            status: status_label(p.status).to_string(),
            sales_count: p.sales_count,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
