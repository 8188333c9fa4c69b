//! Analytics API Handlers
//!
//! repository 层返回原始聚合；这里负责时间窗口、分桶和
//! 增长率/占比换算。

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::analytics;
use crate::utils::{ApiResponse, AppError, AppResult, ok, time};

const HOT_PRODUCTS_LIMIT: i64 = 5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 环比增长百分比；基期为零时返回 None (前端显示 "-")
fn growth_pct(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some(round2((current - previous) / previous * 100.0))
    }
}

/// 概览卡片
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub today_sales: f64,
    pub today_orders: i64,
    pub avg_order_value: f64,
    /// 已完成订单占比 (%)
    pub conversion_rate: f64,
    pub sales_growth: Option<f64>,
    pub orders_growth: Option<f64>,
}

/// GET /api/analytics/overview - 今日概览
pub async fn overview(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<OverviewResponse>>> {
    let tz = state.timezone();
    let today = time::today(tz);
    let today_start = time::day_start_millis(today, tz);
    let today_end = time::day_end_millis(today, tz);
    let yesterday_start = today_start - Duration::days(1).num_milliseconds();

    let totals =
        analytics::overview_totals(state.pool(), yesterday_start, today_start, today_end).await?;

    let avg_order_value = if totals.today_completed > 0 {
        round2(totals.today_sales / totals.today_completed as f64)
    } else {
        0.0
    };
    let conversion_rate = if totals.today_orders > 0 {
        round2(totals.today_completed as f64 / totals.today_orders as f64 * 100.0)
    } else {
        0.0
    };

    Ok(ok(OverviewResponse {
        today_sales: round2(totals.today_sales),
        today_orders: totals.today_orders,
        avg_order_value,
        conversion_rate,
        sales_growth: growth_pct(totals.today_sales, totals.yesterday_sales),
        orders_growth: growth_pct(totals.today_orders as f64, totals.yesterday_orders as f64),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(rename = "timeRange", default = "default_time_range")]
    pub time_range: String,
}

fn default_time_range() -> String {
    "week".to_string()
}

/// 趋势数据点: 日期标签 + 已完成销售额
#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub sales: f64,
}

/// GET /api/analytics/sales-trend - 销售趋势
///
/// week/month 按天分桶 (7/30 天)，year 按月分桶 (12 个月)。
/// 没有销量的桶补零，保证横轴连续。
pub async fn sales_trend(
    State(state): State<ServerState>,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<ApiResponse<Vec<TrendPoint>>>> {
    let tz = state.timezone();

    let (since, labels): (i64, Vec<String>) = match query.time_range.as_str() {
        "week" => (time::days_ago_start_millis(6, tz), day_labels(6, tz)),
        "month" => (time::days_ago_start_millis(29, tz), day_labels(29, tz)),
        "year" => (time::months_ago_start_millis(11, tz), month_labels(11, tz)),
        other => {
            return Err(AppError::validation(format!(
                "Invalid timeRange '{other}', expected week, month or year"
            )));
        }
    };

    let rows = analytics::completed_sales_since(state.pool(), since).await?;

    let mut buckets: BTreeMap<String, f64> =
        labels.iter().map(|l| (l.clone(), 0.0)).collect();
    let by_month = query.time_range == "year";
    for (created_at, amount) in rows {
        let label = if by_month {
            time::format_month(created_at, tz)
        } else {
            time::format_day(created_at, tz)
        };
        if let Some(bucket) = buckets.get_mut(&label) {
            *bucket += amount;
        }
    }

    let points = labels
        .into_iter()
        .map(|label| {
            let sales = round2(buckets.get(&label).copied().unwrap_or(0.0));
            TrendPoint { date: label, sales }
        })
        .collect();
    Ok(ok(points))
}

/// 最近 days+1 天的日期标签，旧在前
fn day_labels(days: i64, tz: chrono_tz::Tz) -> Vec<String> {
    let today = time::today(tz);
    (0..=days)
        .rev()
        .map(|offset| (today - Duration::days(offset)).format("%Y-%m-%d").to_string())
        .collect()
}

/// 最近 months+1 个月的月份标签，旧在前
fn month_labels(months: u32, tz: chrono_tz::Tz) -> Vec<String> {
    (0..=months)
        .rev()
        .map(|offset| time::format_month(time::months_ago_start_millis(offset, tz), tz))
        .collect()
}

/// GET /api/analytics/category-distribution - 分类分布
pub async fn category_distribution(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<analytics::CategoryStat>>>> {
    let stats = analytics::category_distribution(state.pool()).await?;
    Ok(ok(stats))
}

#[derive(Debug, Deserialize)]
pub struct HotProductsQuery {
    #[serde(rename = "rankingPeriod", default = "default_ranking_period")]
    pub ranking_period: String,
}

fn default_ranking_period() -> String {
    "today".to_string()
}

/// 热销商品: 销量 + 金额 + 占比
#[derive(Debug, Serialize)]
pub struct HotProduct {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub sales: i64,
    pub amount: f64,
    /// 占统计期内总销量的百分比
    pub percentage: f64,
}

/// GET /api/analytics/hot-products - 热销 TOP5
pub async fn hot_products(
    State(state): State<ServerState>,
    Query(query): Query<HotProductsQuery>,
) -> AppResult<Json<ApiResponse<Vec<HotProduct>>>> {
    let tz = state.timezone();
    let since = match query.ranking_period.as_str() {
        "today" => time::day_start_millis(time::today(tz), tz),
        "week" => time::days_ago_start_millis(6, tz),
        "month" => time::days_ago_start_millis(29, tz),
        other => {
            return Err(AppError::validation(format!(
                "Invalid rankingPeriod '{other}', expected today, week or month"
            )));
        }
    };

    let rows = analytics::hot_products(state.pool(), since, HOT_PRODUCTS_LIMIT).await?;
    let total_quantity = analytics::completed_quantity_since(state.pool(), since).await?;

    let products = rows
        .into_iter()
        .map(|row| {
            let percentage = if total_quantity > 0 {
                round2(row.sales as f64 / total_quantity as f64 * 100.0)
            } else {
                0.0
            };
            HotProduct {
                id: row.id,
                name: row.name,
                image_url: row.image_url,
                sales: row.sales,
                amount: round2(row.amount),
                percentage,
            }
        })
        .collect();
    Ok(ok(products))
}
