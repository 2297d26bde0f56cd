//! Analytics handler (admin).
//!
//! Counts and revenue come straight from aggregate queries; the daily
//! series is densified in process so the trailing window always has one
//! point per day, zero-filled where nothing sold.

use axum::{Json, extract::State};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::orders::{DailySalesRow, OrderRepository};
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Days in the daily-sales window, current day included.
const DAILY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub users: i64,
    pub products: i64,
    pub total_sales: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub daily_sales_data: Vec<DailySales>,
}

/// One day of the densified sales series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub sales: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// `GET /api/analytics` - store-wide summary plus the trailing 7 days.
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<AnalyticsResponse>> {
    let orders = OrderRepository::new(state.pool());

    let users = UserRepository::new(state.pool()).count().await?;
    let products = ProductRepository::new(state.pool()).count().await?;
    let sales = orders.sales_summary().await?;

    let end = Utc::now();
    let start_day = (end - Duration::days(DAILY_WINDOW_DAYS - 1)).date_naive();
    // Align the window start to midnight so the first day is complete
    let start = start_day.and_time(chrono::NaiveTime::MIN).and_utc();
    let rows = orders.daily_sales(start, end).await?;

    let daily_sales_data = fill_daily_range(start_day, end.date_naive(), &rows);

    Ok(Json(AnalyticsResponse {
        users,
        products,
        total_sales: sales.total_sales,
        total_revenue: sales.total_revenue,
        daily_sales_data,
    }))
}

/// Densify aggregated rows over an inclusive date range.
///
/// Days with no orders get an explicit zero point so charts never skip
/// a day.
fn fill_daily_range(start: NaiveDate, end: NaiveDate, rows: &[DailySalesRow]) -> Vec<DailySales> {
    let mut series = Vec::new();
    let mut day = start;

    while day <= end {
        let date = day.format("%Y-%m-%d").to_string();
        let point = rows
            .iter()
            .find(|row| row.day == date)
            .map_or_else(
                || DailySales {
                    date: date.clone(),
                    sales: 0,
                    revenue: Decimal::ZERO,
                },
                |row| DailySales {
                    date: date.clone(),
                    sales: row.sales,
                    revenue: row.revenue,
                },
            );
        series.push(point);

        let Some(next) = day.succ_opt() else { break };
        day = next;
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn row(day: &str, sales: i64, revenue: i64) -> DailySalesRow {
        DailySalesRow {
            day: day.to_string(),
            sales,
            revenue: Decimal::from(revenue),
        }
    }

    #[test]
    fn test_gaps_are_zero_filled() {
        let rows = vec![row("2024-01-02", 3, 50)];
        let series = fill_daily_range(date("2024-01-01"), date("2024-01-03"), &rows);

        assert_eq!(series.len(), 3);
        assert_eq!(
            series[0],
            DailySales {
                date: "2024-01-01".to_string(),
                sales: 0,
                revenue: Decimal::ZERO,
            }
        );
        assert_eq!(
            series[1],
            DailySales {
                date: "2024-01-02".to_string(),
                sales: 3,
                revenue: Decimal::from(50),
            }
        );
        assert_eq!(series[2].sales, 0);
    }

    #[test]
    fn test_window_covers_seven_days_inclusive() {
        let series = fill_daily_range(date("2024-03-01"), date("2024-03-07"), &[]);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "2024-03-01");
        assert_eq!(series[6].date, "2024-03-07");
    }

    #[test]
    fn test_single_day_range() {
        let rows = vec![row("2024-05-05", 1, 10)];
        let series = fill_daily_range(date("2024-05-05"), date("2024-05-05"), &rows);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].sales, 1);
    }

    #[test]
    fn test_daily_point_serializes_numeric_revenue() {
        let point = DailySales {
            date: "2024-01-02".to_string(),
            sales: 3,
            revenue: Decimal::from(50),
        };
        let json = serde_json::to_value(&point).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"date": "2024-01-02", "sales": 3, "revenue": 50.0})
        );
    }
}
