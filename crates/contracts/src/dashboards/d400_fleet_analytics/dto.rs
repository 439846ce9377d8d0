use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a002_vehicle::VehicleStatus;
use crate::shared::metrics::{SeasonalPattern, UsageTrend};

/// Request for fleet analytics dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetAnalyticsRequest {
    #[serde(alias = "from")]
    pub date_from: NaiveDate,
    #[serde(alias = "to")]
    pub date_to: NaiveDate,
}

/// Profitability row for one vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfitability {
    pub vehicle_id: String,
    pub plate_number: String,
    pub name: String,
    pub status: VehicleStatus,
    pub revenue: f64,
    pub maintenance_cost: f64,
    pub profit: f64,
    pub rented_days: i64,
    /// Share of the period the vehicle was rented, 0..=1
    pub utilization: f64,
    pub margin: f64,
    pub roi: f64,
    /// 0..=100
    pub profitability_score: f64,
    /// Rented days per month over the last six months
    pub monthly_usage: Vec<f64>,
    pub trend: UsageTrend,
    pub seasonal: Option<SeasonalPattern>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetTotals {
    pub vehicles: u32,
    pub revenue: f64,
    pub maintenance_cost: f64,
    pub profit: f64,
    pub average_utilization: f64,
    pub average_score: f64,
}

/// Response for fleet analytics dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetAnalyticsResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Labels for `monthly_usage`, format "YYYY-MM"
    pub month_labels: Vec<String>,
    pub vehicles: Vec<VehicleProfitability>,
    pub totals: FleetTotals,
}
