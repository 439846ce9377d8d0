use serde::{Deserialize, Serialize};

use crate::shared::indicators::KpiValue;

/// Request for executive KPI dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveKpiRequest {
    pub year: i32,
    pub month: u32,
}

/// One point of a monthly series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthValue {
    /// "YYYY-MM"
    pub period: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveKpiResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    pub kpis: Vec<KpiValue>,
    /// Revenue for the last 12 months, oldest first
    pub revenue_by_month: Vec<MonthValue>,
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let first = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Shift (year, month) by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn month_bounds_handle_leap_and_december() {
        assert_eq!(
            month_bounds(2024, 2),
            Some((
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            ))
        );
        assert_eq!(
            month_bounds(2025, 12).map(|(_, last)| last),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(month_bounds(2025, 13), None);
    }

    #[test]
    fn shift_month_crosses_years() {
        assert_eq!(shift_month(2025, 1, -1), (2024, 12));
        assert_eq!(shift_month(2025, 11, 3), (2026, 2));
        assert_eq!(shift_month(2025, 6, -17), (2024, 1));
    }
}
