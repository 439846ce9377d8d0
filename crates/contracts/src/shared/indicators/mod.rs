use serde::{Deserialize, Serialize};

use super::metrics::{percent_change, TREND_DEAD_BAND_PERCENT};

/// How to format the numeric value on the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    Money { currency: String },
    Number { decimals: u8 },
    Percent { decimals: u8 },
    Integer,
}

impl ValueFormat {
    pub fn rub() -> Self {
        ValueFormat::Money {
            currency: "RUB".to_string(),
        }
    }
}

/// Visual status of the indicator (drives colour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorStatus {
    Good,
    Bad,
    Neutral,
    Warning,
}

/// A single computed KPI returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiValue {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub format: ValueFormat,
    /// Primary numeric value (`None` when data is unavailable).
    pub value: Option<f64>,
    /// Value for the previous comparable period.
    pub previous_value: Option<f64>,
    /// Change relative to previous period, expressed as a percentage.
    pub change_percent: Option<f64>,
    pub status: IndicatorStatus,
    /// Optional secondary text displayed below the value.
    pub subtitle: Option<String>,
}

impl KpiValue {
    /// KPI without a comparison period.
    pub fn plain(id: &str, label: &str, icon: &str, format: ValueFormat, value: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
            format,
            value: Some(value),
            previous_value: None,
            change_percent: None,
            status: IndicatorStatus::Neutral,
            subtitle: None,
        }
    }

    /// KPI compared with the previous period. `higher_is_better` picks the colour.
    pub fn compared(
        id: &str,
        label: &str,
        icon: &str,
        format: ValueFormat,
        current: f64,
        previous: f64,
        higher_is_better: bool,
    ) -> Self {
        let change = percent_change(previous, current);
        Self {
            previous_value: Some(previous),
            change_percent: change,
            status: status_for_change(change, higher_is_better),
            ..Self::plain(id, label, icon, format, current)
        }
    }

    pub fn with_status(mut self, status: IndicatorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Status from a period-over-period change. Changes inside the trend dead band are neutral.
pub fn status_for_change(change_percent: Option<f64>, higher_is_better: bool) -> IndicatorStatus {
    match change_percent {
        None => IndicatorStatus::Neutral,
        Some(p) if p.abs() <= TREND_DEAD_BAND_PERCENT => IndicatorStatus::Neutral,
        Some(p) if (p > 0.0) == higher_is_better => IndicatorStatus::Good,
        Some(_) => IndicatorStatus::Bad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_respects_direction_preference() {
        assert_eq!(status_for_change(Some(20.0), true), IndicatorStatus::Good);
        assert_eq!(status_for_change(Some(20.0), false), IndicatorStatus::Bad);
        assert_eq!(status_for_change(Some(-20.0), false), IndicatorStatus::Good);
        assert_eq!(status_for_change(Some(3.0), true), IndicatorStatus::Neutral);
        assert_eq!(status_for_change(None, true), IndicatorStatus::Neutral);
    }

    #[test]
    fn compared_kpi_fills_change() {
        let kpi = KpiValue::compared("revenue", "Выручка", "wallet", ValueFormat::rub(), 150.0, 100.0, true);
        assert_eq!(kpi.change_percent, Some(50.0));
        assert_eq!(kpi.previous_value, Some(100.0));
        assert_eq!(kpi.status, IndicatorStatus::Good);
    }
}
