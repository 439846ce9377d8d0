//! Производные показатели для аналитики автопарка.
//!
//! Все функции чистые: принимают уже агрегированные числа и возвращают
//! результат, поэтому одинаково работают на сервере и в браузере.

use serde::{Deserialize, Serialize};

/// Ширина окна тренда в месяцах
pub const TREND_WINDOW_MONTHS: usize = 6;
/// Зона нечувствительности тренда, %
pub const TREND_DEAD_BAND_PERCENT: f64 = 5.0;
/// Индекс сезонности, начиная с которого спрос считается сезонным
pub const SEASONALITY_THRESHOLD: f64 = 1.5;

const WEIGHT_MARGIN: f64 = 0.4;
const WEIGHT_UTILIZATION: f64 = 0.35;
const WEIGHT_ROI: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "▲",
            TrendDirection::Down => "▼",
            TrendDirection::Stable => "■",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageTrend {
    pub early_average: f64,
    pub recent_average: f64,
    /// `None`, если базовый период нулевой
    pub change_percent: Option<f64>,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPattern {
    /// Индекс месяца с максимумом (0 = первый месяц ряда)
    pub peak_index: usize,
    pub low_index: usize,
    /// Отношение пика к среднему
    pub seasonality_index: f64,
    pub is_seasonal: bool,
}

/// Изменение в процентах относительно предыдущего значения
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous.abs() * 100.0)
}

fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Доля дней в аренде за период, в диапазоне [0, 1]
pub fn utilization(rented_days: f64, period_days: f64) -> f64 {
    if period_days <= 0.0 {
        return 0.0;
    }
    clamp_ratio(rented_days / period_days)
}

/// Маржа прибыли: (выручка - затраты) / выручка
pub fn profit_margin(revenue: f64, costs: f64) -> f64 {
    if revenue <= 0.0 {
        return 0.0;
    }
    (revenue - costs) / revenue
}

/// Окупаемость: прибыль / стоимость покупки
pub fn return_on_investment(profit: f64, investment: f64) -> f64 {
    if investment <= 0.0 {
        return 0.0;
    }
    profit / investment
}

/// Оценка прибыльности автомобиля, 0..=100.
///
/// Линейная комбинация трёх коэффициентов, каждый ограничен диапазоном [0, 1].
pub fn profitability_score(margin: f64, utilization: f64, roi: f64) -> f64 {
    let score = WEIGHT_MARGIN * clamp_ratio(margin)
        + WEIGHT_UTILIZATION * clamp_ratio(utilization)
        + WEIGHT_ROI * clamp_ratio(roi);
    (score * 1000.0).round() / 10.0
}

/// Тренд использования по окну из шести месяцев:
/// среднее последних трёх месяцев против среднего первых трёх.
pub fn usage_trend(monthly: &[f64; TREND_WINDOW_MONTHS]) -> UsageTrend {
    let half = TREND_WINDOW_MONTHS / 2;
    let early_average = monthly[..half].iter().sum::<f64>() / half as f64;
    let recent_average = monthly[half..].iter().sum::<f64>() / half as f64;
    let change_percent = percent_change(early_average, recent_average);

    let direction = match change_percent {
        Some(p) if p > TREND_DEAD_BAND_PERCENT => TrendDirection::Up,
        Some(p) if p < -TREND_DEAD_BAND_PERCENT => TrendDirection::Down,
        Some(_) => TrendDirection::Stable,
        None if recent_average > 0.0 => TrendDirection::Up,
        None => TrendDirection::Stable,
    };

    UsageTrend {
        early_average,
        recent_average,
        change_percent,
        direction,
    }
}

/// Сезонность ряда помесячных значений.
///
/// Для пустого ряда возвращает `None`. Пик и минимум берутся первыми по порядку.
pub fn seasonal_pattern(monthly: &[f64]) -> Option<SeasonalPattern> {
    if monthly.is_empty() {
        return None;
    }
    let mut peak_index = 0;
    let mut low_index = 0;
    for (i, value) in monthly.iter().enumerate() {
        if *value > monthly[peak_index] {
            peak_index = i;
        }
        if *value < monthly[low_index] {
            low_index = i;
        }
    }

    let mean = monthly.iter().sum::<f64>() / monthly.len() as f64;
    let seasonality_index = if mean > 0.0 {
        monthly[peak_index] / mean
    } else {
        1.0
    };

    Some(SeasonalPattern {
        peak_index,
        low_index,
        seasonality_index,
        is_seasonal: seasonality_index >= SEASONALITY_THRESHOLD,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_handles_zero_and_negative_base() {
        assert_eq!(percent_change(0.0, 10.0), None);
        assert_eq!(percent_change(200.0, 250.0), Some(25.0));
        assert_eq!(percent_change(-100.0, -50.0), Some(50.0));
    }

    #[test]
    fn utilization_is_clamped() {
        assert_eq!(utilization(15.0, 30.0), 0.5);
        assert_eq!(utilization(45.0, 30.0), 1.0);
        assert_eq!(utilization(5.0, 0.0), 0.0);
    }

    #[test]
    fn score_weights_and_clamps() {
        assert_eq!(profitability_score(1.0, 1.0, 1.0), 100.0);
        assert_eq!(profitability_score(0.0, 0.0, 0.0), 0.0);
        assert_eq!(profitability_score(-3.0, 2.0, 0.0), 35.0);
        assert_eq!(profitability_score(0.5, 0.5, 0.5), 50.0);
    }

    #[test]
    fn margin_and_roi_guard_zero_denominators() {
        assert_eq!(profit_margin(0.0, 100.0), 0.0);
        assert_eq!(profit_margin(1000.0, 250.0), 0.75);
        assert_eq!(return_on_investment(500.0, 0.0), 0.0);
        assert_eq!(return_on_investment(500.0, 10_000.0), 0.05);
    }

    #[test]
    fn trend_uses_dead_band() {
        let up = usage_trend(&[10.0, 10.0, 10.0, 12.0, 12.0, 12.0]);
        assert_eq!(up.direction, TrendDirection::Up);
        assert_eq!(up.change_percent, Some(20.0));

        let stable = usage_trend(&[10.0, 10.0, 10.0, 10.3, 10.3, 10.3]);
        assert_eq!(stable.direction, TrendDirection::Stable);

        let down = usage_trend(&[20.0, 20.0, 20.0, 10.0, 10.0, 10.0]);
        assert_eq!(down.direction, TrendDirection::Down);
        assert_eq!(down.change_percent, Some(-50.0));
    }

    #[test]
    fn trend_from_zero_baseline() {
        let fresh = usage_trend(&[0.0, 0.0, 0.0, 0.0, 3.0, 6.0]);
        assert_eq!(fresh.change_percent, None);
        assert_eq!(fresh.direction, TrendDirection::Up);

        let idle = usage_trend(&[0.0; 6]);
        assert_eq!(idle.direction, TrendDirection::Stable);
    }

    #[test]
    fn seasonal_pattern_detects_peak() {
        let pattern = seasonal_pattern(&[5.0, 5.0, 20.0, 5.0, 2.0, 5.0]).unwrap();
        assert_eq!(pattern.peak_index, 2);
        assert_eq!(pattern.low_index, 4);
        assert!((pattern.seasonality_index - 20.0 / (42.0 / 6.0)).abs() < 1e-9);
        assert!(pattern.is_seasonal);

        let flat = seasonal_pattern(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(flat.seasonality_index, 1.0);
        assert!(!flat.is_seasonal);

        assert!(seasonal_pattern(&[]).is_none());
        assert_eq!(seasonal_pattern(&[0.0, 0.0]).unwrap().seasonality_index, 1.0);
    }
}
