/// Utilities for date and time formatting
///
/// Provides consistent date/time formatting across the application
use chrono::{DateTime, Local, NaiveDate, Utc};

/// UTC timestamp -> "DD.MM.YYYY HH:MM" в локальной зоне браузера
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}

/// Format ISO datetime string to DD.MM.YYYY HH:MM:SS format (UTC)
/// Example: "2024-03-15T14:02:26.123Z" -> "15.03.2024 14:02:26"
pub fn format_datetime(datetime_str: &str) -> String {
    match DateTime::parse_from_rfc3339(datetime_str) {
        Ok(dt) => dt.with_timezone(&Utc).format("%d.%m.%Y %H:%M:%S").to_string(),
        Err(_) => datetime_str.to_string(),
    }
}

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => format_naive(&d),
        Err(_) => date_str.to_string(),
    }
}

pub fn format_naive(date: &NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn format_opt_date(date: &Option<NaiveDate>) -> String {
    date.as_ref().map(format_naive).unwrap_or_default()
}

/// Значение для `<input type="date">` (YYYY-MM-DD)
pub fn to_input(date: &Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Разбор значения `<input type="date">`; пустая строка -> None
pub fn parse_input(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Некорректная дата: {}", value))
}

/// Первое и последнее число текущего месяца
pub fn current_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    use chrono::Datelike;
    let first = today.with_day(1).unwrap_or(today);
    let next = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let last = next.and_then(|n| n.pred_opt()).unwrap_or(today);
    (first, last)
}

pub const MONTH_NAMES: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь",
    "Октябрь", "Ноябрь", "Декабрь",
];

/// "2026-04" -> "Апрель 2026"; нераспознанный период возвращается как есть
pub fn month_title(period: &str) -> String {
    match parse_period(period) {
        Some((year, month)) => format!("{} {}", MONTH_NAMES[month as usize - 1], year),
        None => period.to_string(),
    }
}

/// Короткая подпись для осей графиков: "2026-04" -> "04.26"
pub fn month_short(period: &str) -> String {
    match parse_period(period) {
        Some((year, month)) => format!("{:02}.{:02}", month, year.rem_euclid(100)),
        None => period.to_string(),
    }
}

/// "YYYY-MM" -> (год, месяц)
pub fn parse_period(period: &str) -> Option<(i32, u32)> {
    let (year, month) = period.split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2024-03-15T14:02:26.123Z"),
            "15.03.2024 14:02:26"
        );
        assert_eq!(
            format_datetime("2024-12-31T23:59:59+00:00"),
            "31.12.2024 23:59:59"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_datetime("invalid"), "invalid");
        assert_eq!(format_date("invalid"), "invalid");
    }

    #[test]
    fn input_round_trip_and_blank() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 9);
        assert_eq!(to_input(&d), "2026-02-09");
        assert_eq!(parse_input("2026-02-09"), Ok(d));
        assert_eq!(parse_input("  "), Ok(None));
        assert!(parse_input("09.02.2026").is_err());
    }

    #[test]
    fn month_range_handles_december_and_leap_year() {
        let (from, to) = current_month_range(NaiveDate::from_ymd_opt(2026, 12, 15).unwrap());
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        let (_, to) = current_month_range(NaiveDate::from_ymd_opt(2028, 2, 3).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }

    #[test]
    fn month_titles() {
        assert_eq!(month_title("2026-04"), "Апрель 2026");
        assert_eq!(month_title("total"), "total");
        assert_eq!(month_short("2025-12"), "12.25");
        assert_eq!(parse_period("2026-13"), None);
        assert_eq!(parse_period("2026-01"), Some((2026, 1)));
    }
}
