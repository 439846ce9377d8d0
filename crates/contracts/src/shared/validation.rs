//! Общие правила проверки полей форм.
//!
//! Используются и в `validate()` агрегатов (backend), и в формах frontend,
//! чтобы пользователь видел ту же ошибку, что вернёт сервер.

use chrono::{Datelike, NaiveDate};

/// Минимальный возраст арендатора
pub const MIN_RENTER_AGE: i32 = 18;

/// Проверка обязательного текстового поля
pub fn require(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("Поле «{}» обязательно для заполнения", label));
    }
    Ok(())
}

/// Оставить в телефоне только цифры
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    let digits = normalize_phone(phone);
    if digits.len() < 10 || digits.len() > 15 {
        return Err("Телефон должен содержать от 10 до 15 цифр".into());
    }
    Ok(())
}

/// Номер удостоверения личности без пробелов и разделителей
pub fn normalize_national_id(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate_national_id(value: &str) -> Result<(), String> {
    let digits = normalize_national_id(value);
    let has_garbage = value
        .chars()
        .any(|c| !(c.is_ascii_digit() || c.is_whitespace() || c == '-'));
    if has_garbage || digits.len() != 10 {
        return Err("Номер удостоверения личности должен содержать 10 цифр".into());
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    };
    if !valid || email.contains(char::is_whitespace) {
        return Err(format!("Некорректный e-mail: {}", email));
    }
    Ok(())
}

/// Госномер: верхний регистр, без пробелов и дефисов
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// VIN: 17 символов, латиница и цифры, без I, O, Q
pub fn validate_vin(vin: &str) -> Result<(), String> {
    let vin = vin.trim().to_uppercase();
    if vin.len() != 17 {
        return Err("VIN должен содержать 17 символов".into());
    }
    if vin
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() || matches!(c, 'I' | 'O' | 'Q'))
    {
        return Err("VIN содержит недопустимые символы (I, O, Q запрещены)".into());
    }
    Ok(())
}

/// Дата окончания строго позже даты начала
pub fn validate_date_order(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if end <= start {
        return Err("Дата окончания должна быть позже даты начала".into());
    }
    Ok(())
}

/// Полных лет на дату `today`
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

pub fn validate_non_negative(value: f64, label: &str) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Поле «{}» не может быть отрицательным", label));
    }
    Ok(())
}

pub fn validate_positive(value: f64, label: &str) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("Поле «{}» должно быть больше нуля", label));
    }
    Ok(())
}

/// Разбор даты из поля формы ("YYYY-MM-DD")
pub fn parse_date(value: &str, label: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Поле «{}»: неверная дата, ожидается ГГГГ-ММ-ДД", label))
}

/// Разбор необязательной даты: пустая строка даёт `None`
pub fn parse_optional_date(value: &Option<String>, label: &str) -> Result<Option<NaiveDate>, String> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s, label).map(Some),
    }
}

/// Округление денежной суммы до копеек
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn phone_is_normalized_to_digits() {
        assert_eq!(normalize_phone("+7 (912) 345-67-89"), "79123456789");
        assert!(validate_phone("+7 (912) 345-67-89").is_ok());
        assert!(validate_phone("12-34").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn national_id_requires_ten_digits() {
        assert!(validate_national_id("4510 123456").is_ok());
        assert!(validate_national_id("4510-123456").is_ok());
        assert!(validate_national_id("4510 12345").is_err());
        assert!(validate_national_id("45AB123456").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("ivan@example.com").is_ok());
        assert!(validate_email("ivan@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ivan@@example.com").is_err());
        assert!(validate_email("iv an@example.com").is_err());
    }

    #[test]
    fn plate_normalization() {
        assert_eq!(normalize_plate("a 123-bc 77"), "A123BC77");
    }

    #[test]
    fn vin_rules() {
        assert!(validate_vin("1HGCM82633A004352").is_ok());
        assert!(validate_vin("1HGCM82633A00435").is_err());
        assert!(validate_vin("1HGCM82633A00435O").is_err());
    }

    #[test]
    fn date_order_is_strict() {
        assert!(validate_date_order(d(2025, 1, 1), d(2025, 1, 2)).is_ok());
        assert!(validate_date_order(d(2025, 1, 2), d(2025, 1, 2)).is_err());
        assert!(validate_date_order(d(2025, 1, 3), d(2025, 1, 2)).is_err());
    }

    #[test]
    fn age_counts_full_years() {
        assert_eq!(age_on(d(2000, 6, 15), d(2018, 6, 14)), 17);
        assert_eq!(age_on(d(2000, 6, 15), d(2018, 6, 15)), 18);
    }

    #[test]
    fn optional_date_parsing() {
        assert_eq!(parse_optional_date(&Some(" ".into()), "x").unwrap(), None);
        assert_eq!(
            parse_optional_date(&Some("2025-03-01".into()), "x").unwrap(),
            Some(d(2025, 3, 1))
        );
        assert!(parse_optional_date(&Some("01.03.2025".into()), "x").is_err());
    }

    #[test]
    fn money_rounding() {
        assert_eq!(round_money(10.005_1), 10.01);
        assert_eq!(round_money(149.994), 149.99);
    }
}
