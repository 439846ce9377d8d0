//! Разбор полей форм: все поля ввода строковые, DTO ждёт типы

/// Пустая строка -> None, иначе обрезанная строка
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Денежное/дробное поле. Допускается запятая и пробелы между разрядами
pub fn parse_f64(label: &str, value: &str) -> Result<f64, String> {
    let normalized: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if normalized.is_empty() {
        return Ok(0.0);
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{}: ожидается число", label))
}

pub fn parse_i64(label: &str, value: &str) -> Result<i64, String> {
    let normalized: String = value.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if normalized.is_empty() {
        return Ok(0);
    }
    normalized
        .parse::<i64>()
        .map_err(|_| format!("{}: ожидается целое число", label))
}

/// Необязательное целое: пустое поле -> None
pub fn parse_opt_i64(label: &str, value: &str) -> Result<Option<i64>, String> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_i64(label, value).map(Some)
    }
}

/// Число для поля ввода без лишних нулей
pub fn f64_to_input(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_become_none() {
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(" Москва "), Some("Москва".to_string()));
    }

    #[test]
    fn numbers_accept_russian_input() {
        assert_eq!(parse_f64("Ставка", "2 500,50"), Ok(2500.5));
        assert_eq!(parse_f64("Ставка", ""), Ok(0.0));
        assert!(parse_f64("Ставка", "abc").is_err());
        assert_eq!(parse_i64("Пробег", "120 000"), Ok(120_000));
        assert!(parse_i64("Пробег", "1.5").is_err());
        assert_eq!(parse_opt_i64("ТО", " "), Ok(None));
        assert_eq!(parse_opt_i64("ТО", "15000"), Ok(Some(15000)));
    }

    #[test]
    fn input_formatting() {
        assert_eq!(f64_to_input(3000.0), "3000");
        assert_eq!(f64_to_input(1250.5), "1250.5");
    }
}
