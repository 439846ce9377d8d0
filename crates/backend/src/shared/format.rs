/// Форматирует число с разделителями тысяч (точками)
///
/// `format_number(1234567)` → `"1.234.567"`
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Денежная сумма для писем и выгрузок: `12345.5` → `"12 345,50"`
pub fn format_money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100) as usize;
    let fraction = cents % 100;
    let grouped = format_number(whole).replace('.', " ");
    format!("{}{},{:02}", if negative { "-" } else { "" }, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0,00");
        assert_eq!(format_money(12345.5), "12 345,50");
        assert_eq!(format_money(-1000.0), "-1 000,00");
        assert_eq!(format_money(999.999), "1 000,00");
    }
}
