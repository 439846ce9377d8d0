/// Утилиты для списков: сортировка по колонке и подтверждение действий
use std::cmp::Ordering;

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Сортирует список по указанному полю
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Сравнение f64 без паники на NaN
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Сравнение строк без учёта регистра
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Индикатор сортировки для заголовка колонки
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field != field {
        ""
    } else if ascending {
        " ▲"
    } else {
        " ▼"
    }
}

/// Новое состояние сортировки после клика по колонке
pub fn toggle_sort(current_field: &str, ascending: bool, clicked: &str) -> (String, bool) {
    if current_field == clicked {
        (clicked.to_string(), !ascending)
    } else {
        (clicked.to_string(), true)
    }
}

/// Браузерный confirm(); без window считаем отказом
pub fn confirm_with_message(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// "N записей" с правильным окончанием
pub fn records_label(n: usize) -> String {
    let word = match (n % 10, n % 100) {
        (1, r) if r != 11 => "запись",
        (2..=4, r) if !(12..=14).contains(&r) => "записи",
        _ => "записей",
    };
    format!("{} {}", n, word)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, f64);

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "amount" => cmp_f64(self.1, other.1),
                _ => cmp_text(self.0, other.0),
            }
        }
    }

    #[test]
    fn sorts_both_directions() {
        let mut rows = vec![Row("б", 2.0), Row("А", 3.0), Row("в", 1.0)];
        sort_list(&mut rows, "name", true);
        assert_eq!(rows.iter().map(|r| r.0).collect::<Vec<_>>(), ["А", "б", "в"]);
        sort_list(&mut rows, "amount", false);
        assert_eq!(rows.iter().map(|r| r.1).collect::<Vec<_>>(), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn toggle_flips_only_same_column() {
        assert_eq!(toggle_sort("code", true, "code"), ("code".to_string(), false));
        assert_eq!(toggle_sort("code", false, "name"), ("name".to_string(), true));
        assert_eq!(get_sort_indicator("code", "name", true), "");
        assert_eq!(get_sort_indicator("code", "code", false), " ▼");
    }

    #[test]
    fn records_label_plural_forms() {
        assert_eq!(records_label(1), "1 запись");
        assert_eq!(records_label(3), "3 записи");
        assert_eq!(records_label(11), "11 записей");
        assert_eq!(records_label(22), "22 записи");
        assert_eq!(records_label(25), "25 записей");
    }
}
