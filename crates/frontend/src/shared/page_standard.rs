//! Категории страниц, открываемых во вкладках.
//!
//! Корневой элемент страницы получает `id` вида `{entity}--{category}`
//! (например `"a002_vehicle--list"`) и атрибут `data-page-category`.

/// Список записей: таблица с фильтрами.
pub const PAGE_CAT_LIST: &str = "list";

/// Форма одной записи.
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Аналитический дашборд.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Администрирование: пользователи, сессии, журнал.
pub const PAGE_CAT_SYSTEM: &str = "system";

pub const ALL_CATEGORIES: &[&str] = &[
    PAGE_CAT_LIST,
    PAGE_CAT_DETAIL,
    PAGE_CAT_DASHBOARD,
    PAGE_CAT_SYSTEM,
];

/// Return true if the category value is recognised.
pub fn is_known_category(cat: &str) -> bool {
    ALL_CATEGORIES.contains(&cat)
}

/// BEM-класс корня страницы для категории
pub fn page_class(cat: &str) -> &'static str {
    match cat {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        _ => "page",
    }
}

/// Проверяет формат `{entity}--{category}` с известной категорией
pub fn is_valid_page_id(page_id: &str) -> bool {
    match page_id.split_once("--") {
        Some((entity, cat)) => !entity.is_empty() && is_known_category(cat),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_id_format() {
        assert!(is_valid_page_id("a003_rental_contract--list"));
        assert!(is_valid_page_id("d401_executive_kpi--dashboard"));
        assert!(!is_valid_page_id("a003_rental_contract"));
        assert!(!is_valid_page_id("--list"));
        assert!(!is_valid_page_id("sys_users--wizard"));
    }

    #[test]
    fn class_per_category() {
        assert_eq!(page_class(PAGE_CAT_DETAIL), "page page--detail");
        assert_eq!(page_class(PAGE_CAT_SYSTEM), "page");
    }
}
