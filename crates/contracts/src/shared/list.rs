use serde::{Deserialize, Serialize};

/// Параметры постраничного списка с текстовым поиском
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Подстрока для поиска (без учёта регистра)
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl ListQuery {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 1000;

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    /// Нормализованная строка поиска; пустая строка означает "без фильтра"
    pub fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    /// Проверить, содержит ли хотя бы одно из полей строку поиска
    pub fn matches(&self, haystack: &[&str]) -> bool {
        match self.needle() {
            None => true,
            Some(needle) => haystack.iter().any(|h| h.to_lowercase().contains(&needle)),
        }
    }

    /// Применить поиск и страницу к уже загруженному списку
    pub fn apply<T>(&self, items: Vec<T>, fields: impl Fn(&T) -> Vec<String>) -> ListResponse<T> {
        let filtered: Vec<T> = items
            .into_iter()
            .filter(|item| {
                let values = fields(item);
                let refs: Vec<&str> = values.iter().map(String::as_str).collect();
                self.matches(&refs)
            })
            .collect();
        let total = filtered.len() as u64;
        let items = filtered
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect();
        ListResponse { items, total }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_and_page() {
        let query = ListQuery {
            q: Some(" ИВАН ".into()),
            limit: Some(1),
            offset: Some(1),
        };
        let names = vec!["Иванов", "Петров", "Иванова", "Сидоров"];
        let page = query.apply(names, |n| vec![n.to_string()]);
        assert_eq!(page.total, 2);
        assert_eq!(page.items, vec!["Иванова"]);
    }

    #[test]
    fn limit_is_clamped() {
        let query = ListQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.limit(), 1);
        assert_eq!(ListQuery::default().limit(), ListQuery::DEFAULT_LIMIT);
    }
}
