//! Поиск дублей по нормализованным ключам (телефон, удостоверение, e-mail, артикул).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DuplicateKind {
    Phone,
    NationalId,
    Email,
    Plate,
    Sku,
}

impl DuplicateKind {
    pub fn label(&self) -> &'static str {
        match self {
            DuplicateKind::Phone => "Телефон",
            DuplicateKind::NationalId => "Удостоверение личности",
            DuplicateKind::Email => "E-mail",
            DuplicateKind::Plate => "Госномер",
            DuplicateKind::Sku => "Артикул",
        }
    }
}

/// Группа записей с одинаковым ключом
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub kind: DuplicateKind,
    pub key: String,
    pub ids: Vec<String>,
    pub names: Vec<String>,
}

/// Запись, которая может участвовать в поиске дублей
pub trait DuplicateCandidate {
    fn candidate_id(&self) -> String;
    fn candidate_name(&self) -> String;
    /// Нормализованные ключи записи. Пустые ключи игнорируются.
    fn duplicate_keys(&self) -> Vec<(DuplicateKind, String)>;
}

/// Сгруппировать записи с совпадающими ключами (группы из 2+ записей)
pub fn find_duplicates<T: DuplicateCandidate>(items: &[T]) -> Vec<DuplicateGroup> {
    let mut buckets: BTreeMap<(DuplicateKind, String), Vec<&T>> = BTreeMap::new();
    for item in items {
        for (kind, key) in item.duplicate_keys() {
            if key.is_empty() {
                continue;
            }
            buckets.entry((kind, key)).or_default().push(item);
        }
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|((kind, key), members)| DuplicateGroup {
            kind,
            key,
            ids: members.iter().map(|m| m.candidate_id()).collect(),
            names: members.iter().map(|m| m.candidate_name()).collect(),
        })
        .collect()
}

/// Найти существующую запись, конфликтующую с `candidate` по одному из ключей.
///
/// Сама запись (совпадение по ID) конфликтом не считается.
pub fn find_conflict<'a, T: DuplicateCandidate>(
    existing: &'a [T],
    candidate: &T,
) -> Option<(DuplicateKind, &'a T)> {
    find_conflict_by(existing, candidate, |_| true)
}

/// То же, но проверяются только ключи, для которых `unique` вернул true
pub fn find_conflict_by<'a, T: DuplicateCandidate>(
    existing: &'a [T],
    candidate: &T,
    unique: impl Fn(DuplicateKind) -> bool,
) -> Option<(DuplicateKind, &'a T)> {
    let own_id = candidate.candidate_id();
    let keys: Vec<(DuplicateKind, String)> = candidate
        .duplicate_keys()
        .into_iter()
        .filter(|(kind, key)| !key.is_empty() && unique(*kind))
        .collect();
    existing
        .iter()
        .filter(|other| other.candidate_id() != own_id)
        .find_map(|other| {
            let other_keys = other.duplicate_keys();
            keys.iter()
                .find(|k| other_keys.contains(k))
                .map(|(kind, _)| (*kind, other))
        })
}

/// Текст ошибки уникальности для пользователя
pub fn conflict_message(kind: DuplicateKind, owner_name: &str) -> String {
    format!(
        "{}: значение уже используется в записи «{}»",
        kind.label(),
        owner_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        id: &'static str,
        phone: &'static str,
        email: &'static str,
    }

    impl DuplicateCandidate for Person {
        fn candidate_id(&self) -> String {
            self.id.to_string()
        }
        fn candidate_name(&self) -> String {
            format!("person {}", self.id)
        }
        fn duplicate_keys(&self) -> Vec<(DuplicateKind, String)> {
            vec![
                (DuplicateKind::Phone, self.phone.to_string()),
                (DuplicateKind::Email, self.email.to_string()),
            ]
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person { id: "1", phone: "79120000001", email: "" },
            Person { id: "2", phone: "79120000001", email: "a@b.ru" },
            Person { id: "3", phone: "79120000003", email: "a@b.ru" },
            Person { id: "4", phone: "79120000004", email: "" },
        ]
    }

    #[test]
    fn groups_by_each_key_and_skips_blanks() {
        let groups = find_duplicates(&people());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kind, DuplicateKind::Phone);
        assert_eq!(groups[0].ids, vec!["1", "2"]);
        assert_eq!(groups[1].kind, DuplicateKind::Email);
        assert_eq!(groups[1].ids, vec!["2", "3"]);
    }

    #[test]
    fn conflict_ignores_the_record_itself() {
        let existing = people();
        let same = Person { id: "4", phone: "79120000004", email: "" };
        assert!(find_conflict(&existing, &same).is_none());

        let clash = Person { id: "9", phone: "79120000004", email: "" };
        let (kind, owner) = find_conflict(&existing, &clash).unwrap();
        assert_eq!(kind, DuplicateKind::Phone);
        assert_eq!(owner.id, "4");
    }

    #[test]
    fn conflict_by_selected_kinds_only() {
        let existing = people();
        let shares_email = Person { id: "9", phone: "79120000099", email: "a@b.ru" };
        assert!(find_conflict_by(&existing, &shares_email, |k| k == DuplicateKind::Phone).is_none());
        assert!(find_conflict(&existing, &shares_email).is_some());
    }

    #[test]
    fn blank_keys_never_conflict() {
        let existing = people();
        let blank = Person { id: "9", phone: "", email: "" };
        assert!(find_conflict(&existing, &blank).is_none());
    }
}
