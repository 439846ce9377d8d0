use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Трейт для типов идентификаторов агрегатов
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Преобразовать ID в строку
    fn as_string(&self) -> String;

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String>;
}

/// Разобрать строковый ID из DTO в типизированный ID агрегата
pub fn parse_id<T: AggregateId>(raw: &Option<String>) -> Result<Option<T>, String> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => T::from_string(s).map(Some),
    }
}

/// Короткий бизнес-код из UUID (например, "CL-1A2B3C4D")
pub fn short_code(prefix: &str, id: uuid::Uuid) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &simple[..8])
}

/// Сегодняшняя дата по локальному времени
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Объявить newtype-идентификатор агрегата поверх UUID
#[macro_export]
macro_rules! uuid_aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new(value: uuid::Uuid) -> Self {
                Self(value)
            }

            pub fn new_v4() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn value(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl $crate::domain::common::AggregateId for $name {
            fn as_string(&self) -> String {
                self.0.to_string()
            }

            fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map($name::new)
                    .map_err(|e| format!("Invalid UUID: {}", e))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::uuid_aggregate_id!(TestId);

    #[test]
    fn parse_id_treats_blank_as_new_record() {
        assert_eq!(parse_id::<TestId>(&None).unwrap(), None);
        assert_eq!(parse_id::<TestId>(&Some("  ".into())).unwrap(), None);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id::<TestId>(&Some("not-a-uuid".into())).is_err());
        let id = TestId::new_v4();
        assert_eq!(parse_id::<TestId>(&Some(id.as_string())).unwrap(), Some(id));
    }

    #[test]
    fn short_code_uses_uuid_prefix() {
        let id = uuid::Uuid::parse_str("1a2b3c4d-0000-0000-0000-000000000000").unwrap();
        assert_eq!(short_code("CL", id), "CL-1A2B3C4D");
    }
}
