use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::duplicates::{DuplicateCandidate, DuplicateKind};
use crate::shared::validation::{require, round_money, validate_non_negative};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор складской позиции
    InventoryItemId
);

/// Складская позиция (запчасти, расходники). `base.code` – артикул, `base.description` – наименование.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(flatten)]
    pub base: BaseAggregate<InventoryItemId>,

    pub category: String,
    pub quantity: i64,
    pub min_quantity: i64,
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub location: Option<String>,
}

impl InventoryItem {
    pub fn new_for_insert(dto: &InventoryItemDto) -> Self {
        let mut item = Self {
            base: BaseAggregate::new(InventoryItemId::new_v4(), String::new(), String::new()),
            category: String::new(),
            quantity: 0,
            min_quantity: 0,
            unit_cost: 0.0,
            supplier: None,
            location: None,
        };
        item.update(dto);
        item
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn sku(&self) -> &str {
        &self.base.code
    }

    pub fn update(&mut self, dto: &InventoryItemDto) {
        self.base.code = dto.sku.trim().to_uppercase();
        self.base.description = dto.name.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.category = dto.category.trim().to_string();
        self.quantity = dto.quantity;
        self.min_quantity = dto.min_quantity;
        self.unit_cost = dto.unit_cost;
        self.supplier = dto.supplier.clone().filter(|s| !s.trim().is_empty());
        self.location = dto.location.clone().filter(|s| !s.trim().is_empty());
    }

    /// Остаток на уровне или ниже минимального
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    pub fn stock_value(&self) -> f64 {
        round_money(self.quantity as f64 * self.unit_cost)
    }

    /// Изменить остаток на `delta`. Остаток не может стать отрицательным.
    pub fn adjust(&mut self, delta: i64) -> Result<(), String> {
        if delta == 0 {
            return Err("Изменение остатка не может быть нулевым".into());
        }
        let next = self.quantity + delta;
        if next < 0 {
            return Err(format!(
                "Недостаточно на складе: остаток {}, списание {}",
                self.quantity, -delta
            ));
        }
        self.quantity = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        require(&self.base.code, "Артикул")?;
        require(&self.base.description, "Наименование")?;
        require(&self.category, "Категория")?;
        if self.quantity < 0 {
            return Err("Количество не может быть отрицательным".into());
        }
        if self.min_quantity < 0 {
            return Err("Минимальный остаток не может быть отрицательным".into());
        }
        validate_non_negative(self.unit_cost, "Цена за единицу")?;
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl DuplicateCandidate for InventoryItem {
    fn candidate_id(&self) -> String {
        self.to_string_id()
    }

    fn candidate_name(&self) -> String {
        self.base.description.clone()
    }

    fn duplicate_keys(&self) -> Vec<(DuplicateKind, String)> {
        vec![(DuplicateKind::Sku, self.base.code.trim().to_uppercase())]
    }
}

impl AggregateRoot for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "inventory_item"
    }

    fn element_name() -> &'static str {
        "Складская позиция"
    }

    fn list_name() -> &'static str {
        "Склад"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InventoryItemDto {
    pub id: Option<String>,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub min_quantity: i64,
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub comment: Option<String>,
}

impl From<&InventoryItem> for InventoryItemDto {
    fn from(i: &InventoryItem) -> Self {
        Self {
            id: Some(i.to_string_id()),
            sku: i.base.code.clone(),
            name: i.base.description.clone(),
            category: i.category.clone(),
            quantity: i.quantity,
            min_quantity: i.min_quantity,
            unit_cost: i.unit_cost,
            supplier: i.supplier.clone(),
            location: i.location.clone(),
            comment: i.base.comment.clone(),
        }
    }
}

/// Приход (delta > 0) или списание (delta < 0)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> InventoryItem {
        InventoryItem::new_for_insert(&InventoryItemDto {
            sku: " oil-5w30 ".into(),
            name: "Масло моторное 5W-30, 4 л".into(),
            category: "Расходники".into(),
            quantity: 12,
            min_quantity: 5,
            unit_cost: 3200.0,
            ..Default::default()
        })
    }

    #[test]
    fn sku_is_normalized() {
        let i = item();
        assert_eq!(i.sku(), "OIL-5W30");
        assert!(i.validate().is_ok());
        assert_eq!(i.stock_value(), 38_400.0);
    }

    #[test]
    fn adjust_keeps_quantity_non_negative() {
        let mut i = item();
        assert!(i.adjust(-13).is_err());
        assert_eq!(i.quantity, 12);
        i.adjust(-7).unwrap();
        assert!(i.is_low_stock());
        assert!(i.adjust(0).is_err());
    }
}
