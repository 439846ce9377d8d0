use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{short_code, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::validation::{require, round_money, validate_positive};

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор проводки
    LedgerEntryId
);

/// Категория дохода от аренды
pub const CATEGORY_RENTAL: &str = "rental";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LedgerKind {
    #[default]
    Income,
    Expense,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Income => "Income",
            LedgerKind::Expense => "Expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LedgerKind::Income => "Доход",
            LedgerKind::Expense => "Расход",
        }
    }
}

impl std::str::FromStr for LedgerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(LedgerKind::Income),
            "Expense" => Ok(LedgerKind::Expense),
            other => Err(format!("Неизвестный вид проводки: {}", other)),
        }
    }
}

/// Проводка бухгалтерского журнала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub base: BaseAggregate<LedgerEntryId>,

    pub entry_date: NaiveDate,
    pub kind: LedgerKind,
    pub category: String,
    pub amount: f64,
    /// Расход уменьшает налоговую базу
    pub tax_deductible: bool,
    /// ID договора или записи обслуживания, породившей проводку
    pub reference: Option<String>,
}

impl LedgerEntry {
    pub fn new_for_insert(dto: &LedgerEntryDto) -> Self {
        let id = LedgerEntryId::new_v4();
        let mut entry = Self {
            base: BaseAggregate::new(id, short_code("LE", id.value()), String::new()),
            entry_date: dto.entry_date,
            kind: dto.kind,
            category: String::new(),
            amount: 0.0,
            tax_deductible: false,
            reference: None,
        };
        entry.update(dto);
        entry
    }

    /// Автоматическая проводка от другой операции
    pub fn system(
        kind: LedgerKind,
        category: &str,
        date: NaiveDate,
        amount: f64,
        description: String,
        reference: String,
    ) -> Self {
        Self::new_for_insert(&LedgerEntryDto {
            id: None,
            entry_date: date,
            kind,
            category: category.to_string(),
            amount,
            tax_deductible: kind == LedgerKind::Expense,
            description,
            reference: Some(reference),
            comment: None,
        })
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &LedgerEntryDto) {
        self.base.description = dto.description.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.entry_date = dto.entry_date;
        self.kind = dto.kind;
        self.category = dto.category.trim().to_lowercase();
        self.amount = round_money(dto.amount);
        self.tax_deductible = dto.tax_deductible && dto.kind == LedgerKind::Expense;
        self.reference = dto.reference.clone().filter(|r| !r.trim().is_empty());
    }

    /// Сумма со знаком: доход положительный, расход отрицательный
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            LedgerKind::Income => self.amount,
            LedgerKind::Expense => -self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require(&self.category, "Категория")?;
        validate_positive(self.amount, "Сумма")?;
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for LedgerEntry {
    type Id = LedgerEntryId;

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
        "a007"
    }

    fn collection_name() -> &'static str {
        "ledger_entry"
    }

    fn element_name() -> &'static str {
        "Проводка"
    }

    fn list_name() -> &'static str {
        "Бухгалтерский журнал"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LedgerEntryDto {
    pub id: Option<String>,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub kind: LedgerKind,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub tax_deductible: bool,
    #[serde(default)]
    pub description: String,
    pub reference: Option<String>,
    pub comment: Option<String>,
}

impl From<&LedgerEntry> for LedgerEntryDto {
    fn from(e: &LedgerEntry) -> Self {
        Self {
            id: Some(e.to_string_id()),
            entry_date: e.entry_date,
            kind: e.kind,
            category: e.category.clone(),
            amount: e.amount,
            tax_deductible: e.tax_deductible,
            description: e.base.description.clone(),
            reference: e.reference.clone(),
            comment: e.base.comment.clone(),
        }
    }
}

/// Итоги журнала за период
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub entries: u32,
}

impl LedgerSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                LedgerKind::Income => summary.income += entry.amount,
                LedgerKind::Expense => summary.expense += entry.amount,
            }
            summary.entries += 1;
        }
        summary.income = round_money(summary.income);
        summary.expense = round_money(summary.expense);
        summary.net = round_money(summary.income - summary.expense);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn income_is_never_deductible() {
        let entry = LedgerEntry::new_for_insert(&LedgerEntryDto {
            entry_date: d(2025, 1, 10),
            kind: LedgerKind::Income,
            category: " Rental ".into(),
            amount: 1000.0,
            tax_deductible: true,
            ..Default::default()
        });
        assert!(!entry.tax_deductible);
        assert_eq!(entry.category, "rental");
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn summary_nets_income_and_expense() {
        let entries = vec![
            LedgerEntry::system(LedgerKind::Income, CATEGORY_RENTAL, d(2025, 1, 1), 10_000.0, "Оплата".into(), "c1".into()),
            LedgerEntry::system(LedgerKind::Expense, "maintenance", d(2025, 1, 2), 2_500.5, "ТО".into(), "m1".into()),
        ];
        let summary = LedgerSummary::from_entries(&entries);
        assert_eq!(summary.income, 10_000.0);
        assert_eq!(summary.expense, 2_500.5);
        assert_eq!(summary.net, 7_499.5);
        assert_eq!(summary.entries, 2);
        assert!(entries[1].tax_deductible);
        assert_eq!(entries[1].signed_amount(), -2_500.5);
    }

    #[test]
    fn zero_amount_rejected() {
        let entry = LedgerEntry::new_for_insert(&LedgerEntryDto {
            entry_date: d(2025, 1, 10),
            category: "fuel".into(),
            amount: 0.0,
            ..Default::default()
        });
        assert!(entry.validate().is_err());
    }
}
