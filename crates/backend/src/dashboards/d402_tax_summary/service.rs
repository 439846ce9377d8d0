use anyhow::Result;
use contracts::dashboards::d401_executive_kpi::month_bounds;
use contracts::dashboards::d402_tax_summary::{TaxRates, TaxRow, TaxSummaryRequest, TaxSummaryResponse};
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerKind};

use crate::domain::a007_ledger_entry;
use crate::shared::config;
use crate::shared::error::ServiceError;

/// Строки по месяцам из проводок журнала.
/// Месяцы без проводок попадают в отчёт с нулями.
pub fn compute(year: i32, months: &[u32], entries: &[LedgerEntry], rates: TaxRates) -> Vec<TaxRow> {
    months
        .iter()
        .filter_map(|&month| {
            let (first, last) = month_bounds(year, month)?;
            let mut income = 0.0;
            let mut deductible = 0.0;
            let mut other = 0.0;
            for entry in entries
                .iter()
                .filter(|e| e.entry_date >= first && e.entry_date <= last)
            {
                match entry.kind {
                    LedgerKind::Income => income += entry.amount,
                    LedgerKind::Expense if entry.tax_deductible => deductible += entry.amount,
                    LedgerKind::Expense => other += entry.amount,
                }
            }
            Some(TaxRow::compute(
                format!("{:04}-{:02}", year, month),
                income,
                deductible,
                other,
                rates,
            ))
        })
        .collect()
}

pub fn configured_rates() -> TaxRates {
    let tax = &config::get().tax;
    TaxRates {
        vat_rate: tax.vat_rate,
        income_tax_rate: tax.income_tax_rate,
    }
}

/// Налоговая сводка за год или квартал
pub async fn get_tax_summary(request: TaxSummaryRequest) -> Result<TaxSummaryResponse> {
    let months = request.months().map_err(ServiceError::validation)?;
    let from = months
        .first()
        .and_then(|&m| month_bounds(request.year, m))
        .map(|(first, _)| first);
    let to = months
        .last()
        .and_then(|&m| month_bounds(request.year, m))
        .map(|(_, last)| last);
    if from.is_none() || to.is_none() {
        return Err(ServiceError::validation(format!("Некорректный год: {}", request.year)));
    }

    let entries = a007_ledger_entry::service::list_filtered(None, from, to).await?;
    let rates = configured_rates();
    let rows = compute(request.year, &months, &entries, rates);
    let total = TaxRow::total(&rows, rates);

    tracing::info!(
        "Tax summary {} q{:?}: income {}, taxable {}",
        request.year,
        request.quarter,
        total.income,
        total.taxable_income
    );

    Ok(TaxSummaryResponse {
        year: request.year,
        quarter: request.quarter,
        rates,
        rows,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a007_ledger_entry::LedgerEntryDto;

    const RATES: TaxRates = TaxRates {
        vat_rate: 0.2,
        income_tax_rate: 0.2,
    };

    fn entry(month: u32, kind: LedgerKind, amount: f64, deductible: bool) -> LedgerEntry {
        LedgerEntry::new_for_insert(&LedgerEntryDto {
            entry_date: NaiveDate::from_ymd_opt(2025, month, 15).unwrap(),
            kind,
            category: "test".into(),
            amount,
            tax_deductible: deductible,
            description: "test".into(),
            ..Default::default()
        })
    }

    #[test]
    fn splits_deductible_and_other_expenses() {
        let entries = vec![
            entry(4, LedgerKind::Income, 60_000.0, false),
            entry(4, LedgerKind::Expense, 10_000.0, true),
            entry(4, LedgerKind::Expense, 3_000.0, false),
            entry(6, LedgerKind::Income, 12_000.0, false),
        ];
        let rows = compute(2025, &[4, 5, 6], &entries, RATES);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].period, "2025-04");
        assert_eq!(rows[0].deductible_expenses, 10_000.0);
        assert_eq!(rows[0].other_expenses, 3_000.0);
        assert_eq!(rows[0].taxable_income, 50_000.0);
        assert_eq!(rows[0].vat_due, 10_000.0);
        assert_eq!(rows[1].income, 0.0);
        assert_eq!(rows[2].income_tax, 2_400.0);

        let total = TaxRow::total(&rows, RATES);
        assert_eq!(total.income, 72_000.0);
        assert_eq!(total.income_tax, 12_400.0);
    }
}
