use serde::{Deserialize, Serialize};

use crate::shared::validation::round_money;

/// Request for tax summary dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSummaryRequest {
    pub year: i32,
    /// 1..=4, None = whole year
    pub quarter: Option<u32>,
}

impl TaxSummaryRequest {
    /// Months covered by the request
    pub fn months(&self) -> Result<Vec<u32>, String> {
        match self.quarter {
            None => Ok((1..=12).collect()),
            Some(q @ 1..=4) => {
                let first = (q - 1) * 3 + 1;
                Ok((first..first + 3).collect())
            }
            Some(q) => Err(format!("Квартал должен быть от 1 до 4, получено {}", q)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    /// VAT rate, prices include VAT
    pub vat_rate: f64,
    pub income_tax_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxRow {
    /// "YYYY-MM" or "total"
    pub period: String,
    pub income: f64,
    pub deductible_expenses: f64,
    pub other_expenses: f64,
    pub taxable_income: f64,
    pub vat_due: f64,
    pub income_tax: f64,
}

impl TaxRow {
    pub fn compute(
        period: String,
        income: f64,
        deductible_expenses: f64,
        other_expenses: f64,
        rates: TaxRates,
    ) -> Self {
        let taxable_income = (income - deductible_expenses).max(0.0);
        let vat_due = if rates.vat_rate > 0.0 {
            income * rates.vat_rate / (1.0 + rates.vat_rate)
        } else {
            0.0
        };
        Self {
            period,
            income: round_money(income),
            deductible_expenses: round_money(deductible_expenses),
            other_expenses: round_money(other_expenses),
            taxable_income: round_money(taxable_income),
            vat_due: round_money(vat_due),
            income_tax: round_money(taxable_income * rates.income_tax_rate),
        }
    }

    /// Period total. Taxes are recomputed from summed amounts.
    pub fn total(rows: &[TaxRow], rates: TaxRates) -> Self {
        let income = rows.iter().map(|r| r.income).sum();
        let deductible = rows.iter().map(|r| r.deductible_expenses).sum();
        let other = rows.iter().map(|r| r.other_expenses).sum();
        Self::compute("total".to_string(), income, deductible, other, rates)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSummaryResponse {
    pub year: i32,
    pub quarter: Option<u32>,
    pub rates: TaxRates,
    pub rows: Vec<TaxRow>,
    pub total: TaxRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES: TaxRates = TaxRates {
        vat_rate: 0.2,
        income_tax_rate: 0.2,
    };

    #[test]
    fn vat_is_extracted_from_inclusive_income() {
        let row = TaxRow::compute("2025-01".into(), 120_000.0, 20_000.0, 5_000.0, RATES);
        assert_eq!(row.vat_due, 20_000.0);
        assert_eq!(row.taxable_income, 100_000.0);
        assert_eq!(row.income_tax, 20_000.0);
    }

    #[test]
    fn losses_do_not_create_negative_tax() {
        let row = TaxRow::compute("2025-02".into(), 10_000.0, 30_000.0, 0.0, RATES);
        assert_eq!(row.taxable_income, 0.0);
        assert_eq!(row.income_tax, 0.0);
    }

    #[test]
    fn total_recomputes_across_months() {
        let rows = vec![
            TaxRow::compute("2025-01".into(), 10_000.0, 30_000.0, 0.0, RATES),
            TaxRow::compute("2025-02".into(), 50_000.0, 10_000.0, 0.0, RATES),
        ];
        let total = TaxRow::total(&rows, RATES);
        assert_eq!(total.taxable_income, 20_000.0);
        assert_eq!(total.income_tax, 4_000.0);
        assert_eq!(total.period, "total");
    }

    #[test]
    fn quarter_months() {
        let req = TaxSummaryRequest { year: 2025, quarter: Some(3) };
        assert_eq!(req.months().unwrap(), vec![7, 8, 9]);
        assert_eq!(TaxSummaryRequest { year: 2025, quarter: None }.months().unwrap().len(), 12);
        assert!(TaxSummaryRequest { year: 2025, quarter: Some(5) }.months().is_err());
    }
}
