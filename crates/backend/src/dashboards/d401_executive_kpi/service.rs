use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d401_executive_kpi::{
    month_bounds, shift_month, ExecutiveKpiRequest, ExecutiveKpiResponse, MonthValue,
};
use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_vehicle::{Vehicle, VehicleStatus};
use contracts::domain::a003_rental_contract::{ContractStatus, RentalContract};
use contracts::domain::a007_ledger_entry::{LedgerEntry, LedgerSummary};
use contracts::domain::common::today;
use contracts::shared::indicators::{IndicatorStatus, KpiValue, ValueFormat};
use contracts::shared::validation::round_money;

use crate::domain::{a001_customer, a002_vehicle, a003_rental_contract, a007_ledger_entry};
use crate::shared::error::ServiceError;

const REVENUE_SERIES_MONTHS: i32 = 12;

/// Данные, из которых считаются показатели
pub struct KpiSource<'a> {
    pub ledger: &'a [LedgerEntry],
    pub contracts: &'a [RentalContract],
    pub vehicles: &'a [Vehicle],
    pub customers: &'a [Customer],
}

fn within(date: NaiveDate, bounds: (NaiveDate, NaiveDate)) -> bool {
    date >= bounds.0 && date <= bounds.1
}

fn ledger_for(ledger: &[LedgerEntry], bounds: (NaiveDate, NaiveDate)) -> LedgerSummary {
    LedgerSummary::from_entries(ledger.iter().filter(|e| within(e.entry_date, bounds)))
}

pub fn compute(
    year: i32,
    month: u32,
    source: &KpiSource<'_>,
    today: NaiveDate,
) -> Result<ExecutiveKpiResponse> {
    let current = month_bounds(year, month)
        .ok_or_else(|| ServiceError::validation(format!("Некорректный месяц: {}-{}", year, month)))?;
    let (py, pm) = shift_month(year, month, -1);
    let previous = month_bounds(py, pm)
        .ok_or_else(|| ServiceError::validation("Некорректный предыдущий месяц"))?;

    let now = ledger_for(source.ledger, current);
    let before = ledger_for(source.ledger, previous);

    let live: Vec<&RentalContract> = source
        .contracts
        .iter()
        .filter(|c| c.status != ContractStatus::Cancelled)
        .collect();
    let active = live.iter().filter(|c| c.status == ContractStatus::Active).count();
    let overdue = live.iter().filter(|c| c.is_overdue(today)).count();
    let outstanding = round_money(live.iter().map(|c| c.balance_due().max(0.0)).sum());

    let started: Vec<&&RentalContract> = live.iter().filter(|c| within(c.start_date, current)).collect();
    let average_value = if started.is_empty() {
        0.0
    } else {
        round_money(started.iter().map(|c| c.total_amount).sum::<f64>() / started.len() as f64)
    };

    let fleet: Vec<&Vehicle> = source.vehicles.iter().filter(|v| v.status.in_fleet()).collect();
    let rented = fleet.iter().filter(|v| v.status == VehicleStatus::Rented).count();
    let utilization = if fleet.is_empty() {
        0.0
    } else {
        rented as f64 / fleet.len() as f64 * 100.0
    };

    let new_customers = |bounds: (NaiveDate, NaiveDate)| {
        source
            .customers
            .iter()
            .filter(|c| within(c.base.metadata.created_at.date_naive(), bounds))
            .count() as f64
    };

    let kpis = vec![
        KpiValue::compared("revenue", "Выручка", "wallet", ValueFormat::rub(), now.income, before.income, true),
        KpiValue::compared("expenses", "Расходы", "receipt", ValueFormat::rub(), now.expense, before.expense, false),
        KpiValue::compared("net", "Прибыль", "trending-up", ValueFormat::rub(), now.net, before.net, true),
        KpiValue::plain("active_contracts", "Активные договоры", "file-text", ValueFormat::Integer, active as f64),
        KpiValue::plain("overdue_contracts", "Просроченные возвраты", "alert-triangle", ValueFormat::Integer, overdue as f64)
            .with_status(if overdue > 0 { IndicatorStatus::Warning } else { IndicatorStatus::Good }),
        KpiValue::plain("fleet_size", "Автомобилей в парке", "truck", ValueFormat::Integer, fleet.len() as f64)
            .with_subtitle(format!("в аренде: {}", rented)),
        KpiValue::plain("utilization", "Загрузка парка", "activity", ValueFormat::Percent { decimals: 1 }, utilization),
        KpiValue::compared(
            "new_customers",
            "Новые клиенты",
            "user-plus",
            ValueFormat::Integer,
            new_customers(current),
            new_customers(previous),
            true,
        ),
        KpiValue::plain("average_contract", "Средний договор", "bar-chart", ValueFormat::rub(), average_value)
            .with_subtitle(format!("договоров за месяц: {}", started.len())),
        KpiValue::plain("outstanding", "К получению", "clock", ValueFormat::rub(), outstanding)
            .with_status(if outstanding > 0.0 { IndicatorStatus::Warning } else { IndicatorStatus::Neutral }),
    ];

    let revenue_by_month = (0..REVENUE_SERIES_MONTHS)
        .rev()
        .filter_map(|back| {
            let (y, m) = shift_month(year, month, -back);
            month_bounds(y, m).map(|bounds| MonthValue {
                period: format!("{:04}-{:02}", y, m),
                value: ledger_for(source.ledger, bounds).income,
            })
        })
        .collect();

    Ok(ExecutiveKpiResponse {
        period: format!("{:04}-{:02}", year, month),
        kpis,
        revenue_by_month,
    })
}

/// Ключевые показатели за месяц
pub async fn get_executive_kpi(request: ExecutiveKpiRequest) -> Result<ExecutiveKpiResponse> {
    let (sy, sm) = shift_month(request.year, request.month, -(REVENUE_SERIES_MONTHS - 1));
    let series_start = month_bounds(sy, sm).map(|(first, _)| first);
    let period_end = month_bounds(request.year, request.month).map(|(_, last)| last);

    let ledger = a007_ledger_entry::service::list_filtered(None, series_start, period_end).await?;
    let contracts = a003_rental_contract::service::list_all().await?;
    let vehicles = a002_vehicle::service::list_all().await?;
    let customers = a001_customer::service::list_all().await?;

    let source = KpiSource {
        ledger: &ledger,
        contracts: &contracts,
        vehicles: &vehicles,
        customers: &customers,
    };
    compute(request.year, request.month, &source, today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::CustomerId;
    use contracts::domain::a002_vehicle::VehicleDto;
    use contracts::domain::a003_rental_contract::RentalContractDto;
    use contracts::domain::a007_ledger_entry::{LedgerEntryDto, LedgerKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(date: NaiveDate, kind: LedgerKind, amount: f64) -> LedgerEntry {
        LedgerEntry::new_for_insert(&LedgerEntryDto {
            entry_date: date,
            kind,
            category: "test".into(),
            amount,
            description: "test".into(),
            ..Default::default()
        })
    }

    fn vehicle(status: VehicleStatus) -> Vehicle {
        let mut v = Vehicle::new_for_insert(&VehicleDto {
            plate_number: "A001AA77".into(),
            make: "Kia".into(),
            model: "Rio".into(),
            year: 2022,
            daily_rate: 2500.0,
            ..Default::default()
        });
        v.status = status;
        v
    }

    fn contract(start: NaiveDate, end: NaiveDate, paid: f64) -> RentalContract {
        RentalContract::new_for_insert(
            CustomerId::new_v4(),
            vehicle(VehicleStatus::Rented).base.id,
            &RentalContractDto {
                start_date: start,
                end_date: end,
                daily_rate: 1000.0,
                paid_amount: paid,
                ..Default::default()
            },
            0,
        )
    }

    fn kpi<'a>(response: &'a ExecutiveKpiResponse, id: &str) -> &'a KpiValue {
        response.kpis.iter().find(|k| k.id == id).unwrap()
    }

    #[test]
    fn month_over_month_and_fleet_figures() {
        let ledger = vec![
            entry(d(2025, 4, 10), LedgerKind::Income, 10_000.0),
            entry(d(2025, 5, 3), LedgerKind::Income, 15_000.0),
            entry(d(2025, 5, 20), LedgerKind::Expense, 4_000.0),
        ];
        let contracts = vec![
            contract(d(2025, 5, 1), d(2025, 5, 6), 5_000.0),
            contract(d(2025, 5, 10), d(2025, 5, 30), 0.0),
        ];
        let vehicles = vec![
            vehicle(VehicleStatus::Rented),
            vehicle(VehicleStatus::Available),
            vehicle(VehicleStatus::Available),
            vehicle(VehicleStatus::Rented),
            vehicle(VehicleStatus::OutOfService),
        ];
        let source = KpiSource {
            ledger: &ledger,
            contracts: &contracts,
            vehicles: &vehicles,
            customers: &[],
        };

        let response = compute(2025, 5, &source, d(2025, 5, 15)).unwrap();
        assert_eq!(response.period, "2025-05");

        let revenue = kpi(&response, "revenue");
        assert_eq!(revenue.value, Some(15_000.0));
        assert_eq!(revenue.change_percent, Some(50.0));
        assert_eq!(revenue.status, IndicatorStatus::Good);

        assert_eq!(kpi(&response, "net").value, Some(11_000.0));
        assert_eq!(kpi(&response, "active_contracts").value, Some(2.0));
        // первый договор закончился 6 мая и не закрыт
        assert_eq!(kpi(&response, "overdue_contracts").value, Some(1.0));
        assert_eq!(kpi(&response, "overdue_contracts").status, IndicatorStatus::Warning);
        assert_eq!(kpi(&response, "fleet_size").value, Some(4.0));
        assert_eq!(kpi(&response, "utilization").value, Some(50.0));
        assert_eq!(kpi(&response, "average_contract").value, Some(12_500.0));
        assert_eq!(kpi(&response, "outstanding").value, Some(20_000.0));

        assert_eq!(response.revenue_by_month.len(), 12);
        assert_eq!(response.revenue_by_month[0].period, "2024-06");
        assert_eq!(response.revenue_by_month[10].value, 10_000.0);
        assert_eq!(response.revenue_by_month[11].value, 15_000.0);
    }

    #[test]
    fn empty_data_gives_zeroes() {
        let source = KpiSource {
            ledger: &[],
            contracts: &[],
            vehicles: &[],
            customers: &[],
        };
        let response = compute(2025, 1, &source, d(2025, 1, 31)).unwrap();
        assert_eq!(kpi(&response, "revenue").change_percent, None);
        assert_eq!(kpi(&response, "utilization").value, Some(0.0));
        assert_eq!(kpi(&response, "overdue_contracts").status, IndicatorStatus::Good);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let source = KpiSource {
            ledger: &[],
            contracts: &[],
            vehicles: &[],
            customers: &[],
        };
        assert!(compute(2025, 13, &source, d(2025, 1, 1)).is_err());
    }
}
