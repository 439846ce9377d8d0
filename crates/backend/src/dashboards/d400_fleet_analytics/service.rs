use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d400_fleet_analytics::{
    FleetAnalyticsRequest, FleetAnalyticsResponse, FleetTotals, VehicleProfitability,
};
use contracts::dashboards::d401_executive_kpi::{month_bounds, shift_month};
use contracts::domain::a002_vehicle::Vehicle;
use contracts::domain::a003_rental_contract::{ContractStatus, RentalContract};
use contracts::domain::a006_maintenance::MaintenanceRecord;
use contracts::shared::metrics::{
    profit_margin, profitability_score, return_on_investment, seasonal_pattern, usage_trend,
    utilization, TREND_WINDOW_MONTHS,
};
use contracts::shared::validation::round_money;

use crate::domain::{a002_vehicle, a003_rental_contract, a006_maintenance};
use crate::shared::error::ServiceError;

/// Месяцы окна тренда, заканчивающегося месяцем `to`: (первый день, последний день)
pub fn trend_months(to: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    (0..TREND_WINDOW_MONTHS as i32)
        .rev()
        .filter_map(|back| {
            let (y, m) = shift_month(to.year(), to.month(), -back);
            month_bounds(y, m)
        })
        .collect()
}

/// Выручка договора, приходящаяся на период, пропорционально дням
pub fn prorated_revenue(contract: &RentalContract, from: NaiveDate, to: NaiveDate) -> f64 {
    if contract.status == ContractStatus::Cancelled {
        return 0.0;
    }
    let span = contract.billed_days();
    if span <= 0 {
        return 0.0;
    }
    let overlap = contract.days_within(from, to);
    (contract.total_amount + contract.late_fee) * overlap as f64 / span as f64
}

/// Расчёт аналитики по уже загруженным данным.
/// `contracts` должны покрывать и период, и окно тренда.
pub fn compute(
    from: NaiveDate,
    to: NaiveDate,
    vehicles: &[Vehicle],
    contracts: &[RentalContract],
    maintenance: &[MaintenanceRecord],
) -> FleetAnalyticsResponse {
    let period_days = ((to - from).num_days() + 1) as f64;
    let months = trend_months(to);

    let mut rows: Vec<VehicleProfitability> = vehicles
        .iter()
        .map(|vehicle| {
            let vehicle_id = vehicle.base.id;
            let own: Vec<&RentalContract> = contracts
                .iter()
                .filter(|c| c.vehicle_id == vehicle_id && c.status != ContractStatus::Cancelled)
                .collect();

            let revenue = round_money(own.iter().map(|c| prorated_revenue(c, from, to)).sum());
            let rented_days: i64 = own.iter().map(|c| c.days_within(from, to)).sum();
            let maintenance_cost = round_money(
                maintenance
                    .iter()
                    .filter(|m| m.vehicle_id == vehicle_id && m.service_date >= from && m.service_date <= to)
                    .map(|m| m.cost)
                    .sum(),
            );
            let profit = round_money(revenue - maintenance_cost);
            let util = utilization(rented_days as f64, period_days);
            let margin = profit_margin(revenue, maintenance_cost);
            let roi = return_on_investment(profit, vehicle.purchase_price);

            let monthly_usage: Vec<f64> = months
                .iter()
                .map(|(first, last)| own.iter().map(|c| c.days_within(*first, *last)).sum::<i64>() as f64)
                .collect();
            let mut window = [0.0; TREND_WINDOW_MONTHS];
            for (slot, value) in window.iter_mut().zip(monthly_usage.iter()) {
                *slot = *value;
            }

            VehicleProfitability {
                vehicle_id: vehicle.to_string_id(),
                plate_number: vehicle.plate_number().to_string(),
                name: vehicle.base.description.clone(),
                status: vehicle.status,
                revenue,
                maintenance_cost,
                profit,
                rented_days,
                utilization: util,
                margin,
                roi,
                profitability_score: profitability_score(margin, util, roi),
                trend: usage_trend(&window),
                seasonal: seasonal_pattern(&monthly_usage),
                monthly_usage,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.profitability_score.total_cmp(&a.profitability_score));

    let count = rows.len() as f64;
    let totals = FleetTotals {
        vehicles: rows.len() as u32,
        revenue: round_money(rows.iter().map(|r| r.revenue).sum()),
        maintenance_cost: round_money(rows.iter().map(|r| r.maintenance_cost).sum()),
        profit: round_money(rows.iter().map(|r| r.profit).sum()),
        average_utilization: if count > 0.0 {
            rows.iter().map(|r| r.utilization).sum::<f64>() / count
        } else {
            0.0
        },
        average_score: if count > 0.0 {
            rows.iter().map(|r| r.profitability_score).sum::<f64>() / count
        } else {
            0.0
        },
    };

    FleetAnalyticsResponse {
        date_from: from,
        date_to: to,
        month_labels: months.iter().map(|(first, _)| first.format("%Y-%m").to_string()).collect(),
        vehicles: rows,
        totals,
    }
}

/// Прибыльность автопарка за период
pub async fn get_fleet_analytics(request: FleetAnalyticsRequest) -> Result<FleetAnalyticsResponse> {
    let (from, to) = (request.date_from, request.date_to);
    if to < from {
        return Err(ServiceError::validation("Дата окончания раньше даты начала"));
    }

    let window_start = trend_months(to).first().map(|(first, _)| *first).unwrap_or(from);
    let vehicles: Vec<Vehicle> = a002_vehicle::service::list_all()
        .await?
        .into_iter()
        .filter(|v| v.status.in_fleet())
        .collect();
    let contracts = a003_rental_contract::repository::list_overlapping(window_start.min(from), to).await?;
    let maintenance = a006_maintenance::service::list_all().await?;

    Ok(compute(from, to, &vehicles, &contracts, &maintenance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::CustomerId;
    use contracts::domain::a002_vehicle::VehicleDto;
    use contracts::domain::a003_rental_contract::RentalContractDto;
    use contracts::domain::a006_maintenance::MaintenanceDto;
    use contracts::shared::metrics::TrendDirection;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn vehicle(plate: &str, price: f64) -> Vehicle {
        Vehicle::new_for_insert(&VehicleDto {
            plate_number: plate.into(),
            make: "Skoda".into(),
            model: "Octavia".into(),
            year: 2023,
            daily_rate: 3000.0,
            purchase_price: price,
            ..Default::default()
        })
    }

    fn contract(v: &Vehicle, start: NaiveDate, end: NaiveDate) -> RentalContract {
        RentalContract::new_for_insert(
            CustomerId::new_v4(),
            v.base.id,
            &RentalContractDto {
                start_date: start,
                end_date: end,
                daily_rate: 1000.0,
                ..Default::default()
            },
            0,
        )
    }

    #[test]
    fn trend_window_ends_with_target_month() {
        let months = trend_months(d(2025, 2, 14));
        assert_eq!(months.len(), 6);
        assert_eq!(months[0].0, d(2024, 9, 1));
        assert_eq!(months[5], (d(2025, 2, 1), d(2025, 2, 28)));
    }

    #[test]
    fn revenue_is_prorated_by_overlap() {
        let v = vehicle("A001AA77", 1_000_000.0);
        // 10 суток по 1000: 7 в марте, 3 в апреле, день возврата не считается
        let c = contract(&v, d(2025, 3, 25), d(2025, 4, 4));
        let march = prorated_revenue(&c, d(2025, 3, 1), d(2025, 3, 31));
        let april = prorated_revenue(&c, d(2025, 4, 1), d(2025, 4, 30));
        assert!((march - 7_000.0).abs() < 1e-6);
        assert!((april - 3_000.0).abs() < 1e-6);
    }

    #[test]
    fn cancelled_contract_earns_nothing() {
        let v = vehicle("A001AA77", 1_000_000.0);
        let mut c = contract(&v, d(2025, 3, 1), d(2025, 3, 5));
        c.cancel().unwrap();
        assert_eq!(prorated_revenue(&c, d(2025, 3, 1), d(2025, 3, 31)), 0.0);
    }

    #[test]
    fn compute_rows_and_totals() {
        let busy = vehicle("A001AA77", 100_000.0);
        let idle = vehicle("B002BB77", 100_000.0);
        let contracts = vec![contract(&busy, d(2025, 3, 1), d(2025, 3, 11))];
        let repair = MaintenanceRecord::new_for_insert(
            busy.base.id,
            &MaintenanceDto {
                service_date: d(2025, 3, 20),
                cost: 2_000.0,
                ..Default::default()
            },
        );

        let response = compute(
            d(2025, 3, 1),
            d(2025, 3, 31),
            &[idle.clone(), busy.clone()],
            &contracts,
            &[repair],
        );

        assert_eq!(response.vehicles.len(), 2);
        let top = &response.vehicles[0];
        assert_eq!(top.plate_number, busy.plate_number());
        assert_eq!(top.revenue, 10_000.0);
        assert_eq!(top.maintenance_cost, 2_000.0);
        assert_eq!(top.profit, 8_000.0);
        assert_eq!(top.rented_days, 10);
        assert_eq!(top.monthly_usage.last(), Some(&10.0));
        assert!((top.utilization - 10.0 / 31.0).abs() < 1e-9);
        assert_eq!(top.trend.direction, TrendDirection::Up);

        let bottom = &response.vehicles[1];
        assert_eq!(bottom.revenue, 0.0);
        assert_eq!(bottom.profitability_score, 0.0);

        assert_eq!(response.totals.vehicles, 2);
        assert_eq!(response.totals.profit, 8_000.0);
        assert_eq!(response.month_labels.last().map(String::as_str), Some("2025-03"));
    }
}
