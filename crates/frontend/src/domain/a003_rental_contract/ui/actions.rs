//! Действия по договору: закрытие с возвратом автомобиля и приём оплаты

use chrono::NaiveDate;
use contracts::domain::a003_rental_contract::{
    CompleteContractRequest, ContractListItem, LATE_FEE_MULTIPLIER,
};
use contracts::domain::common::today;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_rental_contract::api;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::stat_card::format_money;
use crate::shared::components::toast::use_toasts;
use crate::shared::date_utils::{parse_input, to_input};
use crate::shared::form_utils::{parse_f64, parse_i64};
use crate::shared::icons::icon;

/// Штраф за просрочку возврата по строке списка
pub fn estimated_late_fee(item: &ContractListItem, returned_at: NaiveDate) -> f64 {
    let days_late = (returned_at - item.end_date).num_days().max(0);
    if days_late == 0 || item.rental_days <= 0 {
        return 0.0;
    }
    let rate = item.total_amount / item.rental_days as f64;
    (days_late as f64 * rate * LATE_FEE_MULTIPLIER * 100.0).round() / 100.0
}

/// Поля формы закрытия -> запрос. Пустая дата означает "сегодня" на сервере
pub fn complete_request(
    end_mileage: &str,
    returned_at: &str,
    extra_payment: &str,
) -> Result<CompleteContractRequest, String> {
    if end_mileage.trim().is_empty() {
        return Err("Укажите пробег при возврате".into());
    }
    Ok(CompleteContractRequest {
        end_mileage: parse_i64("Пробег при возврате", end_mileage)?,
        returned_at: parse_input(returned_at)?,
        extra_payment: parse_f64("Доплата", extra_payment)?,
    })
}

#[component]
fn FormError(error: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn CompleteContractForm(
    item: ContractListItem,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toasts = use_toasts();
    let end_mileage = RwSignal::new(String::new());
    let returned_at = RwSignal::new(to_input(&Some(today())));
    let extra_payment = RwSignal::new(String::new());
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let item = StoredValue::new(item);

    let late_fee = Signal::derive(move || {
        parse_input(&returned_at.get())
            .ok()
            .flatten()
            .map(|date| item.with_value(|i| estimated_late_fee(i, date)))
            .unwrap_or(0.0)
    });

    let on_save = move |_| {
        let request = complete_request(
            &end_mileage.get_untracked(),
            &returned_at.get_untracked(),
            &extra_payment.get_untracked(),
        );
        let request = match request {
            Ok(r) => r,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        saving.set(true);
        error.set(None);
        let id = item.with_value(|i| i.id.clone());
        spawn_local(async move {
            match api::complete_contract(&id, &request).await {
                Ok(()) => {
                    toasts.success("Договор закрыт, автомобиль свободен");
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">{item.with_value(|i| format!("Закрытие договора {}", i.code))}</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            <FormError error=error />
            <p>{item.with_value(|i| format!("{} · {} {}", i.customer_name, i.plate_number, i.vehicle_name))}</p>
            <div class="form__group">
                <Label>"Пробег при возврате, км"</Label>
                <Input value=end_mileage />
            </div>
            <div class="form__group">
                <Label>"Дата возврата"</Label>
                <DateInput value=returned_at />
            </div>
            <div class="form__group">
                <Label>"Доплата, ₽"</Label>
                <Input value=extra_payment />
            </div>
            <div class="form__static">
                {move || {
                    let fee = late_fee.get();
                    let due = item.with_value(|i| i.balance_due) + fee;
                    format!("Штраф за просрочку: {} · К оплате: {}", format_money(fee), format_money(due))
                }}
            </div>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                "Отмена"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                "Закрыть договор"
            </Button>
        </div>
    }
}

#[component]
pub fn PaymentForm(
    item: ContractListItem,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toasts = use_toasts();
    let amount = RwSignal::new(if item.balance_due > 0.0 {
        format!("{:.2}", item.balance_due)
    } else {
        String::new()
    });
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let contract_id = StoredValue::new(item.id.clone());

    let on_save = move |_| {
        let value = match parse_f64("Сумма", &amount.get_untracked()) {
            Ok(v) if v > 0.0 => v,
            Ok(_) => {
                error.set(Some("Сумма платежа должна быть больше нуля".into()));
                return;
            }
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        saving.set(true);
        error.set(None);
        let id = contract_id.get_value();
        spawn_local(async move {
            match api::record_payment(&id, value).await {
                Ok(()) => {
                    toasts.success(format!("Оплата {} принята", format_money(value)));
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">{format!("Оплата по договору {}", item.code)}</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            <FormError error=error />
            <p>{format!("Остаток к оплате: {}", format_money(item.balance_due))}</p>
            <div class="form__group">
                <Label>"Сумма, ₽"</Label>
                <Input value=amount />
            </div>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                "Отмена"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                "Принять"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_rental_contract::ContractStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn item() -> ContractListItem {
        ContractListItem {
            id: "1".into(),
            code: "RC-1".into(),
            customer_id: "c".into(),
            customer_name: "Иванов".into(),
            vehicle_id: "v".into(),
            plate_number: "A001AA77".into(),
            vehicle_name: "Kia Rio".into(),
            start_date: d(2025, 3, 1),
            end_date: d(2025, 3, 5),
            rental_days: 4,
            total_amount: 8000.0,
            paid_amount: 8000.0,
            balance_due: 0.0,
            status: ContractStatus::Active,
            is_overdue: false,
        }
    }

    #[test]
    fn no_fee_when_returned_on_time() {
        assert_eq!(estimated_late_fee(&item(), d(2025, 3, 5)), 0.0);
        assert_eq!(estimated_late_fee(&item(), d(2025, 3, 3)), 0.0);
    }

    #[test]
    fn complete_request_requires_mileage() {
        assert!(complete_request("", "2025-03-05", "").is_err());
        let r = complete_request("12 500", "", "1000,5").unwrap();
        assert_eq!(r.end_mileage, 12_500);
        assert_eq!(r.returned_at, None);
        assert_eq!(r.extra_payment, 1000.5);
    }

    #[test]
    fn fee_is_one_and_half_rate_per_day() {
        // ставка 2000, два дня просрочки
        assert_eq!(estimated_late_fee(&item(), d(2025, 3, 7)), 6000.0);
    }
}
