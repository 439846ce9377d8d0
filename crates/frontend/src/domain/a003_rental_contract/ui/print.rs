//! Печатная форма договора. Открывается во вкладке, печать средствами браузера.

use contracts::domain::a001_customer::Customer;
use contracts::domain::a002_vehicle::Vehicle;
use contracts::domain::a003_rental_contract::{RentalContract, LATE_FEE_MULTIPLIER};
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_customer::api as customer_api;
use crate::domain::a002_vehicle::api as vehicle_api;
use crate::domain::a003_rental_contract::api;
use crate::shared::components::stat_card::format_money;
use crate::shared::date_utils::{format_naive, format_opt_date};
use crate::shared::export::print_page;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;

#[derive(Clone)]
struct PrintData {
    contract: RentalContract,
    customer: Customer,
    vehicle: Vehicle,
}

async fn load_print_data(id: &str) -> Result<PrintData, String> {
    let contract = api::fetch_contract(id).await?;
    let customer = customer_api::fetch_customer(&contract.customer_id.as_string()).await?;
    let vehicle = vehicle_api::fetch_vehicle(&contract.vehicle_id.as_string()).await?;
    Ok(PrintData {
        contract,
        customer,
        vehicle,
    })
}

#[component]
pub fn ContractPrintView(id: String, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let data: RwSignal<Option<PrintData>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    spawn_local(async move {
        match load_print_data(&id).await {
            Ok(d) => data.set(Some(d)),
            Err(e) => error.set(Some(format!("Не удалось загрузить договор: {}", e))),
        }
    });

    let on_print = move |_| {
        if let Err(e) = print_page() {
            error.set(Some(e));
        }
    };

    view! {
        <PageFrame page_id="a003_rental_contract--print" category=PAGE_CAT_DETAIL>
            <div class="page__header no-print">
                <div class="page__header-left">
                    <h1 class="page__title">"Печатная форма договора"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_print
                        disabled=Signal::derive(move || data.with(|d| d.is_none()))
                    >
                        {icon("printer")} " Печать"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")} " Закрыть"
                    </Button>
                </div>
            </div>

            {move || error.get().map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err}</span>
                </div>
            })}

            <div class="page__content">
                {move || data.get().map(|d| view! { <PrintDocument data=d /> })}
            </div>
        </PageFrame>
    }
}

#[component]
fn PrintDocument(data: PrintData) -> impl IntoView {
    let PrintData {
        contract,
        customer,
        vehicle,
    } = data;
    let balance = contract.balance_due();

    view! {
        <article class="print-document">
            <h2 class="print-document__title">
                {format!("Договор аренды транспортного средства № {}", contract.base.code)}
            </h2>
            <p class="print-document__date">
                {format!("Дата составления: {}", format_naive(&contract.start_date))}
            </p>

            <h3>"1. Арендатор"</h3>
            <table class="print-document__table">
                <tr><td>"ФИО"</td><td>{customer.full_name().to_string()}</td></tr>
                <tr><td>"Паспорт"</td><td>{customer.national_id.clone()}</td></tr>
                <tr><td>"Телефон"</td><td>{customer.phone.clone()}</td></tr>
                <tr>
                    <td>"Водительское удостоверение"</td>
                    <td>{format!("{} до {}", customer.driver_license, format_opt_date(&customer.license_expiry))}</td>
                </tr>
                <tr><td>"Адрес"</td><td>{customer.address.clone().unwrap_or_default()}</td></tr>
            </table>

            <h3>"2. Транспортное средство"</h3>
            <table class="print-document__table">
                <tr><td>"Автомобиль"</td><td>{format!("{} ({} г.)", vehicle.base.description, vehicle.year)}</td></tr>
                <tr><td>"Госномер"</td><td>{vehicle.plate_number().to_string()}</td></tr>
                <tr><td>"VIN"</td><td>{vehicle.vin.clone().unwrap_or_default()}</td></tr>
                <tr><td>"Пробег при выдаче"</td><td>{format!("{} км", contract.start_mileage)}</td></tr>
            </table>

            <h3>"3. Срок и стоимость"</h3>
            <table class="print-document__table">
                <tr>
                    <td>"Период аренды"</td>
                    <td>{format!(
                        "с {} по {} ({} сут.)",
                        format_naive(&contract.start_date),
                        format_naive(&contract.end_date),
                        contract.rental_days()
                    )}</td>
                </tr>
                <tr><td>"Стоимость суток"</td><td>{format_money(contract.daily_rate)}</td></tr>
                <tr><td>"Сумма договора"</td><td>{format_money(contract.total_amount)}</td></tr>
                <tr><td>"Залог"</td><td>{format_money(contract.deposit)}</td></tr>
                <tr><td>"Оплачено"</td><td>{format_money(contract.paid_amount)}</td></tr>
                {(contract.late_fee > 0.0).then(|| view! {
                    <tr><td>"Штраф за просрочку"</td><td>{format_money(contract.late_fee)}</td></tr>
                })}
                <tr><td>"Остаток к оплате"</td><td>{format_money(balance.max(0.0))}</td></tr>
            </table>

            <p class="print-document__terms">
                {format!(
                    "За каждые сутки просрочки возврата начисляется {} суточной ставки.",
                    LATE_FEE_MULTIPLIER
                )}
            </p>

            <div class="print-document__signatures">
                <div>"Арендодатель ____________________"</div>
                <div>"Арендатор ____________________"</div>
            </div>
        </article>
    }
}
