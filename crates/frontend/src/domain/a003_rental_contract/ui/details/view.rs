use super::view_model::RentalContractDetailsVm;
use contracts::domain::a003_rental_contract::ContractStatus;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::stat_card::format_money;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn RentalContractDetails(
    id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = RentalContractDetailsVm::new();
    vm.load_references();
    if let Some(existing_id) = id {
        vm.load(existing_id);
    }

    let is_edit_mode = vm.is_edit_mode();
    let read_only = vm.is_read_only();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();
    let preview = vm.preview();
    let customer_options = vm.customer_options();
    let vehicle_options = vm.vehicle_options();
    // Клиента и автомобиль после выдачи не меняем
    let parties_locked = Signal::derive(move || is_edit_mode.get());

    view! {
        <PageFrame page_id="a003_rental_contract--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() {
                            format!("Договор {}", vm.code.get())
                        } else {
                            "Новый договор аренды".to_string()
                        }}
                    </h1>
                    <Show when=move || is_edit_mode.get()>
                        <span class="badge badge--neutral">{move || vm.status.get().label()}</span>
                    </Show>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.save(on_saved)
                        disabled=is_save_disabled
                    >
                        {icon("save")} " Сохранить"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                        {icon("x")} " Закрыть"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|err| view! {
                    <div class="warning-box warning-box--error">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{err}</span>
                    </div>
                })}
                <Show when=move || read_only.get()>
                    <div class="warning-box">
                        <span class="warning-box__icon">"ℹ"</span>
                        <span class="warning-box__text">"Договор закрыт, изменение условий недоступно"</span>
                    </div>
                </Show>
                {move || (!vm.loading.get() && !read_only.get()).then(|| hint.get()).flatten().map(|h| view! {
                    <div class="form__hint">{h}</div>
                })}

                <CardAnimated delay_ms=0 title="Стороны">
                    <div class="details-grid--3col">
                        <div class="form__group" style="grid-column: 1 / 3;">
                            <label class="form__label">"Клиент *"</label>
                            <select
                                class="form__select"
                                prop:value=move || vm.customer_id.get()
                                prop:disabled=move || parties_locked.get()
                                on:change=move |ev| vm.customer_id.set(event_target_value(&ev))
                            >
                                <option value="">"Выберите клиента"</option>
                                <For
                                    each=move || customer_options.get()
                                    key=|(id, _)| id.clone()
                                    children=move |(id, label)| {
                                        let value = id.clone();
                                        view! {
                                            <option value=value prop:selected=move || vm.customer_id.get() == id>{label}</option>
                                        }
                                    }
                                />
                            </select>
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Описание"</label>
                            <Input value=vm.description placeholder="По умолчанию: Договор аренды <код>" />
                        </div>
                        <div class="form__group" style="grid-column: 1 / 3;">
                            <label class="form__label">"Автомобиль *"</label>
                            <select
                                class="form__select"
                                prop:value=move || vm.vehicle_id.get()
                                prop:disabled=move || parties_locked.get()
                                on:change=move |ev| vm.vehicle_id.set(event_target_value(&ev))
                            >
                                <option value="">"Выберите автомобиль"</option>
                                <For
                                    each=move || vehicle_options.get()
                                    key=|(id, _)| id.clone()
                                    children=move |(id, label)| {
                                        let value = id.clone();
                                        view! {
                                            <option value=value prop:selected=move || vm.vehicle_id.get() == id>{label}</option>
                                        }
                                    }
                                />
                            </select>
                        </div>
                    </div>
                </CardAnimated>

                <CardAnimated delay_ms=80 title="Условия">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Начало *"</label>
                            <DateInput value=vm.start_date disabled=read_only />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Окончание *"</label>
                            <DateInput value=vm.end_date disabled=read_only />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Ставка, ₽/сут"</label>
                            <Input value=vm.daily_rate placeholder="Тариф автомобиля" disabled=read_only />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Залог, ₽"</label>
                            <Input value=vm.deposit disabled=read_only />
                        </div>
                        <div class="form__group">
                            <label class="form__label">
                                {move || if is_edit_mode.get() { "Оплачено, ₽" } else { "Предоплата, ₽" }}
                            </label>
                            // после выдачи оплата принимается только через «Принять оплату»
                            <Input value=vm.paid_amount disabled=parties_locked />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Итого"</label>
                            <div class="form__static">
                                {move || match preview.get() {
                                    Some((days, total)) => format!("{} сут. · {}", days, format_money(total)),
                                    None => "-".to_string(),
                                }}
                            </div>
                        </div>
                        <div class="form__group" style="grid-column: 1 / -1;">
                            <label class="form__label">"Комментарий"</label>
                            <Textarea value=vm.comment attr:rows=2 />
                        </div>
                    </div>
                </CardAnimated>

                <Show when=move || vm.status.get() == ContractStatus::Completed>
                    <CardAnimated delay_ms=160 title="Возврат">
                        <div class="details-grid--3col">
                            <div class="form__group">
                                <label class="form__label">"Дата возврата"</label>
                                <div class="form__static">{move || format_date(&vm.returned_at.get())}</div>
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Пробег выдача / возврат"</label>
                                <div class="form__static">
                                    {move || format!(
                                        "{} / {}",
                                        vm.start_mileage.get(),
                                        vm.end_mileage.get().map(|m| m.to_string()).unwrap_or_default()
                                    )}
                                </div>
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Штраф за просрочку"</label>
                                <div class="form__static">{move || format_money(vm.late_fee.get())}</div>
                            </div>
                        </div>
                    </CardAnimated>
                </Show>
            </div>
        </PageFrame>
    }
}
