use super::view_model::VehicleDetailsVm;
use contracts::domain::a002_vehicle::{VehicleCategory, VehicleStatus};
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::DateInput;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn VehicleDetails(
    id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = VehicleDetailsVm::new();
    if let Some(existing_id) = id {
        vm.load(existing_id);
    }

    let is_edit_mode = vm.is_edit_mode();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();

    view! {
        <PageFrame page_id="a002_vehicle--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() {
                            format!("Автомобиль {}", vm.plate_number.get())
                        } else {
                            "Новый автомобиль".to_string()
                        }}
                    </h1>
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
                {move || (!vm.loading.get()).then(|| hint.get()).flatten().map(|h| view! {
                    <div class="form__hint">{h}</div>
                })}

                <CardAnimated delay_ms=0 title="Автомобиль">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Госномер *"</label>
                            <Input value=vm.plate_number placeholder="А123ВС77" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Марка *"</label>
                            <Input value=vm.make />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Модель *"</label>
                            <Input value=vm.model />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Год выпуска"</label>
                            <Input value=vm.year />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Цвет"</label>
                            <Input value=vm.color />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"VIN"</label>
                            <Input value=vm.vin placeholder="17 символов" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Класс"</label>
                            <Select value=vm.category>
                                {VehicleCategory::ALL
                                    .iter()
                                    .map(|c| view! { <option value=c.as_str()>{c.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <Show when=move || !is_edit_mode.get()>
                            <div class="form__group">
                                <label class="form__label">"Статус"</label>
                                <Select value=vm.status>
                                    {VehicleStatus::ALL
                                        .iter()
                                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                        </Show>
                    </div>
                </CardAnimated>

                <CardAnimated delay_ms=80 title="Эксплуатация">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Стоимость суток, ₽ *"</label>
                            <Input value=vm.daily_rate />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Пробег, км"</label>
                            <Input value=vm.mileage />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Следующее ТО, км"</label>
                            <Input value=vm.next_service_mileage />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Страховка до"</label>
                            <DateInput value=vm.insurance_expiry />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Регистрация до"</label>
                            <DateInput value=vm.registration_expiry />
                        </div>
                    </div>
                </CardAnimated>

                <CardAnimated delay_ms=160 title="Покупка">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Цена покупки, ₽"</label>
                            <Input value=vm.purchase_price />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Дата покупки"</label>
                            <DateInput value=vm.purchase_date />
                        </div>
                        <div class="form__group" style="grid-column: 1 / -1;">
                            <label class="form__label">"Комментарий"</label>
                            <Textarea value=vm.comment attr:rows=3 />
                        </div>
                    </div>
                </CardAnimated>
            </div>
        </PageFrame>
    }
}
