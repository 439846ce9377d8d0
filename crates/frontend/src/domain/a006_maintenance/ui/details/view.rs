use super::view_model::MaintenanceDetailsVm;
use contracts::domain::a006_maintenance::MaintenanceKind;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::DateInput;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

/// `vehicle_id` предзаполняет автомобиль для новой записи
#[component]
pub fn MaintenanceDetails(
    id: Option<String>,
    #[prop(optional)] vehicle_id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = MaintenanceDetailsVm::new();
    vm.load_vehicles();
    match id {
        Some(existing_id) => vm.load(existing_id),
        None => {
            if let Some(v) = vehicle_id {
                vm.vehicle_id.set(v);
            }
        }
    }

    let is_edit_mode = vm.is_edit_mode();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();
    let vehicle_options = vm.vehicle_options();

    view! {
        <PageFrame page_id="a006_maintenance--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() {
                            format!("Обслуживание {}", vm.code.get())
                        } else {
                            "Новая запись обслуживания".to_string()
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

                <CardAnimated delay_ms=0 title="Работы">
                    <div class="details-grid--3col">
                        <div class="form__group" style="grid-column: 1 / 3;">
                            <label class="form__label">"Автомобиль *"</label>
                            <select
                                class="form__select"
                                prop:value=move || vm.vehicle_id.get()
                                prop:disabled=move || is_edit_mode.get()
                                on:change=move |ev| vm.select_vehicle(event_target_value(&ev))
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
                        <div class="form__group">
                            <label class="form__label">"Дата *"</label>
                            <DateInput value=vm.service_date />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Вид работ"</label>
                            <Select value=vm.kind>
                                {MaintenanceKind::ALL
                                    .iter()
                                    .map(|k| view! { <option value=k.as_str()>{k.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <div class="form__group" style="grid-column: 2 / -1;">
                            <label class="form__label">"Описание"</label>
                            <Input value=vm.description placeholder="По умолчанию вид работ" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Стоимость, ₽"</label>
                            <Input value=vm.cost />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Пробег, км"</label>
                            <Input value=vm.mileage />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Исполнитель"</label>
                            <Input value=vm.vendor />
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
