use super::view_model::EmployeeDetailsVm;
use contracts::domain::a005_employee::EmployeeStatus;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::DateInput;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn EmployeeDetails(
    id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = EmployeeDetailsVm::new();
    if let Some(existing_id) = id {
        vm.load(existing_id);
    }

    let is_edit_mode = vm.is_edit_mode();
    let is_terminated = vm.is_terminated();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();

    view! {
        <PageFrame page_id="a005_employee--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() {
                            vm.full_name.get()
                        } else {
                            "Новый сотрудник".to_string()
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

                <CardAnimated delay_ms=0 title="Сотрудник">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Табельный номер"</label>
                            <Input value=vm.code placeholder="Присваивается автоматически" />
                        </div>
                        <div class="form__group" style="grid-column: 2 / -1;">
                            <label class="form__label">"ФИО *"</label>
                            <Input value=vm.full_name />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Телефон *"</label>
                            <Input value=vm.phone placeholder="+7 900 000-00-00" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Паспорт *"</label>
                            <Input value=vm.national_id />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Email"</label>
                            <Input value=vm.email />
                        </div>
                    </div>
                </CardAnimated>

                <CardAnimated delay_ms=80 title="Работа">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Должность *"</label>
                            <Input value=vm.position />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Отдел *"</label>
                            <Input value=vm.department />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Оклад, ₽"</label>
                            <Input value=vm.salary />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Дата приёма *"</label>
                            <DateInput value=vm.hire_date />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Статус"</label>
                            <Select value=vm.status>
                                {EmployeeStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Дата увольнения"</label>
                            <DateInput
                                value=vm.termination_date
                                disabled=Signal::derive(move || !is_terminated.get())
                            />
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
