//! Форма клиента (EditDetails MVVM)

use super::view_model::CustomerDetailsVm;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::DateInput;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn CustomerDetails(
    id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = CustomerDetailsVm::new();
    if let Some(existing_id) = id {
        vm.load(existing_id);
    }

    let is_edit_mode = vm.is_edit_mode();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();

    view! {
        <PageFrame page_id="a001_customer--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() { "Клиент" } else { "Новый клиент" }}
                    </h1>
                    {move || vm.is_blacklisted.get().then(|| view! {
                        <span class="badge badge--error">"В чёрном списке"</span>
                    })}
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.save(on_saved)
                        disabled=is_save_disabled
                    >
                        {icon("save")}
                        {move || if vm.saving.get() { " Сохранение..." } else { " Сохранить" }}
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

                <CardAnimated delay_ms=0 title="Личные данные">
                    <div class="details-grid--3col">
                        <div class="form__group" style="grid-column: 1 / 3;">
                            <label class="form__label">"ФИО *"</label>
                            <Input value=vm.full_name placeholder="Иванов Иван Иванович" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Код"</label>
                            <Input value=vm.code placeholder="Присваивается автоматически" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Телефон *"</label>
                            <Input value=vm.phone placeholder="+7 900 000-00-00" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Email"</label>
                            <Input value=vm.email input_type=InputType::Email />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Дата рождения"</label>
                            <DateInput value=vm.birth_date />
                        </div>
                        <div class="form__group" style="grid-column: 1 / -1;">
                            <label class="form__label">"Адрес"</label>
                            <Input value=vm.address />
                        </div>
                    </div>
                </CardAnimated>

                <CardAnimated delay_ms=80 title="Документы">
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Паспорт *"</label>
                            <Input value=vm.national_id placeholder="4510 123456" />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Водительское удостоверение *"</label>
                            <Input value=vm.driver_license />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Действует до"</label>
                            <DateInput value=vm.license_expiry />
                        </div>
                    </div>
                </CardAnimated>

                <CardAnimated delay_ms=160 title="Прочее">
                    <div class="details-grid--3col">
                        <div class="form__group" style="display: flex; align-items: center; padding-top: 24px;">
                            <Checkbox checked=vm.is_blacklisted label="Чёрный список" />
                        </div>
                        <div class="form__group" style="grid-column: 2 / -1;">
                            <label class="form__label">"Причина"</label>
                            <Input
                                value=vm.blacklist_reason
                                disabled=Signal::derive(move || !vm.is_blacklisted.get())
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
