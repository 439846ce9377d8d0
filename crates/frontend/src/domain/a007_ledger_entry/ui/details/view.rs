use super::view_model::LedgerEntryDetailsVm;
use contracts::domain::a007_ledger_entry::LedgerKind;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::date_input::DateInput;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn LedgerEntryDetails(
    id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = LedgerEntryDetailsVm::new();
    if let Some(existing_id) = id {
        vm.load(existing_id);
    }

    let is_edit_mode = vm.is_edit_mode();
    let is_read_only = vm.is_read_only();
    let is_expense = vm.is_expense();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();
    let deductible_disabled = Signal::derive(move || is_read_only.get() || !is_expense.get());

    view! {
        <PageFrame page_id="a007_ledger_entry--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() {
                            format!("Проводка {}", vm.code.get())
                        } else {
                            "Новая проводка".to_string()
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
                <Show when=move || is_read_only.get()>
                    <div class="warning-box">
                        <span class="warning-box__icon">{icon("lock")}</span>
                        <span class="warning-box__text">
                            "Проводка создана автоматически и изменяется только через договор или запись обслуживания"
                        </span>
                    </div>
                </Show>
                {move || (!vm.loading.get() && !is_read_only.get()).then(|| hint.get()).flatten().map(|h| view! {
                    <div class="form__hint">{h}</div>
                })}

                <CardAnimated delay_ms=0>
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Дата *"</label>
                            <DateInput value=vm.entry_date disabled=is_read_only />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Вид"</label>
                            <select
                                class="form__select"
                                prop:value=move || vm.kind.get()
                                prop:disabled=move || is_read_only.get()
                                on:change=move |ev| vm.kind.set(event_target_value(&ev))
                            >
                                {[LedgerKind::Income, LedgerKind::Expense]
                                    .into_iter()
                                    .map(|k| view! {
                                        <option value=k.as_str() prop:selected=move || vm.kind.get() == k.as_str()>
                                            {k.label()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Категория *"</label>
                            <Input value=vm.category disabled=is_read_only placeholder="rental, fuel, office..." />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Сумма, ₽ *"</label>
                            <Input value=vm.amount disabled=is_read_only />
                        </div>
                        <div class="form__group" style="grid-column: 2 / -1;">
                            <label class="form__label">"Описание"</label>
                            <Input value=vm.description disabled=is_read_only />
                        </div>
                        <div class="form__group">
                            <label class="form__checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || vm.tax_deductible.get()
                                    prop:disabled=move || deductible_disabled.get()
                                    on:change=move |ev| vm.tax_deductible.set(event_target_checked(&ev))
                                />
                                " Уменьшает налоговую базу"
                            </label>
                        </div>
                        {move || vm.reference.get().map(|r| view! {
                            <div class="form__group" style="grid-column: 2 / -1;">
                                <label class="form__label">"Основание"</label>
                                <div class="form__static">{r}</div>
                            </div>
                        })}
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
