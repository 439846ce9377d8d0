use super::view_model::InventoryItemDetailsVm;
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn InventoryItemDetails(
    id: Option<String>,
    #[prop(into)] on_saved: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = InventoryItemDetailsVm::new();
    if let Some(existing_id) = id {
        vm.load(existing_id);
    }

    let is_edit_mode = vm.is_edit_mode();
    let is_save_disabled = vm.is_save_disabled();
    let hint = vm.validation_error();

    view! {
        <PageFrame page_id="a004_inventory_item--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if is_edit_mode.get() { "Складская позиция" } else { "Новая позиция" }}
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

                <CardAnimated delay_ms=0>
                    <div class="details-grid--3col">
                        <div class="form__group">
                            <label class="form__label">"Артикул *"</label>
                            <Input value=vm.sku />
                        </div>
                        <div class="form__group" style="grid-column: 2 / -1;">
                            <label class="form__label">"Наименование *"</label>
                            <Input value=vm.name />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Категория *"</label>
                            <Input value=vm.category placeholder="Шины, масла, фильтры..." />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Поставщик"</label>
                            <Input value=vm.supplier />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Место хранения"</label>
                            <Input value=vm.location />
                        </div>
                        // Остаток существующей позиции меняется приходом/списанием
                        <div class="form__group">
                            <label class="form__label">"Количество"</label>
                            <Input value=vm.quantity disabled=is_edit_mode />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Минимальный остаток"</label>
                            <Input value=vm.min_quantity />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"Цена за единицу, ₽"</label>
                            <Input value=vm.unit_cost />
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
