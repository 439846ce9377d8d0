use leptos::prelude::*;

/// Чекбокс строки таблицы (`td.table__cell--checkbox`).
///
/// Клик по чекбоксу не доходит до строки, строка по клику открывает форму.
#[component]
pub fn TableCheckbox(
    checked: Signal<bool>,
    on_change: Callback<bool>,
) -> impl IntoView {
    view! {
        <td class="table__cell table__cell--checkbox" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </td>
    }
}

/// Чекбокс «выбрать все» в заголовке
#[component]
pub fn TableHeaderCheckbox(
    checked: Signal<bool>,
    on_change: Callback<bool>,
) -> impl IntoView {
    view! {
        <th class="table__header-cell table__header-cell--checkbox">
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </th>
    }
}

/// Выбор строк списка: id выбранных записей
#[derive(Clone, Copy)]
pub struct Selection {
    ids: RwSignal<Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self {
            ids: RwSignal::new(Vec::new()),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.with(|ids| ids.iter().any(|x| x == id))
    }

    pub fn toggle(&self, id: String, checked: bool) {
        self.ids.update(|ids| {
            ids.retain(|x| *x != id);
            if checked {
                ids.push(id);
            }
        });
    }

    pub fn set_all(&self, ids: Vec<String>) {
        self.ids.set(ids);
    }

    pub fn clear(&self) {
        self.ids.set(Vec::new());
    }

    pub fn get(&self) -> Vec<String> {
        self.ids.get()
    }

    pub fn len(&self) -> usize {
        self.ids.with(|ids| ids.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Сигнал для строки
    pub fn checked(&self, id: String) -> Signal<bool> {
        let this = *self;
        Signal::derive(move || this.contains(&id))
    }

    /// Callback для строки
    pub fn on_toggle(&self, id: String) -> Callback<bool> {
        let this = *self;
        Callback::new(move |checked| this.toggle(id.clone(), checked))
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}
