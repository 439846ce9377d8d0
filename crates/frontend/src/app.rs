use crate::app_shell::AppShell;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::toast::{ToastHost, ToastService};
use crate::shared::modal_stack::{ModalHost, ModalStackService};
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    // Вкладки, видимость панелей и счётчики обновления списков
    provide_context(AppGlobalContext::new());

    provide_context(ModalStackService::new());
    provide_context(ToastService::new());

    view! {
        <ConfigProvider>
            <AuthProvider>
                <AppShell />
                <ModalHost />
                <ToastHost />
            </AuthProvider>
        </ConfigProvider>
    }
}
