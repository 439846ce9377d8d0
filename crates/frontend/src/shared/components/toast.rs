//! Всплывающие уведомления о результате каждого действия.
//!
//! ```rust,ignore
//! let toasts = use_toasts();
//! match api::save(dto).await {
//!     Ok(_) => toasts.success("Сохранено"),
//!     Err(e) => toasts.error(e),
//! }
//! ```

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use thaw::{MessageBar, MessageBarIntent};
use wasm_bindgen_futures::spawn_local;

const TOAST_TIMEOUT_MS: u32 = 4000;
const ERROR_TIMEOUT_MS: u32 = 8000;
const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    fn intent(self) -> MessageBarIntent {
        match self {
            ToastKind::Success => MessageBarIntent::Success,
            ToastKind::Info => MessageBarIntent::Info,
            ToastKind::Warning => MessageBarIntent::Warning,
            ToastKind::Error => MessageBarIntent::Error,
        }
    }

    fn timeout_ms(self) -> u32 {
        match self {
            ToastKind::Error => ERROR_TIMEOUT_MS,
            _ => TOAST_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct ToastService {
    items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            ToastKind::Error => log::error!("{}", message),
            ToastKind::Warning => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }

        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.items.update(|items| {
            items.push(Toast { id, kind, message });
            // старые уходят первыми
            let overflow = items.len().saturating_sub(MAX_VISIBLE);
            items.drain(..overflow);
        });

        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(kind.timeout_ms()).await;
            svc.dismiss(id);
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastKind::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(ToastKind::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }

    /// Ok -> success(ok_message), Err -> error(текст ошибки)
    pub fn report<T>(&self, result: &Result<T, String>, ok_message: &str) {
        match result {
            Ok(_) => self.success(ok_message),
            Err(e) => self.error(e.clone()),
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|t| t.id != id));
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toasts() -> ToastService {
    use_context::<ToastService>().expect("ToastService not provided in context")
}

/// Контейнер уведомлений в правом нижнем углу. Mounted once.
#[component]
pub fn ToastHost() -> impl IntoView {
    let svc = use_toasts();

    view! {
        <div class="toast-host">
            <For
                each=move || svc.items.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class="toast-host__item" on:click=move |_| svc.dismiss(id)>
                            <MessageBar intent=toast.kind.intent()>{toast.message}</MessageBar>
                        </div>
                    }
                }
            />
        </div>
    }
}
