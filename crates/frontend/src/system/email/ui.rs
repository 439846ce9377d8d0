use contracts::system::email::SendEmailRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::api;
use crate::shared::components::toast::use_toasts;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;

/// Письмо клиенту или сотруднику из интерфейса
#[component]
pub fn EmailComposer() -> impl IntoView {
    let toasts = use_toasts();
    let to = RwSignal::new(String::new());
    let subject = RwSignal::new(String::new());
    let body = RwSignal::new(String::new());
    let sending = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let send = move |_| {
        let request = SendEmailRequest {
            to: to.get_untracked().trim().to_string(),
            subject: subject.get_untracked(),
            body: body.get_untracked(),
        };
        if let Err(e) = request.validate() {
            error.set(Some(e));
            return;
        }
        error.set(None);
        sending.set(true);
        spawn_local(async move {
            match api::send_email(&request).await {
                Ok(resp) => {
                    toasts.success(api::channel_message(&resp.channel));
                    subject.set(String::new());
                    body.set(String::new());
                }
                Err(e) => error.set(Some(e)),
            }
            sending.set(false);
        });
    };

    view! {
        <PageFrame page_id="sys_email--detail" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Отправка письма"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=send
                        disabled=Signal::derive(move || sending.get())
                    >
                        {icon("mail")}
                        {move || if sending.get() { " Отправка..." } else { " Отправить" }}
                    </Button>
                </div>
            </div>

            {move || error.get().map(|err| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{err}</span>
                </div>
            })}

            <div class="page__content">
                <div class="details-form" style="max-width: 720px;">
                    <div class="form__group">
                        <Label>"Кому"</Label>
                        <Input value=to input_type=InputType::Email placeholder="client@example.com" />
                    </div>
                    <div class="form__group">
                        <Label>"Тема"</Label>
                        <Input value=subject />
                    </div>
                    <div class="form__group">
                        <Label>"Текст письма"</Label>
                        <Textarea value=body attr:rows=12 />
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}
