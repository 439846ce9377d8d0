use leptos::prelude::*;

use super::context::use_auth;

/// Содержимое только для администраторов
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.with(|s| s.access_token.is_some() && s.is_admin())
            fallback=|| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">"Раздел доступен только администраторам"</span>
                </div>
            }
        >
            {children()}
        </Show>
    }
}
