use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// Сессия восстанавливается из localStorage
    pub restoring: bool,
}

impl AuthState {
    pub fn is_admin(&self) -> bool {
        self.user_info.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }
}

/// Восстанавливает сессию: текущий access token, иначе refresh
async fn restore_session() -> Option<(String, UserInfo)> {
    let access_token = storage::get_access_token()?;
    if let Ok(user_info) = api::get_current_user(&access_token).await {
        return Some((access_token, user_info));
    }

    let Some(refresh_token) = storage::get_refresh_token() else {
        storage::clear_tokens();
        return None;
    };
    match api::refresh_token(refresh_token).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            let user_info = api::get_current_user(&response.access_token).await.ok()?;
            Some((response.access_token, user_info))
        }
        Err(e) => {
            log::info!("Session expired: {}", e);
            storage::clear_tokens();
            None
        }
    }
}

#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: storage::get_access_token().is_some(),
        ..AuthState::default()
    });

    Effect::new(move |_| {
        spawn_local(async move {
            let restored = restore_session().await;
            set_auth_state.set(match restored {
                Some((access_token, user_info)) => AuthState {
                    access_token: Some(access_token),
                    user_info: Some(user_info),
                    restoring: false,
                },
                None => AuthState::default(),
            });
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Реактивный признак администратора
pub fn is_admin_signal() -> Signal<bool> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.is_admin()))
}

/// Вход. Сеттер передаётся снаружи: внутри async контекст недоступен
pub async fn do_login(
    set_auth_state: WriteSignal<AuthState>,
    username: String,
    password: String,
) -> Result<(), String> {
    let response = api::login(username, password).await?;

    storage::save_tokens(&response.access_token, &response.refresh_token);
    log::info!("Logged in as {}", response.user.username);

    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
        restoring: false,
    });

    Ok(())
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
