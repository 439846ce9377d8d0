//! Формы пользователя: создание, редактирование, смена пароля.
//! Открываются в модальном окне поверх списка.

use contracts::system::users::{
    validate_password_strength, validate_username, ChangePasswordDto, CreateUserDto,
    UpdateUserDto, User,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::toast::use_toasts;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::system::users::api;

/// Проверка формы нового пользователя до отправки
pub fn validate_new_user(username: &str, password: &str, confirm: &str) -> Result<(), String> {
    validate_username(username.trim())?;
    validate_new_password(password, confirm)
}

pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), String> {
    validate_password_strength(password)?;
    if password != confirm {
        return Err("Пароли не совпадают".into());
    }
    Ok(())
}

#[component]
fn FormError(error: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn CreateUserForm(on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let is_admin = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    let on_save = move |_| {
        let login = username.get_untracked();
        let pass = password.get_untracked();
        if let Err(e) = validate_new_user(&login, &pass, &confirm.get_untracked()) {
            error.set(Some(e));
            return;
        }
        let dto = CreateUserDto {
            username: login.trim().to_string(),
            password: pass,
            email: non_empty(&email.get_untracked()),
            full_name: non_empty(&full_name.get_untracked()),
            is_admin: is_admin.get_untracked(),
        };
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match api::create_user(dto).await {
                Ok(_) => {
                    toasts.success("Пользователь создан");
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">"Новый пользователь"</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            <FormError error=error />
            <div class="form__group">
                <Label>"Логин"</Label>
                <Input value=username placeholder="ivanov" />
            </div>
            <div class="form__group">
                <Label>"Пароль"</Label>
                <Input value=password input_type=InputType::Password />
            </div>
            <div class="form__group">
                <Label>"Повторите пароль"</Label>
                <Input value=confirm input_type=InputType::Password />
            </div>
            <div class="form__group">
                <Label>"Email"</Label>
                <Input value=email input_type=InputType::Email />
            </div>
            <div class="form__group">
                <Label>"ФИО"</Label>
                <Input value=full_name />
            </div>
            <div class="form__group">
                <Checkbox checked=is_admin label="Администратор" />
            </div>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                "Отмена"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                {move || if saving.get() { "Сохранение..." } else { "Создать" }}
            </Button>
        </div>
    }
}

#[component]
pub fn EditUserForm(user: User, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let user_id = StoredValue::new(user.id.clone());
    let email = RwSignal::new(user.email.clone().unwrap_or_default());
    let full_name = RwSignal::new(user.full_name.clone().unwrap_or_default());
    let is_admin = RwSignal::new(user.is_admin);
    let is_active = RwSignal::new(user.is_active);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    let on_save = move |_| {
        let dto = UpdateUserDto {
            id: user_id.get_value(),
            email: non_empty(&email.get_untracked()),
            full_name: non_empty(&full_name.get_untracked()),
            is_active: is_active.get_untracked(),
            is_admin: is_admin.get_untracked(),
        };
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match api::update_user(dto).await {
                Ok(()) => {
                    toasts.success("Изменения сохранены");
                    on_saved.run(());
                }
                Err(e) => error.set(Some(format!("Ошибка сохранения: {}", e))),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">{format!("Редактирование: {}", user.username)}</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            <FormError error=error />
            <div class="form__group">
                <Label>"Email"</Label>
                <Input value=email input_type=InputType::Email disabled=Signal::derive(move || saving.get()) />
            </div>
            <div class="form__group">
                <Label>"ФИО"</Label>
                <Input value=full_name disabled=Signal::derive(move || saving.get()) />
            </div>
            <div class="form__group">
                <Checkbox checked=is_admin label="Администратор" />
            </div>
            <div class="form__group">
                <Checkbox checked=is_active label="Активен" />
            </div>
        </div>
        <div class="modal-footer">
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| on_close.run(())
                disabled=Signal::derive(move || saving.get())
            >
                "Отмена"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                {move || if saving.get() { "Сохранение..." } else { "Сохранить" }}
            </Button>
        </div>
    }
}

/// Смена пароля. `require_old`: пользователь меняет свой пароль сам
#[component]
pub fn ChangePasswordForm(
    user_id: String,
    username: String,
    require_old: bool,
    on_close: Callback<()>,
) -> impl IntoView {
    let toasts = use_toasts();
    let user_id = StoredValue::new(user_id);
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    let on_save = move |_| {
        let pass = new_password.get_untracked();
        if let Err(e) = validate_new_password(&pass, &confirm.get_untracked()) {
            error.set(Some(e));
            return;
        }
        let old = old_password.get_untracked();
        if require_old && old.is_empty() {
            error.set(Some("Введите текущий пароль".into()));
            return;
        }
        let dto = ChangePasswordDto {
            user_id: user_id.get_value(),
            old_password: if require_old { Some(old) } else { None },
            new_password: pass,
        };
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match api::change_password(dto).await {
                Ok(()) => {
                    toasts.success("Пароль изменён");
                    on_close.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="modal-header">
            <h2 class="modal-title">{format!("Смена пароля: {}", username)}</h2>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                {icon("x")}
            </Button>
        </div>
        <div class="modal-body">
            <FormError error=error />
            <Show when=move || require_old>
                <div class="form__group">
                    <Label>"Текущий пароль"</Label>
                    <Input value=old_password input_type=InputType::Password />
                </div>
            </Show>
            <div class="form__group">
                <Label>"Новый пароль"</Label>
                <Input value=new_password input_type=InputType::Password />
            </div>
            <div class="form__group">
                <Label>"Повторите пароль"</Label>
                <Input value=confirm input_type=InputType::Password />
            </div>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                "Отмена"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                "Сменить пароль"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_checks_login_and_passwords() {
        assert!(validate_new_user("ab", "rental2025", "rental2025").is_err());
        assert!(validate_new_user("manager", "short", "short").is_err());
        assert_eq!(
            validate_new_user("manager", "rental2025", "rental2026"),
            Err("Пароли не совпадают".to_string())
        );
        assert!(validate_new_user(" manager ", "rental2025", "rental2025").is_ok());
    }
}
