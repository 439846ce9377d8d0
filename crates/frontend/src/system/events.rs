//! Подписка на изменения данных (SSE `/api/events`).
//!
//! Событие не несёт данных записи: получив `ChangeEvent`, клиент увеличивает
//! ревизию коллекции в `AppGlobalContext`, и открытые списки перечитываются.

use contracts::shared::events::{ChangeEvent, CHANGE_EVENT_NAME};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::layout::global_context::{use_app_context, AppGlobalContext, ALL_ENTITIES};
use crate::shared::api_utils::api_url;
use crate::system::auth::storage;

/// URL потока событий. EventSource не умеет заголовки, токен идёт в query
pub fn events_url(token: &str) -> String {
    api_url(&format!(
        "/api/events?access_token={}",
        urlencoding::encode(token)
    ))
}

/// Разобрать data SSE-события
pub fn parse_change(data: &str) -> Result<ChangeEvent, String> {
    serde_json::from_str::<ChangeEvent>(data).map_err(|e| format!("Bad change event: {}", e))
}

fn connect(ctx: AppGlobalContext) -> Result<EventSource, String> {
    let token = storage::get_access_token().ok_or("Не выполнен вход")?;
    let source = EventSource::new(&events_url(&token))
        .map_err(|e| format!("Failed to open event stream: {:?}", e))?;

    let on_change = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Some(data) = event.data().as_string() else {
            return;
        };
        match parse_change(&data) {
            Ok(change) => {
                log::debug!(
                    "change: {} {} {:?}",
                    change.entity,
                    change.action.as_str(),
                    change.id
                );
                ctx.bump(&change.entity);
            }
            Err(e) => log::warn!("{}", e),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    source
        .add_event_listener_with_callback(CHANGE_EVENT_NAME, on_change.as_ref().unchecked_ref())
        .map_err(|e| format!("Failed to subscribe: {:?}", e))?;
    // Замыкание живёт столько же, сколько EventSource
    on_change.forget();

    source.set_onerror(Some(
        Closure::<dyn FnMut(web_sys::Event)>::new(|_: web_sys::Event| {
            log::warn!("Event stream interrupted, reconnecting");
        })
        .into_js_value()
        .unchecked_ref(),
    ));

    // Браузер сам переподключается. После обрыва события могли потеряться,
    // поэтому при повторном открытии перечитываем всё
    let mut opened = 0u32;
    let on_open = Closure::wrap(Box::new(move |_: web_sys::Event| {
        opened += 1;
        if opened > 1 {
            ctx.bump(ALL_ENTITIES);
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    source.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    Ok(source)
}

/// Невидимый компонент: держит SSE-подключение, пока пользователь в системе
#[component]
pub fn ChangeStream() -> impl IntoView {
    let ctx = use_app_context();
    let source = StoredValue::new_local(None::<EventSource>);

    match connect(ctx) {
        Ok(es) => {
            log::info!("Event stream connected");
            source.set_value(Some(es));
        }
        Err(e) => log::warn!("{}", e),
    }

    on_cleanup(move || {
        source.try_with_value(|es| {
            if let Some(es) = es {
                es.close();
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::events::ChangeAction;

    #[test]
    fn parses_backend_payload() {
        let change =
            parse_change(r#"{"entity":"vehicle","id":"42","action":"updated"}"#).unwrap();
        assert_eq!(change.entity, "vehicle");
        assert_eq!(change.id.as_deref(), Some("42"));
        assert_eq!(change.action, ChangeAction::Updated);

        let all = parse_change(r#"{"entity":"*","id":null,"action":"updated"}"#).unwrap();
        assert_eq!(all.entity, "*");
        assert!(parse_change("keep-alive").is_err());
    }
}
