//! API utilities for frontend-backend communication
//!
//! Helpers for API URLs and authenticated JSON requests. Every helper returns
//! `Result<T, String>` where the error is the server `error` field when the
//! body carries one, otherwise `HTTP <status>`.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Example
/// ```rust,ignore
/// let url = format!("{}/api/vehicle/{}", api_base(), id);
/// ```
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path ("/api/...")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// `Bearer <token>` из localStorage
pub fn auth_header() -> Option<String> {
    storage::get_access_token().map(|token| format!("Bearer {}", token))
}

fn with_auth(builder: RequestBuilder) -> Result<RequestBuilder, String> {
    let header = auth_header().ok_or("Не выполнен вход")?;
    Ok(builder.header("Authorization", &header))
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Текст ошибки из тела ответа `{"error": "..."}` либо `HTTP <status>`
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => parsed.error,
        _ => format!("HTTP {}", status),
    }
}

async fn ensure_ok(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    log::warn!("API error {}: {}", status, message);
    Err(message)
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    ensure_ok(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = with_auth(Request::get(&api_url(path)))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    parse(response).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let response = with_auth(Request::post(&api_url(path)))?
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    parse(response).await
}

pub async fn put_json<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let response = with_auth(Request::put(&api_url(path)))?
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    ensure_ok(response).await.map(|_| ())
}

/// POST без ожидаемого тела ответа
pub async fn post_no_content<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let response = with_auth(Request::post(&api_url(path)))?
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    ensure_ok(response).await.map(|_| ())
}

/// POST без тела запроса
pub async fn post_empty(path: &str) -> Result<(), String> {
    let response = with_auth(Request::post(&api_url(path)))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    ensure_ok(response).await.map(|_| ())
}

pub async fn delete(path: &str) -> Result<(), String> {
    let response = with_auth(Request::delete(&api_url(path)))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    ensure_ok(response).await.map(|_| ())
}

/// Текстовое тело (CSV выгрузки)
pub async fn get_text(path: &str) -> Result<String, String> {
    let response = with_auth(Request::get(&api_url(path)))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    ensure_ok(response)
        .await?
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))
}

/// Ответ upsert-роутов
#[derive(Debug, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Query-string из пар, пустые значения пропускаются
pub fn query_string(params: &[(&str, String)]) -> String {
    let parts: Vec<String> = params
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v.trim())))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_text() {
        assert_eq!(
            error_message(409, r#"{"error":"Телефон уже используется"}"#),
            "Телефон уже используется"
        );
        assert_eq!(error_message(500, "<html>"), "HTTP 500");
        assert_eq!(error_message(400, r#"{"error":"  "}"#), "HTTP 400");
    }

    #[test]
    fn query_string_skips_blank_values() {
        assert_eq!(query_string(&[]), "");
        assert_eq!(
            query_string(&[("q", "Иван Петров".into()), ("status", "".into())]),
            "?q=%D0%98%D0%B2%D0%B0%D0%BD%20%D0%9F%D0%B5%D1%82%D1%80%D0%BE%D0%B2"
        );
        assert_eq!(
            query_string(&[("from", "2026-01-01".into()), ("to", "2026-01-31".into())]),
            "?from=2026-01-01&to=2026-01-31"
        );
    }
}
