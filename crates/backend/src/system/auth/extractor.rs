use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;
use std::net::SocketAddr;

/// Extractor for getting current user from JWT token
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // TokenClaims кладёт middleware require_auth / require_admin
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Адрес клиента: X-Forwarded-For, затем X-Real-IP, затем адрес соединения
pub fn client_ip(parts: &Parts) -> Option<String> {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or("").trim().to_string())
            .filter(|v| !v.is_empty())
    };
    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

/// Источник запроса без аутентификации (логин, refresh)
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientInfo {
            ip_address: client_ip(parts),
            user_agent: parts
                .headers
                .get(axum::http::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
    }
}

/// Кто выполняет изменение: пользователь из токена и его адрес.
/// Передаётся в сервисы для журнала аудита.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub is_admin: bool,
    pub ip_address: Option<String>,
}

impl Actor {
    /// Фоновые процессы (воркер уведомлений, инициализация)
    pub fn system() -> Self {
        Self {
            username: Some("system".to_string()),
            ..Default::default()
        }
    }

    pub fn from_claims(claims: &TokenClaims, ip_address: Option<String>) -> Self {
        Self {
            user_id: Some(claims.sub.clone()),
            username: Some(claims.username.clone()),
            is_admin: claims.is_admin,
            ip_address,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<TokenClaims>()
            .ok_or(StatusCode::UNAUTHORIZED)?;
        Ok(Actor::from_claims(claims, client_ip(parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let p = parts(Request::builder().header("X-Forwarded-For", "10.0.0.7, 172.16.0.1"));
        assert_eq!(client_ip(&p).as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn falls_back_to_connect_info() {
        let mut p = parts(Request::builder());
        let addr: SocketAddr = "192.168.1.20:51000".parse().unwrap();
        p.extensions.insert(ConnectInfo(addr));
        assert_eq!(client_ip(&p).as_deref(), Some("192.168.1.20"));
    }

    #[test]
    fn no_source_no_ip() {
        assert_eq!(client_ip(&parts(Request::builder())), None);
    }
}
