use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;

/// Токен из заголовка `Authorization: Bearer ...`.
///
/// EventSource в браузере не умеет ставить заголовки, поэтому для
/// потоковых запросов токен также принимается из `?access_token=`.
fn bearer_token(req: &Request<Body>) -> Option<String> {
    if let Some(token) = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }
    req.uri().query().and_then(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "access_token")
            .map(|(_, value)| value.to_string())
    })
}

/// Токен извлекается до `.await`: `Body` не `Sync`, ссылка на запрос
/// сделала бы future middleware не `Send`.
async fn authenticate(token: Option<String>) -> Result<TokenClaims, StatusCode> {
    let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
    super::jwt::validate_token(&token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authenticate(bearer_token(&req)).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires admin privileges
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authenticate(bearer_token(&req)).await?;
    if !claims.is_admin {
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_from_header() {
        let req = Request::builder()
            .uri("/api/vehicle")
            .header("Authorization", "Bearer abc.def")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));
    }

    #[test]
    fn token_from_query() {
        let req = Request::builder()
            .uri("/api/events?x=1&access_token=tok")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req).as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn request_without_token_is_rejected() {
        assert_eq!(authenticate(None).await.err(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn guards_mount_as_router_layers() {
        use axum::{middleware, routing::get, Router};

        let _protected: Router = Router::new()
            .route("/api/vehicle", get(|| async { "ok" }))
            .layer(middleware::from_fn(require_auth));
        let _admin: Router = Router::new()
            .route("/api/system/users", get(|| async { "ok" }))
            .layer(middleware::from_fn(require_admin));
    }

    #[test]
    fn missing_token() {
        let req = Request::builder()
            .uri("/api/events")
            .header("Authorization", "Basic zzz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), None);
    }
}
