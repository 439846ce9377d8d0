use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Ошибки, которые API должен различать по HTTP-статусу.
///
/// Сервисы возвращают `anyhow::Result`; нужный вариант кладётся внутрь
/// через `ServiceError::X(..).into()` и достаётся обратно в хендлере.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Недостаточно прав")]
    Forbidden,
    #[error("Неверный логин или пароль")]
    Unauthorized,
    /// Учётная запись временно заблокирована после неудачных входов
    #[error("{0}")]
    Locked(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> anyhow::Error {
        ServiceError::Validation(msg.into()).into()
    }

    pub fn conflict(msg: impl Into<String>) -> anyhow::Error {
        ServiceError::Conflict(msg.into()).into()
    }

    pub fn not_found(what: &str, id: &str) -> anyhow::Error {
        ServiceError::NotFound(format!("{} не найден: {}", what, id)).into()
    }

    /// Восстанавливает классифицированную ошибку из `anyhow`
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<ServiceError>() {
            Ok(service_error) => service_error,
            Err(other) => ServiceError::Internal(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Locked(_) => StatusCode::LOCKED,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServiceError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Внутренняя ошибка сервера".to_string()
            }
            other => {
                tracing::warn!("{} {}", status.as_u16(), other);
                other.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Результат хендлера: `?` на `anyhow::Error` сохраняет классификацию ошибки
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(ServiceError::from_anyhow(err))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

/// Разбор UUID из пути запроса
pub fn parse_uuid(raw: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|_| ApiError(ServiceError::Validation(format!("Некорректный идентификатор: {}", raw))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_keeps_classification() {
        let err = ServiceError::conflict("Госномер занят");
        let restored = ServiceError::from_anyhow(err);
        assert!(matches!(restored, ServiceError::Conflict(ref m) if m == "Госномер занят"));
        assert_eq!(restored.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn plain_anyhow_is_internal() {
        let restored = ServiceError::from_anyhow(anyhow::anyhow!("disk full"));
        assert_eq!(restored.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ServiceError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ServiceError::Locked("x".into()).status(), StatusCode::LOCKED);
    }

    #[test]
    fn context_does_not_hide_classification() {
        use anyhow::Context;
        let err: anyhow::Result<()> = Err(ServiceError::validation("Пустое имя"));
        let wrapped = err.context("saving customer").unwrap_err();
        // context() оборачивает ошибку, downcast находит исходную
        assert_eq!(ServiceError::from_anyhow(wrapped).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_uuid_is_bad_request() {
        let err = parse_uuid("abc").unwrap_err();
        assert_eq!(err.0.status(), StatusCode::BAD_REQUEST);
    }
}
