use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};
pub use token::{AuthError, Claims, TokenKeys};

mod auth;
mod budgets;
mod extract;
mod goals;
mod reports;
mod server;
mod token;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    /// Missing or unparsable request field.
    Validation(String),
    /// Request body that could not be read as the expected JSON.
    Malformed(String),
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::ExistingKey(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::PasswordHash(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn status_for_auth_error(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Missing | AuthError::Expired => StatusCode::UNAUTHORIZED,
        AuthError::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("engine failure: {err}");
                }
                (status, err.to_string())
            }
            ServerError::Auth(err) => (status_for_auth_error(&err), err.to_string()),
            ServerError::Validation(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Malformed(err) => {
                tracing::error!("malformed request body: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err)
            }
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err)
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_conflict_maps_to_400() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_credentials_map_to_401() {
        let res = ServerError::from(EngineError::InvalidCredentials).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn auth_errors_map_by_kind() {
        let missing = ServerError::from(AuthError::Missing).into_response();
        let expired = ServerError::from(AuthError::Expired).into_response();
        let invalid = ServerError::from(AuthError::Invalid).into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn malformed_body_maps_to_500() {
        let res = ServerError::Malformed("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        let res = ServerError::Validation("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
