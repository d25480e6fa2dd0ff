use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpApiError {
    #[error("{0}")]
    App(#[from] AppError),
    #[error("db error")]
    Db(#[from] db::DbError),
    #[error("auth error")]
    Auth,
}

impl From<auth::AuthError> for HttpApiError {
    fn from(_: auth::AuthError) -> Self {
        HttpApiError::Auth
    }
}

impl ResponseError for HttpApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::App(AppError::NotAuthenticated) => StatusCode::UNAUTHORIZED,
            Self::App(AppError::PermissionDenied) => StatusCode::FORBIDDEN,
            Self::App(AppError::AlreadyAssigned) => StatusCode::CONFLICT,
            Self::App(AppError::Conflict) => StatusCode::CONFLICT,
            Self::App(AppError::NotFound) => StatusCode::NOT_FOUND,
            Self::App(AppError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::App(AppError::Store) => StatusCode::SERVICE_UNAVAILABLE,
            Self::App(AppError::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Db(e) if e.is_unique_violation() => StatusCode::CONFLICT,
            Self::Db(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Auth => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::App(e) => e.to_string(),
            Self::Db(e) if e.is_unique_violation() => "already exists".into(),
            Self::Db(_) => "store unavailable".into(),
            Self::Auth => "not authenticated".into(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status() {
        let cases = [
            (AppError::NotAuthenticated, 401),
            (AppError::PermissionDenied, 403),
            (AppError::AlreadyAssigned, 409),
            (AppError::NotFound, 404),
            (AppError::Validation("contact required".into()), 400),
            (AppError::Store, 503),
        ];
        for (err, code) in cases {
            assert_eq!(HttpApiError::App(err).status_code().as_u16(), code);
        }
    }
}
