/*
 * Responsibility
 * - Error taxonomy of the authentication middleware (AuthError)
 * - IntoResponse: the pipeline's rendering of errors the middleware raises
 */
use axum::{
    Json,
    http::{
        HeaderValue, StatusCode,
        header::{InvalidHeaderValue, WWW_AUTHENTICATE},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tower::BoxError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("a strategy name is required")]
    MissingStrategyName,
    #[error("unknown authentication strategy \"{0}\"")]
    UnknownStrategy(String),
    #[error("not supported: {0}")]
    Unsupported(&'static str),
    #[error("authentication is not initialized for this request")]
    NotInitialized,
    #[error("a session is required to record authentication messages")]
    SessionUnavailable,
    #[error("{message}")]
    Authentication {
        status: StatusCode,
        message: String,
        /// `WWW-Authenticate` value, sent only with a 401.
        challenge: Option<HeaderValue>,
    },
    #[error("authentication strategy failed: {0}")]
    Strategy(#[source] BoxError),
    #[error("auth info transform failed: {0}")]
    Transform(#[source] BoxError),
    #[error("invalid status code {0}")]
    InvalidStatus(String),
    #[error("invalid header value")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("request body could not be read")]
    UnreadableBody(#[source] axum::Error),
    #[error("request body is not valid JSON")]
    MalformedBody(#[source] serde_json::Error),
}

impl AuthError {
    /// Failure raised by `failWithError`: the status and its standard reason phrase.
    pub fn authentication(status: StatusCode, challenge: Option<HeaderValue>) -> Self {
        Self::Authentication {
            status,
            message: status.canonical_reason().unwrap_or("Unauthorized").to_string(),
            challenge,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::UnreadableBody(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingStrategyName
            | Self::UnknownStrategy(_)
            | Self::Unsupported(_)
            | Self::NotInitialized
            | Self::SessionUnavailable => "AUTH_CONFIGURATION",
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::Strategy(_) | Self::Transform(_) => "AUTH_STRATEGY_ERROR",
            Self::InvalidStatus(_) | Self::InvalidHeader(_) => "INTERNAL_SERVER_ERROR",
            Self::UnreadableBody(_) | Self::MalformedBody(_) => "INVALID_BODY",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let challenge = match &self {
            Self::Authentication { challenge, .. } if status == StatusCode::UNAUTHORIZED => {
                challenge.clone()
            }
            _ => None,
        };

        let message = if status.is_server_error() {
            tracing::error!(error = %self, code, "authentication error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut res = (status, Json(body)).into_response();
        if let Some(challenge) = challenge {
            res.headers_mut().insert(WWW_AUTHENTICATE, challenge);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_error_carries_reason_phrase() {
        let err = AuthError::authentication(StatusCode::FORBIDDEN, None);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Forbidden");
    }

    #[test]
    fn unauthorized_error_sends_its_challenge() {
        let challenge = HeaderValue::from_static("Bearer realm=\"api\"");
        let res =
            AuthError::authentication(StatusCode::UNAUTHORIZED, Some(challenge)).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[WWW_AUTHENTICATE], "Bearer realm=\"api\"");
    }

    #[test]
    fn challenge_is_dropped_for_other_statuses() {
        let challenge = HeaderValue::from_static("Bearer");
        let res =
            AuthError::authentication(StatusCode::FORBIDDEN, Some(challenge)).into_response();
        assert!(res.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn configuration_errors_render_as_500() {
        let res = AuthError::UnknownStrategy("nonexistent".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unknown_strategy_message_names_it() {
        let err = AuthError::UnknownStrategy("nonexistent".into());
        assert_eq!(
            err.to_string(),
            "unknown authentication strategy \"nonexistent\""
        );
    }
}
