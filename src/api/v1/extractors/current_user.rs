use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::middleware::auth::AuthState;
use crate::services::strategy::{AuthInfo, Principal};

/// The principal `authenticate` put in the default identity slot.
///
/// Rejects with 401 when the request is not authenticated (route not behind
/// `authenticate`, or the strategy passed).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: Principal,
    pub auth_info: Option<AuthInfo>,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<AuthState>()
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let user = state.user().cloned().ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(CurrentUser {
            user,
            auth_info: state.auth_info().cloned(),
        })
    }
}
