//! Runs the named strategy and turns its outcome into response / session /
//! pipeline effects.
//!
//! ```ignore
//! let login = Authenticate::new(registry.clone(), "local", AuthOptions {
//!     failure_redirect: Some("/login".into()),
//!     ..Default::default()
//! })?;
//! let app = login.apply(Router::new().route("/session", post(create_session)));
//! let app = middleware::auth::initialize::apply(app, registry, body_limit);
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_LENGTH, LOCATION, WWW_AUTHENTICATE},
        request::Parts,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tracing::{Instrument, debug, info_span};

use super::initialize::AuthContext;
use super::options::{AuthOptions, AuthenticateSpec};
use super::state::AuthState;
use crate::error::AuthError;
use crate::services::auth_info::{AuthInfoTransform, IdentityTransform};
use crate::services::session::Session;
use crate::services::strategy::{
    AuthInfo, Challenge, InvalidStatus, Outcome, Principal, StrategyContext, StrategyRegistry,
    StrategyRunner, outcome::message_of,
};

/// Authentication middleware for one strategy name and one set of options.
pub struct Authenticate {
    registry: Arc<StrategyRegistry>,
    name: String,
    options: AuthOptions,
    transform: Arc<dyn AuthInfoTransform>,
}

impl std::fmt::Debug for Authenticate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticate")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

impl Authenticate {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        name: impl Into<String>,
        spec: impl Into<AuthenticateSpec>,
    ) -> Result<Self, AuthError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuthError::MissingStrategyName);
        }

        let options = match spec.into() {
            AuthenticateSpec::Options(options) => options,
            AuthenticateSpec::Callback(_) => {
                return Err(AuthError::Unsupported("custom authentication callbacks"));
            }
        };

        Ok(Self {
            registry,
            name,
            options,
            transform: Arc::new(IdentityTransform),
        })
    }

    /// Installs the transform applied to `info` on success (when `authInfo` is on).
    pub fn with_auth_info(mut self, transform: impl AuthInfoTransform + 'static) -> Self {
        self.transform = Arc::new(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    /// Puts this middleware in front of every route of `router`.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(
            Arc::new(self),
            authenticate_middleware,
        ))
    }

    pub async fn handle(&self, req: Request, next: Next) -> Result<Response, AuthError> {
        let span = info_span!(
            "authenticate",
            strategy = %self.name,
            outcome = tracing::field::Empty
        );
        self.dispatch(req, next).instrument(span).await
    }

    async fn dispatch(&self, req: Request, next: Next) -> Result<Response, AuthError> {
        let prototype = self
            .registry
            .lookup(&self.name)
            .ok_or_else(|| AuthError::UnknownStrategy(self.name.clone()))?;

        let (mut parts, body) = req.into_parts();
        let auth = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::NotInitialized)?;

        let outcome = {
            let ctx = StrategyContext::new(&parts, auth.query(), auth.session())
                .with_body(auth.body());
            StrategyRunner::new(prototype)
                .run(&ctx, &self.options)
                .await
        };
        tracing::Span::current().record("outcome", outcome.kind());

        match outcome {
            Outcome::Success { user, info } => {
                if let Some(url) = self.on_success(&mut parts, &auth, user, info).await? {
                    return found(&url);
                }
                Ok(next.run(Request::from_parts(parts, body)).await)
            }
            Outcome::Fail { challenge, status } => {
                self.on_failure(auth.session(), challenge.as_ref(), status)
            }
            Outcome::Redirect { url, status } => {
                redirect(&url, status_code(status.unwrap_or(302))?)
            }
            Outcome::Pass => Ok(next.run(Request::from_parts(parts, body)).await),
            Outcome::Error(err) => match err.downcast::<InvalidStatus>() {
                Ok(invalid) => {
                    let InvalidStatus(code) = *invalid;
                    Err(AuthError::InvalidStatus(code))
                }
                Err(err) => Err(AuthError::Strategy(err)),
            },
        }
    }

    /// Applies success effects. Returns the URL to redirect to, if any.
    async fn on_success(
        &self,
        parts: &mut Parts,
        auth: &AuthContext,
        user: Principal,
        info: Option<AuthInfo>,
    ) -> Result<Option<String>, AuthError> {
        let session = auth.session();

        let message = match &self.options.success_message {
            Some(option) => option.resolve(info.as_ref().and_then(message_of)),
            None => None,
        };
        if message.is_some() && session.is_none() {
            return Err(AuthError::SessionUnavailable);
        }

        let auth_info = if self.options.auth_info {
            let ctx = StrategyContext::new(parts, auth.query(), session).with_body(auth.body());
            let transformed = self
                .transform
                .transform(info, &ctx)
                .await
                .map_err(AuthError::Transform)?;
            Some(transformed)
        } else {
            None
        };

        if let (Some(message), Some(session)) = (message, session) {
            session.push_message(message);
        }

        let state = AuthState::of(&mut parts.extensions);
        if let Some(info) = auth_info {
            state.set_auth_info(info);
        }
        match &self.options.assign_property {
            Some(property) => state.assign(property, user),
            None => state.log_in(user),
        }

        if let Some(fallback) = &self.options.success_return_to_or_redirect {
            let url = session
                .and_then(Session::take_return_to)
                .unwrap_or_else(|| fallback.clone());
            return Ok(Some(url));
        }

        Ok(self.options.success_redirect.clone())
    }

    fn on_failure(
        &self,
        session: Option<&Session>,
        challenge: Option<&Challenge>,
        status: Option<u16>,
    ) -> Result<Response, AuthError> {
        let supplied = challenge.and_then(Challenge::message);

        let recorded = match &self.options.failure_message {
            Some(option) => option.resolve(supplied),
            None => None,
        };
        if let Some(message) = &recorded {
            session
                .ok_or(AuthError::SessionUnavailable)?
                .push_message(message.clone());
        }

        if let Some(url) = &self.options.failure_redirect {
            return found(url);
        }

        let status = status_code(status.unwrap_or(401))?;
        debug!(status = status.as_u16(), "authentication failed");

        let message = recorded
            .or_else(|| supplied.map(str::to_string))
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        let challenge = if status == StatusCode::UNAUTHORIZED {
            Some(HeaderValue::from_str(&message)?)
        } else {
            None
        };

        if self.options.fail_with_error {
            return Err(AuthError::authentication(status, challenge));
        }

        let mut res = (status, message).into_response();
        if let Some(challenge) = challenge {
            res.headers_mut().insert(WWW_AUTHENTICATE, challenge);
        }
        Ok(res)
    }
}

async fn authenticate_middleware(
    State(auth): State<Arc<Authenticate>>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    auth.handle(req, next).await
}

fn status_code(code: u16) -> Result<StatusCode, AuthError> {
    StatusCode::from_u16(code).map_err(|_| AuthError::InvalidStatus(code.to_string()))
}

fn found(url: &str) -> Result<Response, AuthError> {
    redirect(url, StatusCode::FOUND)
}

fn redirect(url: &str, status: StatusCode) -> Result<Response, AuthError> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = status;
    res.headers_mut()
        .insert(LOCATION, HeaderValue::from_str(url)?);
    res.headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    Ok(res)
}
