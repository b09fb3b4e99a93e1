//! Per-request authentication setup. Must run before any `authenticate` layer.
//!
//! Inserts into the request extensions:
//! - `AuthContext`: the shared registry handle plus the session reference,
//!   parsed query and parsed body copied from the request
//! - an empty `AuthState` (unless an outer layer already provided one)
//!
//! Form and JSON bodies are buffered (up to the configured limit), parsed for
//! strategies, and handed on unchanged to the rest of the pipeline.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    extract::{Request, State},
    http::{HeaderMap, Uri, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::Response,
};
use serde_json::{Map, Value};

use super::state::AuthState;
use crate::error::AuthError;
use crate::services::session::Session;
use crate::services::strategy::StrategyRegistry;

#[derive(Debug, Clone)]
pub struct AuthContext {
    registry: Arc<StrategyRegistry>,
    session: Option<Session>,
    query: Arc<HashMap<String, String>>,
    body: Option<Arc<Value>>,
}

impl AuthContext {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        session: Option<Session>,
        query: HashMap<String, String>,
    ) -> Self {
        Self {
            registry,
            session,
            query: Arc::new(query),
            body: None,
        }
    }

    /// Attaches the parsed request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Parsed form or JSON body; `None` for other content types.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_deref()
    }
}

#[derive(Debug, Clone)]
struct Initialize {
    registry: Arc<StrategyRegistry>,
    body_limit: usize,
}

/// Wraps `router` so every request gets an `AuthContext` and `AuthState`.
///
/// `body_limit` bounds how many body bytes are buffered for strategies.
pub fn apply<S>(
    router: Router<S>,
    registry: Arc<StrategyRegistry>,
    body_limit: usize,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let init = Arc::new(Initialize {
        registry,
        body_limit,
    });
    router.layer(middleware::from_fn_with_state(init, initialize_middleware))
}

async fn initialize_middleware(
    State(init): State<Arc<Initialize>>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let session = req.extensions().get::<Session>().cloned();
    let query = parse_query(req.uri());
    let mut auth = AuthContext::new(init.registry.clone(), session, query);

    let mut req = match BodyKind::of(req.headers()) {
        Some(kind) => {
            let (parts, body) = req.into_parts();
            let bytes = to_bytes(body, init.body_limit)
                .await
                .map_err(AuthError::UnreadableBody)?;
            auth = auth.with_body(kind.parse(&bytes)?);
            Request::from_parts(parts, Body::from(bytes))
        }
        None => req,
    };

    req.extensions_mut().insert(auth);
    AuthState::of(req.extensions_mut());

    Ok(next.run(req).await)
}

/// Body encodings made available to strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Form,
    Json,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Option<Self> {
        let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();

        if mime == "application/x-www-form-urlencoded" {
            Some(Self::Form)
        } else if mime == "application/json" || mime.ends_with("+json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    fn parse(self, bytes: &Bytes) -> Result<Value, AuthError> {
        match self {
            Self::Form => {
                let fields: Map<String, Value> = url::form_urlencoded::parse(bytes)
                    .into_owned()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                Ok(Value::Object(fields))
            }
            Self::Json if bytes.is_empty() => Ok(Value::Null),
            Self::Json => serde_json::from_slice(bytes).map_err(AuthError::MalformedBody),
        }
    }
}

pub(crate) fn parse_query(uri: &Uri) -> HashMap<String, String> {
    uri.query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
