/*
 * Responsibility
 * - The capability contract every authentication strategy implements
 * - The read-only request view a strategy authenticates against
 */
use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{Extensions, HeaderMap, Method, Uri, request::Parts};
use serde_json::Value;
use tower::BoxError;

use super::signals::Signals;
use crate::middleware::auth::options::AuthOptions;
use crate::services::session::Session;

/// A pluggable authentication algorithm.
///
/// Implementations report exactly one outcome through `signals`, either before
/// returning or later from a task holding a clone. Returning `Err` without having
/// signalled is reported as the `error` outcome.
///
/// One registered value is shared by every request, so per-attempt state belongs
/// in locals of `authenticate`, not in `self`.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Default registration key.
    fn name(&self) -> &str;

    async fn authenticate(
        &self,
        ctx: &StrategyContext<'_>,
        options: &AuthOptions,
        signals: Signals,
    ) -> Result<(), BoxError>;
}

/// What a strategy can see of the request.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    parts: &'a Parts,
    query: &'a HashMap<String, String>,
    body: Option<&'a Value>,
    session: Option<&'a Session>,
}

impl<'a> StrategyContext<'a> {
    pub fn new(
        parts: &'a Parts,
        query: &'a HashMap<String, String>,
        session: Option<&'a Session>,
    ) -> Self {
        Self {
            parts,
            query,
            body: None,
            session,
        }
    }

    pub fn with_body(mut self, body: Option<&'a Value>) -> Self {
        self.body = body;
        self
    }

    pub fn method(&self) -> &'a Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &'a Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &'a HeaderMap {
        &self.parts.headers
    }

    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn extensions(&self) -> &'a Extensions {
        &self.parts.extensions
    }

    pub fn query(&self) -> &'a HashMap<String, String> {
        self.query
    }

    pub fn query_param(&self, name: &str) -> Option<&'a str> {
        self.query.get(name).map(String::as_str)
    }

    /// Parsed form or JSON body, when the request carried one.
    pub fn body(&self) -> Option<&'a Value> {
        self.body
    }

    /// A string field of the parsed body.
    pub fn body_param(&self, name: &str) -> Option<&'a str> {
        self.body?.get(name)?.as_str()
    }

    pub fn session(&self) -> Option<&'a Session> {
        self.session
    }
}
