/*
 * Responsibility
 * - Per-route authentication options (what to do with each outcome)
 * - JSON shape is camelCase so options can come straight from configuration
 */
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::services::strategy::Outcome;

/// `true` = use the message supplied by the strategy, a string = use this text instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MessageOption {
    Flag(bool),
    Text(String),
}

impl MessageOption {
    /// Message to record, given what the strategy supplied.
    pub fn resolve(&self, supplied: Option<&str>) -> Option<String> {
        match self {
            Self::Flag(true) => supplied.map(str::to_string),
            Self::Flag(false) => None,
            Self::Text(text) => Some(text.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthOptions {
    pub success_redirect: Option<String>,
    pub success_return_to_or_redirect: Option<String>,
    pub success_message: Option<MessageOption>,
    pub failure_redirect: Option<String>,
    pub failure_message: Option<MessageOption>,
    pub fail_with_error: bool,
    pub assign_property: Option<String>,
    pub auth_info: bool,
    /// Strategy-specific keys (`scope`, ...), passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            success_redirect: None,
            success_return_to_or_redirect: None,
            success_message: None,
            failure_redirect: None,
            failure_message: None,
            fail_with_error: false,
            assign_property: None,
            auth_info: true,
            extra: Map::new(),
        }
    }
}

impl AuthOptions {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Caller-supplied handler for the outcome.
pub type CustomCallback = Arc<dyn Fn(&Outcome) + Send + Sync>;

/// The configuration shapes `Authenticate` can be built from.
///
/// Only `Options` is supported; `Callback` exists so that asking for it fails
/// loudly instead of being ignored.
#[derive(Clone)]
pub enum AuthenticateSpec {
    Options(AuthOptions),
    Callback(CustomCallback),
}

impl fmt::Debug for AuthenticateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Options(options) => f.debug_tuple("Options").field(options).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<AuthOptions> for AuthenticateSpec {
    fn from(options: AuthOptions) -> Self {
        Self::Options(options)
    }
}

impl From<CustomCallback> for AuthenticateSpec {
    fn from(callback: CustomCallback) -> Self {
        Self::Callback(callback)
    }
}
