/*
 * Responsibility
 * - The single tagged result of one strategy attempt (Outcome)
 * - Challenge / fail-argument shapes accepted from strategies
 * - Message extraction from info / challenge values
 */
use serde_json::{Number, Value};
use thiserror::Error;
use tower::BoxError;

/// Authenticated principal, as produced by a strategy.
pub type Principal = Value;

/// Strategy-supplied details accompanying a success (`{"message": ...}`, a plain string, ...).
pub type AuthInfo = Value;

/// Result of one strategy attempt. Exactly one is produced per attempt.
#[derive(Debug)]
pub enum Outcome {
    Success {
        user: Principal,
        info: Option<AuthInfo>,
    },
    Fail {
        challenge: Option<Challenge>,
        status: Option<u16>,
    },
    Redirect {
        url: String,
        status: Option<u16>,
    },
    Pass,
    Error(BoxError),
}

impl Outcome {
    /// Short tag, used for span fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Fail { .. } => "fail",
            Self::Redirect { .. } => "redirect",
            Self::Pass => "pass",
            Self::Error(_) => "error",
        }
    }
}

/// Scheme-specific failure detail.
#[derive(Debug, Clone, PartialEq)]
pub enum Challenge {
    Text(String),
    Structured(Value),
}

impl Challenge {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(value) => message_of(value),
        }
    }
}

/// First argument of `fail`: either a challenge or the status shorthand.
#[derive(Debug, Clone, PartialEq)]
pub enum FailArg {
    None,
    Status(u16),
    /// A number that is not a usable status code (fractional, negative, too large).
    InvalidStatus(String),
    Challenge(Challenge),
}

/// Reported when a strategy asks for a status code that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status code {0}")]
pub struct InvalidStatus(pub String);

fn status_from_number(n: &Number) -> FailArg {
    let integral = n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u16::MAX))
            .map(|f| f as u64)
    });

    match integral.and_then(|n| u16::try_from(n).ok()) {
        Some(status) => FailArg::Status(status),
        None => FailArg::InvalidStatus(n.to_string()),
    }
}

impl From<()> for FailArg {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<u16> for FailArg {
    fn from(status: u16) -> Self {
        Self::Status(status)
    }
}

impl From<&str> for FailArg {
    fn from(text: &str) -> Self {
        Self::Challenge(Challenge::Text(text.to_string()))
    }
}

impl From<String> for FailArg {
    fn from(text: String) -> Self {
        Self::Challenge(Challenge::Text(text))
    }
}

impl From<Challenge> for FailArg {
    fn from(challenge: Challenge) -> Self {
        Self::Challenge(challenge)
    }
}

impl From<Value> for FailArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Number(n) => status_from_number(&n),
            Value::String(text) => Self::Challenge(Challenge::Text(text)),
            other => Self::Challenge(Challenge::Structured(other)),
        }
    }
}

impl<T: Into<FailArg>> From<Option<T>> for FailArg {
    fn from(arg: Option<T>) -> Self {
        arg.map_or(Self::None, Into::into)
    }
}

/// Human-readable message carried by an info/challenge value.
///
/// A string is its own message; an object contributes its `message` field.
pub fn message_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        Value::Object(map) => map.get("message").and_then(Value::as_str),
        _ => None,
    }
}
