/*
 * Responsibility
 * - Request-scoped handle to the session collaborator
 * - Only the two keys authentication touches: the message log and the return-to URL
 *
 * Notes
 * - Loading/persisting the session is the job of an outer layer that inserts
 *   `Session` into the request extensions.
 */
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
}

/// Shared handle; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionData>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    fn data(&self) -> MutexGuard<'_, SessionData> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends to the message log.
    pub fn push_message(&self, message: impl Into<String>) {
        self.data().messages.push(message.into());
    }

    pub fn messages(&self) -> Vec<String> {
        self.data().messages.clone()
    }

    pub fn return_to(&self) -> Option<String> {
        self.data().return_to.clone()
    }

    pub fn set_return_to(&self, url: impl Into<String>) {
        self.data().return_to = Some(url.into());
    }

    /// Removes and returns the stored return-to URL.
    pub fn take_return_to(&self) -> Option<String> {
        self.data().return_to.take()
    }

    pub fn snapshot(&self) -> SessionData {
        self.data().clone()
    }
}
