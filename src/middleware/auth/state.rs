/*
 * Responsibility
 * - Identity slots attached to a request (default user slot, named properties, auth info)
 * - Login helpers exposed to handlers
 *
 * Notes
 * - Lives in request extensions; `initialize` inserts an empty one per request.
 */
use std::collections::HashMap;

use axum::http::Extensions;

use crate::services::strategy::{AuthInfo, Principal};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    user: Option<Principal>,
    properties: HashMap<String, Principal>,
    auth_info: Option<AuthInfo>,
}

impl AuthState {
    pub fn user(&self) -> Option<&Principal> {
        self.user.as_ref()
    }

    pub fn property(&self, name: &str) -> Option<&Principal> {
        self.properties.get(name)
    }

    pub fn auth_info(&self) -> Option<&AuthInfo> {
        self.auth_info.as_ref()
    }

    pub fn log_in(&mut self, user: Principal) {
        self.user = Some(user);
    }

    pub fn log_out(&mut self) {
        self.user = None;
        self.auth_info = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_unauthenticated(&self) -> bool {
        !self.is_authenticated()
    }

    pub(crate) fn assign(&mut self, property: &str, user: Principal) {
        self.properties.insert(property.to_string(), user);
    }

    pub(crate) fn set_auth_info(&mut self, info: Option<AuthInfo>) {
        self.auth_info = info;
    }

    /// The request's state, inserting an empty one if missing.
    pub(crate) fn of(extensions: &mut Extensions) -> &mut Self {
        extensions.get_or_insert_default::<Self>()
    }
}
