/*
 * Responsibility
 * - v1 URL layout
 * - /health is public; /me sits behind `authenticate` with the configured strategy
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, profile::me};
use crate::config::Config;
use crate::error::AuthError;
use crate::middleware::auth::Authenticate;
use crate::state::AppState;

pub fn routes(state: &AppState, config: &Config) -> Result<Router<AppState>, AuthError> {
    let authenticate = Authenticate::new(
        state.registry.clone(),
        config.auth_strategy.clone(),
        config.auth_options.clone(),
    )?;

    let protected = authenticate.apply(Router::new().route("/me", get(me)));

    Ok(Router::new().route("/health", get(health)).merge(protected))
}
