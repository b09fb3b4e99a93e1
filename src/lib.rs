//! Strategy-based request authentication for axum.
//!
//! A named [`Strategy`](services::strategy::Strategy) is looked up in a
//! [`StrategyRegistry`](services::strategy::StrategyRegistry), run once per
//! request, and its outcome (success / fail / redirect / pass / error) is turned
//! into identity, session, response and pipeline effects by
//! [`Authenticate`](middleware::auth::Authenticate).

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use error::AuthError;
pub use middleware::auth::{AuthOptions, AuthState, Authenticate, MessageOption};
pub use services::session::Session;
pub use services::strategy::{Signals, Strategy, StrategyContext, StrategyRegistry};
