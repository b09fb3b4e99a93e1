/*
 * Responsibility
 * - Authentication layers: `initialize` (per-request setup) and `authenticate` (strategy dispatch)
 * - Option / identity-slot types shared by both
 */
pub mod authenticate;
pub mod initialize;
pub mod options;
pub mod state;

pub use authenticate::Authenticate;
pub use initialize::AuthContext;
pub use options::{AuthOptions, AuthenticateSpec, CustomCallback, MessageOption};
pub use state::AuthState;
