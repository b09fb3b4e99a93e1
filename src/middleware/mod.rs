/*
 * Responsibility
 * - public surface of the middleware layer (re-exports)
 * - auth: initialize / authenticate, http: transport-level layers
 */
pub mod auth;
pub mod http;
