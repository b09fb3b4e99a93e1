pub mod auth_info;
pub mod session;
pub mod strategy;
