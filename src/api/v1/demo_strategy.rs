//! Scaffold strategy for the demo server.
//!
//! Trusts an `x-demo-user` header as the user id. Stand-in only: swap it for a
//! real credential check before exposing the server.

use async_trait::async_trait;
use serde_json::json;
use tower::BoxError;

use crate::middleware::auth::AuthOptions;
use crate::services::strategy::{Signals, Strategy, StrategyContext};

pub const DEMO_USER_HEADER: &str = "x-demo-user";

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoHeaderStrategy;

#[async_trait]
impl Strategy for DemoHeaderStrategy {
    fn name(&self) -> &str {
        "demo-header"
    }

    async fn authenticate(
        &self,
        ctx: &StrategyContext<'_>,
        _options: &AuthOptions,
        signals: Signals,
    ) -> Result<(), BoxError> {
        match ctx.header(DEMO_USER_HEADER).map(str::trim) {
            Some(id) if !id.is_empty() => {
                signals.success(json!({ "id": id }), Some(json!({ "message": "Welcome back" })));
            }
            _ => {
                signals.fail("Missing x-demo-user header", Some(401));
            }
        }
        Ok(())
    }
}
