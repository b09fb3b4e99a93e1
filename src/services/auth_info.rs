//! Authenticated-info transform applied to `info` after a successful attempt.
use async_trait::async_trait;
use tower::BoxError;

use crate::services::strategy::{AuthInfo, StrategyContext};

#[async_trait]
pub trait AuthInfoTransform: Send + Sync {
    async fn transform(
        &self,
        info: Option<AuthInfo>,
        ctx: &StrategyContext<'_>,
    ) -> Result<Option<AuthInfo>, BoxError>;
}

/// Pass-through transform used when none is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

#[async_trait]
impl AuthInfoTransform for IdentityTransform {
    async fn transform(
        &self,
        info: Option<AuthInfo>,
        _ctx: &StrategyContext<'_>,
    ) -> Result<Option<AuthInfo>, BoxError> {
        Ok(info)
    }
}

/// Adapts a synchronous closure.
pub struct FnTransform<F>(pub F);

#[async_trait]
impl<F> AuthInfoTransform for FnTransform<F>
where
    F: Fn(Option<AuthInfo>, &StrategyContext<'_>) -> Result<Option<AuthInfo>, BoxError>
        + Send
        + Sync,
{
    async fn transform(
        &self,
        info: Option<AuthInfo>,
        ctx: &StrategyContext<'_>,
    ) -> Result<Option<AuthInfo>, BoxError> {
        (self.0)(info, ctx)
    }
}
