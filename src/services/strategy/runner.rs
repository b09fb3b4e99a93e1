//! Runs one strategy against one request and resolves exactly one outcome.
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tower::BoxError;
use tracing::debug;

use super::contract::{Strategy, StrategyContext};
use super::outcome::Outcome;
use super::signals::Signals;
use crate::middleware::auth::options::AuthOptions;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("strategy `{0}` completed without reporting an outcome")]
    NoOutcome(String),
}

/// Per-attempt view of a shared strategy: the prototype's behaviour plus
/// request-scoped outcome capabilities. Dropped once the outcome resolves.
pub struct StrategyInstance {
    prototype: Arc<dyn Strategy>,
    signals: Signals,
}

impl StrategyInstance {
    fn new(prototype: Arc<dyn Strategy>) -> (Self, oneshot::Receiver<Outcome>) {
        let (signals, rx) = Signals::channel();
        (Self { prototype, signals }, rx)
    }

    pub fn name(&self) -> &str {
        self.prototype.name()
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    async fn authenticate(
        &self,
        ctx: &StrategyContext<'_>,
        options: &AuthOptions,
    ) -> Result<(), BoxError> {
        self.prototype
            .authenticate(ctx, options, self.signals.clone())
            .await
    }
}

/// Drives a single attempt. Performs no response or session effects of its own.
pub struct StrategyRunner {
    prototype: Arc<dyn Strategy>,
}

impl StrategyRunner {
    pub fn new(prototype: Arc<dyn Strategy>) -> Self {
        Self { prototype }
    }

    pub async fn run(self, ctx: &StrategyContext<'_>, options: &AuthOptions) -> Outcome {
        let (instance, mut rx) = StrategyInstance::new(self.prototype);
        let name = instance.name().to_string();

        {
            let attempt = instance.authenticate(ctx, options);
            tokio::pin!(attempt);

            tokio::select! {
                biased;
                settled = &mut rx => {
                    return settled.unwrap_or_else(|_| no_outcome(name));
                }
                result = &mut attempt => {
                    if let Err(err) = result {
                        instance.signals().error(err);
                    }
                }
            }
        }

        // The strategy returned. Release our handle so that, if no clone is left
        // anywhere, the receiver observes the closed channel instead of hanging.
        drop(instance);

        rx.await.unwrap_or_else(|_| no_outcome(name))
    }
}

fn no_outcome(name: String) -> Outcome {
    debug!(strategy = %name, "strategy finished without signalling");
    Outcome::Error(Box::new(RunnerError::NoOutcome(name)))
}
