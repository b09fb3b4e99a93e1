/*
 * Responsibility
 * - Shared context built once at startup (AppState)
 * - Cheap to clone (Arc inside)
 */
use std::sync::Arc;

use crate::services::strategy::StrategyRegistry;

#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: Arc<StrategyRegistry>,
}

impl AppState {
    /// Freezes the registry; no strategies can be registered afterwards.
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
