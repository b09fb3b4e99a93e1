use std::{collections::HashMap, fmt, sync::Arc};

use super::contract::Strategy;

/// Name → strategy prototype table.
///
/// Populated during bootstrap, then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn Strategy>>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `strategy` under its own name. A previous entry with that name is replaced.
    pub fn register<S: Strategy + 'static>(&mut self, strategy: S) -> &mut Self {
        let name = strategy.name().to_string();
        self.register_as(name, strategy)
    }

    pub fn register_as<S: Strategy + 'static>(
        &mut self,
        name: impl Into<String>,
        strategy: S,
    ) -> &mut Self {
        self.strategies.insert(name.into(), Arc::new(strategy));
        self
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tower::BoxError;

    use super::*;
    use crate::middleware::auth::options::AuthOptions;
    use crate::services::strategy::{Signals, StrategyContext};

    struct Named(&'static str);

    #[async_trait]
    impl Strategy for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn authenticate(
            &self,
            _ctx: &StrategyContext<'_>,
            _options: &AuthOptions,
            signals: Signals,
        ) -> Result<(), BoxError> {
            signals.pass();
            Ok(())
        }
    }

    #[test]
    fn register_uses_strategy_name() {
        let mut registry = StrategyRegistry::new();
        registry.register(Named("local")).register(Named("bearer"));

        assert!(registry.contains("local"));
        assert!(registry.lookup("bearer").is_some());
        assert_eq!(registry.names(), vec!["bearer", "local"]);
    }

    #[test]
    fn lookup_of_unregistered_name_is_none() {
        let registry = StrategyRegistry::new();
        assert!(registry.lookup("nonexistent").is_none());
    }

    #[test]
    fn register_as_overrides_name_and_replaces() {
        let mut registry = StrategyRegistry::new();
        registry.register_as("login", Named("local"));
        registry.register_as("login", Named("other"));

        assert_eq!(registry.names(), vec!["login"]);
        assert_eq!(registry.lookup("login").unwrap().name(), "other");

        assert!(registry.unregister("login").is_some());
        assert!(!registry.contains("login"));
    }
}
