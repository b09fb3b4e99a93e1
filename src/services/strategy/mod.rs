pub mod contract;
pub mod outcome;
pub mod registry;
pub mod runner;
pub mod signals;

pub use contract::{Strategy, StrategyContext};
pub use outcome::{AuthInfo, Challenge, FailArg, InvalidStatus, Outcome, Principal};
pub use registry::StrategyRegistry;
pub use runner::{RunnerError, StrategyRunner};
pub use signals::Signals;
