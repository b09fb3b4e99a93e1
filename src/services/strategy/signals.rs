//! Outcome capabilities handed to a strategy, and the one-shot settlement behind them.
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::oneshot;
use tower::BoxError;
use tracing::debug;

use super::outcome::{AuthInfo, FailArg, InvalidStatus, Outcome, Principal};

/// Settlement slot for one attempt: a settled flag plus the pending result.
///
/// The first `settle` wins; later calls are no-ops. If the receiving side is gone
/// (request cancelled), settling still succeeds and the outcome is dropped.
#[derive(Debug)]
struct Settlement {
    settled: AtomicBool,
    slot: Mutex<Option<oneshot::Sender<Outcome>>>,
}

impl Settlement {
    fn settle(&self, outcome: Outcome) -> bool {
        if self.settled.swap(true, Ordering::AcqRel) {
            debug!(outcome = outcome.kind(), "ignoring duplicate strategy signal");
            return false;
        }

        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(sender) = sender {
            // Receiver dropped means the request went away; nothing left to notify.
            let _ = sender.send(outcome);
        }
        true
    }
}

/// The five outcome capabilities of one strategy attempt.
///
/// Cheap to clone; clones share the same settlement, so a strategy may move a
/// clone into a spawned task and report from there. Every method returns `true`
/// if it settled the attempt and `false` if an earlier signal already did.
#[derive(Debug, Clone)]
pub struct Signals {
    settlement: Arc<Settlement>,
}

impl Signals {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let signals = Self {
            settlement: Arc::new(Settlement {
                settled: AtomicBool::new(false),
                slot: Mutex::new(Some(tx)),
            }),
        };
        (signals, rx)
    }

    pub fn success(&self, user: Principal, info: Option<AuthInfo>) -> bool {
        self.settlement.settle(Outcome::Success { user, info })
    }

    /// Rejects the attempt.
    ///
    /// A numeric first argument is the status shorthand: `fail(401u16, None)`
    /// is the same as `fail((), Some(401))`, and it takes precedence over `status`.
    /// A number that is not a status code settles the attempt as an error.
    pub fn fail(&self, arg: impl Into<FailArg>, status: Option<u16>) -> bool {
        let (challenge, status) = match arg.into() {
            FailArg::Status(code) => (None, Some(code)),
            FailArg::InvalidStatus(raw) => {
                return self
                    .settlement
                    .settle(Outcome::Error(Box::new(InvalidStatus(raw))));
            }
            FailArg::Challenge(challenge) => (Some(challenge), status),
            FailArg::None => (None, status),
        };
        self.settlement.settle(Outcome::Fail { challenge, status })
    }

    pub fn redirect(&self, url: impl Into<String>, status: Option<u16>) -> bool {
        self.settlement.settle(Outcome::Redirect {
            url: url.into(),
            status,
        })
    }

    pub fn pass(&self) -> bool {
        self.settlement.settle(Outcome::Pass)
    }

    pub fn error(&self, err: impl Into<BoxError>) -> bool {
        self.settlement.settle(Outcome::Error(err.into()))
    }

    pub fn is_settled(&self) -> bool {
        self.settlement.settled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::strategy::outcome::Challenge;

    #[tokio::test]
    async fn first_signal_wins() {
        let (signals, rx) = Signals::channel();

        assert!(signals.success(json!({"id": "alice"}), None));
        assert!(!signals.fail("late", Some(403)));
        assert!(!signals.pass());
        assert!(signals.is_settled());

        match rx.await.unwrap() {
            Outcome::Success { user, info } => {
                assert_eq!(user, json!({"id": "alice"}));
                assert!(info.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_with_numeric_first_argument_is_status_only() {
        let (signals, rx) = Signals::channel();
        signals.fail(401u16, Some(500));

        match rx.await.unwrap() {
            Outcome::Fail { challenge, status } => {
                assert!(challenge.is_none());
                assert_eq!(status, Some(401));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_keeps_challenge_and_status() {
        let (signals, rx) = Signals::channel();
        signals.fail("Bad credentials", Some(403));

        match rx.await.unwrap() {
            Outcome::Fail { challenge, status } => {
                assert_eq!(challenge, Some(Challenge::Text("Bad credentials".into())));
                assert_eq!(status, Some(403));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_with_unusable_number_settles_as_invalid_status() {
        let (signals, rx) = Signals::channel();
        signals.fail(json!(70000), None);

        match rx.await.unwrap() {
            Outcome::Error(err) => {
                assert_eq!(
                    err.downcast_ref::<InvalidStatus>(),
                    Some(&InvalidStatus("70000".into()))
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn settling_after_receiver_dropped_is_a_no_op() {
        let (signals, rx) = Signals::channel();
        drop(rx);

        assert!(signals.redirect("/elsewhere", None));
        assert!(!signals.error("too late"));
    }

    #[tokio::test]
    async fn clones_share_the_settlement() {
        let (signals, rx) = Signals::channel();
        let remote = signals.clone();

        tokio::spawn(async move {
            remote.pass();
        })
        .await
        .unwrap();

        assert!(!signals.success(json!("bob"), None));
        assert!(matches!(rx.await.unwrap(), Outcome::Pass));
    }
}
