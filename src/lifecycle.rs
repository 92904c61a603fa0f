//! # Actor Lifecycle
//!
//! Every actor moves through `Created → Running → Draining → Terminated`. The current
//! stage is published on a `tokio::sync::watch` channel owned by the dispatch loop, so
//! any number of proxies can observe it or wait for a stage without polling.
//!
//! Once an actor is gone the channel's sender is dropped; observers treat that the same
//! as `Terminated`, which makes `wait_until_shutdown` resolve immediately for an actor
//! that no longer exists.

use crate::error::ActorError;
use crate::identity::Identity;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Mailbox allocated, dispatch loop not yet consuming.
    Created,
    /// Handling messages one at a time.
    Running,
    /// Shutdown received: the mailbox is closed and the queue is being flushed.
    Draining,
    /// Dispatch loop exited. The identity may be reused.
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Initialization {
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
struct Status {
    stage: Lifecycle,
    initialization: Initialization,
}

pub(crate) fn channel() -> (LifecyclePublisher, LifecycleWatch) {
    let (sender, receiver) = watch::channel(Status {
        stage: Lifecycle::Created,
        initialization: Initialization::Pending,
    });
    (LifecyclePublisher(sender), LifecycleWatch(receiver))
}

/// Write half, owned by the dispatch loop.
pub(crate) struct LifecyclePublisher(watch::Sender<Status>);

impl LifecyclePublisher {
    pub(crate) fn transition(&self, stage: Lifecycle) {
        self.0.send_modify(|status| status.stage = stage);
    }

    pub(crate) fn initialized(&self, result: Result<(), String>) {
        self.0.send_modify(|status| {
            status.initialization = match result {
                Ok(()) => Initialization::Ready,
                Err(reason) => Initialization::Failed(reason),
            }
        });
    }
}

/// Read half, shared by the registry and every proxy.
#[derive(Debug, Clone)]
pub(crate) struct LifecycleWatch(watch::Receiver<Status>);

impl LifecycleWatch {
    pub(crate) fn current(&self) -> Lifecycle {
        if self.0.has_changed().is_err() {
            return Lifecycle::Terminated;
        }
        self.0.borrow().stage
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.current() == Lifecycle::Terminated
    }

    pub(crate) async fn wait_until_shutdown(&self) {
        let mut receiver = self.0.clone();
        // A closed channel means the loop is gone, which is termination too.
        let _ = receiver
            .wait_for(|status| status.stage == Lifecycle::Terminated)
            .await;
    }

    pub(crate) async fn wait_until_initialized(&self, identity: &Identity) -> Result<(), ActorError> {
        let mut receiver = self.0.clone();
        let outcome = receiver
            .wait_for(|status| {
                status.initialization != Initialization::Pending
                    || status.stage == Lifecycle::Terminated
            })
            .await
            .map(|status| status.initialization.clone());

        match outcome {
            Ok(Initialization::Ready) => Ok(()),
            Ok(Initialization::Failed(reason)) => Err(ActorError::InitializationFailed {
                identity: identity.clone(),
                reason,
            }),
            Ok(Initialization::Pending) | Err(_) => Err(ActorError::InitializationFailed {
                identity: identity.clone(),
                reason: "terminated before initialization completed".to_string(),
            }),
        }
    }
}
