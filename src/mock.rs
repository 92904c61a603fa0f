//! # Mock Actors & Testing Guide
//!
//! Two stand-in actors for testing code that talks to other actors:
//!
//! - [`MockActor`] answers `ask`s with scripted replies (`expect().return_ok(..)` /
//!   `return_err(..)`) and records every message it receives.
//! - [`Probe`] records every message it receives together with its sender and always
//!   replies with `Default::default()`. Use it to assert what the actor under test sent.
//!
//! Both are created in pairs: the actor value goes to [`Core::create_actor`](crate::Core::create_actor),
//! the handle stays with the test.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | Mock / Probe | Real Actor |
//! |---------|--------------|------------|
//! | **State** | Scripted replies, recorded input | Real state management |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//! | **Use Case** | Testing an actor *around* its collaborators | Testing the actor itself or the full system |
//!
//! ## Example
//!
//! ```rust
//! use actor_runtime::mock::MockActor;
//! use actor_runtime::{ActorError, Core, Message};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Lookup(u32);
//! impl Message for Lookup {
//!     type Reply = String;
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let core = Core::default();
//!     let ctx = core.context();
//!
//!     let (mock, handle) = MockActor::<Lookup>::new();
//!     handle.expect().return_ok("alice".to_string());
//!     handle.expect().return_err("backend unavailable");
//!     let users = ctx.create_actor("users", mock).unwrap();
//!
//!     let first = users.ask(&ctx, Lookup(1), Duration::from_secs(1)).await;
//!     assert_eq!(first.unwrap(), "alice");
//!
//!     // Simulate a downstream failure
//!     let second = users.ask(&ctx, Lookup(2), Duration::from_secs(1)).await;
//!     assert!(matches!(second, Err(ActorError::HandlerFailure { .. })));
//!
//!     handle.verify();
//!     assert_eq!(handle.received_count(), 2);
//!     core.shutdown().await;
//! }
//! ```

use crate::actor::{Actor, Handler};
use crate::context::Context;
use crate::error::HandlerError;
use crate::identity::Identity;
use crate::message::{short_type_name, Message};
use crate::router::RouterBuilder;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Messages seen by a mock, shared between the actor and its handle.
struct Recorder<T> {
    seen: Mutex<Vec<T>>,
    notify: Notify,
}

impl<T> Recorder<T> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            notify: Notify::new(),
        })
    }

    fn record(&self, item: T) {
        self.seen.lock().push(item);
        self.notify.notify_waiters();
    }

    fn len(&self) -> usize {
        self.seen.lock().len()
    }

    fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.seen.lock())
    }

    async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.len() >= count {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}

// =============================================================================
// MOCK ACTOR
// =============================================================================

type Expectations<M> = Arc<Mutex<VecDeque<Result<<M as Message>::Reply, String>>>>;

/// An actor handling `M` with scripted replies.
///
/// A message that arrives with no expectation left fails its handler, which an `ask`
/// caller observes as `HandlerFailure`.
pub struct MockActor<M: Message> {
    expectations: Expectations<M>,
    received: Arc<Recorder<M>>,
}

/// Test-side handle of a [`MockActor`].
pub struct MockHandle<M: Message> {
    expectations: Expectations<M>,
    received: Arc<Recorder<M>>,
}

impl<M: Message> MockActor<M> {
    pub fn new() -> (Self, MockHandle<M>) {
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Recorder::new();
        (
            Self {
                expectations: expectations.clone(),
                received: received.clone(),
            },
            MockHandle {
                expectations,
                received,
            },
        )
    }
}

impl<M: Message> Actor for MockActor<M> {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new().route::<M>()
    }
}

#[async_trait]
impl<M: Message> Handler<M> for MockActor<M> {
    async fn handle(&mut self, _ctx: &Context, message: M) -> Result<M::Reply, HandlerError> {
        let expectation = self.expectations.lock().pop_front();
        self.received.record(message);
        match expectation {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(reason.into()),
            None => Err(format!("unexpected {}", short_type_name::<M>()).into()),
        }
    }
}

impl<M: Message> MockHandle<M> {
    /// Queues the reply to the next message.
    pub fn expect(&self) -> ExpectationBuilder<M> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    pub fn received_count(&self) -> usize {
        self.received.len()
    }

    /// Drains and returns the messages received so far, oldest first.
    pub fn take_received(&self) -> Vec<M> {
        self.received.take()
    }

    /// Waits until at least `count` messages have been received. `false` on timeout.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        self.received.wait_for(count, timeout).await
    }

    /// Panics if any queued expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for one scripted reply.
pub struct ExpectationBuilder<M: Message> {
    expectations: Expectations<M>,
}

impl<M: Message> ExpectationBuilder<M> {
    pub fn return_ok(self, reply: M::Reply) {
        self.expectations.lock().push_back(Ok(reply));
    }

    pub fn return_err(self, reason: impl Into<String>) {
        self.expectations.lock().push_back(Err(reason.into()));
    }
}

// =============================================================================
// PROBE
// =============================================================================

/// An actor recording every `M` it receives along with the sender.
pub struct Probe<M: Message> {
    received: Arc<Recorder<(Identity, M)>>,
}

/// Test-side handle of a [`Probe`].
pub struct ProbeHandle<M: Message> {
    received: Arc<Recorder<(Identity, M)>>,
}

impl<M: Message> Probe<M>
where
    M::Reply: Default,
{
    pub fn new() -> (Self, ProbeHandle<M>) {
        let received = Recorder::new();
        (
            Self {
                received: received.clone(),
            },
            ProbeHandle { received },
        )
    }
}

impl<M: Message> Actor for Probe<M>
where
    M::Reply: Default,
{
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new().route::<M>()
    }
}

#[async_trait]
impl<M: Message> Handler<M> for Probe<M>
where
    M::Reply: Default,
{
    async fn handle(&mut self, ctx: &Context, message: M) -> Result<M::Reply, HandlerError> {
        let sender = ctx.sender().cloned().unwrap_or_else(Identity::root);
        self.received.record((sender, message));
        Ok(M::Reply::default())
    }
}

impl<M: Message> ProbeHandle<M> {
    pub fn received_count(&self) -> usize {
        self.received.len()
    }

    /// Drains and returns `(sender, message)` pairs received so far, oldest first.
    pub fn take_received(&self) -> Vec<(Identity, M)> {
        self.received.take()
    }

    /// Waits until at least `count` messages have been received. `false` on timeout.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        self.received.wait_for(count, timeout).await
    }
}
