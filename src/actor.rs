//! # Actors & the Dispatch Loop
//!
//! This module defines the [`Actor`] and [`Handler`] traits and the dispatch loop that
//! runs every actor. The loop is the "server" half of an actor: it owns the actor value,
//! the receiving end of the mailbox and the lifecycle publisher.
//!
//! **Concurrency Model**:
//! Each actor's loop is one task. It dequeues a message, looks up the handler, builds a
//! fresh [`Context`] and awaits the handler to completion before it dequeues the next
//! message. Because the loop is the only code path that can reach the actor value, the
//! actor's state needs no `Mutex` or `RwLock`; exclusive ownership does the job.
//!
//! **Failure isolation**:
//! A handler that returns `Err` or panics is reported as a handler failure, and the loop
//! moves on to the next message. A message without a route is logged as a dead letter
//! and dropped. Neither stops the actor, its siblings or the Core.

use crate::config::ShutdownPolicy;
use crate::context::Context;
use crate::error::{ActorError, HandlerError};
use crate::identity::Identity;
use crate::lifecycle::{Lifecycle, LifecyclePublisher};
use crate::mailbox::MailboxReceiver;
use crate::message::{BoxReply, Envelope, Message, Shutdown, TimerDone};
use crate::router::{Router, RouterBuilder};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// An actor class.
///
/// The actor value is its private state. It is moved into its dispatch loop on creation
/// and never shared; handlers receive `&mut self`.
///
/// ```rust
/// use actor_runtime::{Actor, Context, Handler, HandlerError, Message, RouterBuilder};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct Increment;
/// impl Message for Increment {
///     type Reply = u64;
/// }
///
/// #[derive(Default)]
/// struct Counter {
///     count: u64,
/// }
///
/// impl Actor for Counter {
///     fn routes() -> RouterBuilder<Self> {
///         RouterBuilder::new().route::<Increment>()
///     }
/// }
///
/// #[async_trait]
/// impl Handler<Increment> for Counter {
///     async fn handle(&mut self, _ctx: &Context, _message: Increment) -> Result<u64, HandlerError> {
///         self.count += 1;
///         Ok(self.count)
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + Sized + 'static {
    /// Declares the messages this class handles. Resolved once per class.
    fn routes() -> RouterBuilder<Self>;

    /// Runs before the first message. An error terminates the actor.
    async fn initialize(&mut self, _ctx: &Context) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Runs once after the mailbox has been drained, before the actor terminates.
    async fn stopping(&mut self, _ctx: &Context) {}
}

/// Handling of one message type by an actor class.
#[async_trait]
pub trait Handler<M: Message>: Actor {
    async fn handle(&mut self, ctx: &Context, message: M) -> Result<M::Reply, HandlerError>;
}

/// Everything a running actor owns.
pub(crate) struct ActorCell<A: Actor> {
    pub(crate) actor: A,
    pub(crate) actor_type: &'static str,
    pub(crate) router: Arc<Router<A>>,
    pub(crate) mailbox: MailboxReceiver,
    pub(crate) context: Context,
    pub(crate) lifecycle: LifecyclePublisher,
    pub(crate) policy: ShutdownPolicy,
    pub(crate) incarnation: u64,
}

impl<A: Actor> ActorCell<A> {
    /// The dispatch loop. Returns once the actor has terminated.
    pub(crate) async fn run(mut self) {
        let actor_type = self.actor_type;
        info!(actor_type, "Actor started");
        self.lifecycle.transition(Lifecycle::Running);

        let initialized = AssertUnwindSafe(self.actor.initialize(&self.context))
            .catch_unwind()
            .await;
        let init_result = match initialized {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic_reason(panic.as_ref())),
        };
        if let Err(reason) = &init_result {
            error!(actor_type, error = %reason, "Initialization failed");
            self.lifecycle.initialized(init_result);
            self.terminate();
            return;
        }
        self.lifecycle.initialized(init_result);

        while let Some(envelope) = self.mailbox.dequeue().await {
            if envelope.is::<Shutdown>() {
                info!(actor_type, sender = %envelope.sender(), "Shutdown requested");
                envelope.respond(Ok(Box::new(())));
                break;
            }
            self.dispatch(envelope).await;
        }

        self.drain().await;
        self.terminate();
    }

    async fn dispatch(&mut self, envelope: Envelope) {
        let (meta, message, respond_to) = envelope.into_parts();
        let name = message.message_name();
        let router = Arc::clone(&self.router);

        let Some(route) = router.match_route(message.message_type()) else {
            if message.message_type() == std::any::TypeId::of::<TimerDone>() {
                debug!(message_type = name, sender = %meta.sender, "Ignoring unrouted timer notification");
            } else {
                warn!(message_type = name, sender = %meta.sender, envelope_id = %meta.id, "No handler, dropping dead letter");
            }
            if let Some(respond_to) = respond_to {
                let _ = respond_to.send(Err(ActorError::NoHandler {
                    identity: self.identity().clone(),
                    message: name,
                }));
            }
            return;
        };

        debug!(message_type = name, sender = %meta.sender, envelope_id = %meta.id, "Handling");
        let ctx = self.context.for_envelope(meta);
        let outcome = AssertUnwindSafe(route.call(&mut self.actor, &ctx, message.into_any()))
            .catch_unwind()
            .await;

        let result: Result<BoxReply, ActorError> = match outcome {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                error!(message_type = name, error = %e, "Handler failed");
                Err(self.handler_failure(name, e.to_string()))
            }
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                error!(message_type = name, error = %reason, "Handler panicked");
                Err(self.handler_failure(name, reason))
            }
        };

        if let Some(respond_to) = respond_to {
            let _ = respond_to.send(result);
        }
    }

    /// Closes the mailbox and applies the shutdown policy to whatever is still queued.
    async fn drain(&mut self) {
        self.lifecycle.transition(Lifecycle::Draining);
        self.mailbox.close();

        let mut drained = 0usize;
        while let Some(envelope) = self.mailbox.dequeue().await {
            if envelope.is::<Shutdown>() {
                debug!("Ignoring repeated shutdown");
                envelope.respond(Ok(Box::new(())));
                continue;
            }
            match self.policy {
                ShutdownPolicy::Drain => self.dispatch(envelope).await,
                ShutdownPolicy::Drop => {
                    debug!(message_type = envelope.message_name(), envelope_id = %envelope.id(), "Dropped on shutdown");
                }
            }
            drained += 1;
        }
        info!(policy = ?self.policy, drained, "Mailbox drained");

        if let Err(panic) = AssertUnwindSafe(self.actor.stopping(&self.context))
            .catch_unwind()
            .await
        {
            error!(error = %panic_reason(panic.as_ref()), "Stopping hook panicked");
        }
    }

    /// Releases the identity and publishes `Terminated`.
    fn terminate(&mut self) {
        self.mailbox.close();
        if let Some(actlets) = self.context.actlets() {
            actlets.abort_all();
        }
        self.context
            .core()
            .remove(self.context.identity(), self.incarnation);
        self.lifecycle.transition(Lifecycle::Terminated);
        info!(actor_type = self.actor_type, "Actor terminated");
    }

    fn identity(&self) -> &Identity {
        self.context.identity()
    }

    fn handler_failure(&self, message: &'static str, reason: String) -> ActorError {
        ActorError::HandlerFailure {
            identity: self.identity().clone(),
            message,
            reason,
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(reason) = panic.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = panic.downcast_ref::<String>() {
        reason.clone()
    } else {
        "handler panicked".to_string()
    }
}
