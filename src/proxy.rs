//! # Actor Proxy
//!
//! An [`ActorProxy`] is the only handle outside code gets to an actor. It names the
//! actor and knows which [`Core`] to deliver through, but it never exposes the actor's
//! state or its mailbox.
//!
//! Proxies are cheap to clone and may outlive their actor. Once the actor has
//! terminated, `tell` and `ask` fail with `ActorNotFound`, and `wait_until_shutdown`
//! resolves immediately. A proxy stays bound to the actor it was issued for: if the
//! identity is later reused by a new actor, the old proxy still reports `ActorNotFound`.
//!
//! ```rust
//! use actor_runtime::{Actor, Context, Core, Handler, HandlerError, Message, RouterBuilder};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Greet(String);
//! impl Message for Greet {
//!     type Reply = String;
//! }
//!
//! struct Greeter;
//!
//! impl Actor for Greeter {
//!     fn routes() -> RouterBuilder<Self> {
//!         RouterBuilder::new().route::<Greet>()
//!     }
//! }
//!
//! #[async_trait]
//! impl Handler<Greet> for Greeter {
//!     async fn handle(&mut self, _ctx: &Context, message: Greet) -> Result<String, HandlerError> {
//!         Ok(format!("Hello, {}!", message.0))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let core = Core::default();
//!     let ctx = core.context();
//!     let greeter = ctx.create_actor("greeter", Greeter).unwrap();
//!
//!     let reply = greeter
//!         .ask(&ctx, Greet("World".into()), Duration::from_secs(1))
//!         .await
//!         .unwrap();
//!     assert_eq!(reply, "Hello, World!");
//!
//!     core.shutdown().await;
//!     assert!(greeter.is_shutdown());
//! }
//! ```

use crate::context::Context;
use crate::core::Core;
use crate::error::ActorError;
use crate::identity::Identity;
use crate::lifecycle::{Lifecycle, LifecycleWatch};
use crate::message::{short_type_name, Envelope, Message, Shutdown};
use std::fmt;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

#[derive(Clone)]
pub struct ActorProxy {
    identity: Identity,
    core: Core,
    lifecycle: LifecycleWatch,
    incarnation: u64,
    actor_type: &'static str,
}

impl ActorProxy {
    pub(crate) fn new(
        identity: Identity,
        core: Core,
        lifecycle: LifecycleWatch,
        incarnation: u64,
        actor_type: &'static str,
    ) -> Self {
        Self {
            identity,
            core,
            lifecycle,
            incarnation,
            actor_type,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Short type name of the actor class behind this proxy.
    pub fn actor_type(&self) -> &'static str {
        self.actor_type
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.current()
    }

    pub fn is_shutdown(&self) -> bool {
        self.lifecycle.is_terminated()
    }

    /// Enqueues `message` for the actor. Returns once it is queued, not once it is handled.
    pub async fn tell<M: Message>(&self, ctx: &Context, message: M) -> Result<(), ActorError> {
        self.tell_with_reply_to(ctx, message, None).await
    }

    /// Like [`tell`](Self::tell), naming the actor the receiver should answer to.
    pub async fn tell_with_reply_to<M: Message>(
        &self,
        ctx: &Context,
        message: M,
        reply_to: Option<Identity>,
    ) -> Result<(), ActorError> {
        debug!(receiver = %self.identity, message_type = short_type_name::<M>(), "Tell");
        let envelope = Envelope::new(ctx.identity().clone(), self.identity.clone(), message, None)
            .with_reply_to(reply_to);
        self.core.deliver(envelope, self.incarnation).await
    }

    /// Enqueues `message` and waits up to `timeout` for the handler's reply.
    ///
    /// An actor asking itself waits for a reply only it can produce and will time out.
    pub async fn ask<M: Message>(
        &self,
        ctx: &Context,
        message: M,
        timeout: Duration,
    ) -> Result<M::Reply, ActorError> {
        debug!(receiver = %self.identity, message_type = short_type_name::<M>(), "Ask");
        let (respond_to, response) = oneshot::channel();
        let envelope = Envelope::new(
            ctx.identity().clone(),
            self.identity.clone(),
            message,
            Some(respond_to),
        );

        let exchange = async {
            self.core.deliver(envelope, self.incarnation).await?;
            response
                .await
                .map_err(|_| ActorError::ReplyDropped(self.identity.clone()))?
        };
        let reply = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| ActorError::Timeout {
                identity: self.identity.clone(),
                after: timeout,
            })??;

        reply
            .downcast::<M::Reply>()
            .map(|reply| *reply)
            .map_err(|_| ActorError::HandlerFailure {
                identity: self.identity.clone(),
                message: short_type_name::<M>(),
                reason: "reply has an unexpected type".to_string(),
            })
    }

    /// [`ask`](Self::ask) with the Core's configured default timeout.
    pub async fn ask_default<M: Message>(&self, ctx: &Context, message: M) -> Result<M::Reply, ActorError> {
        let timeout = self.core.config().default_ask_timeout;
        self.ask(ctx, message, timeout).await
    }

    /// Asks the actor to drain and terminate. Does not wait for it; see
    /// [`wait_until_shutdown`](Self::wait_until_shutdown).
    pub async fn shutdown(&self, ctx: &Context) -> Result<(), ActorError> {
        self.tell(ctx, Shutdown).await
    }

    /// Resolves once the actor's `initialize` hook has completed.
    pub async fn wait_until_initialized(&self) -> Result<(), ActorError> {
        self.lifecycle.wait_until_initialized(&self.identity).await
    }

    /// Resolves once the actor has terminated. Immediately if it already has.
    pub async fn wait_until_shutdown(&self) {
        self.lifecycle.wait_until_shutdown().await
    }
}

impl fmt::Debug for ActorProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorProxy")
            .field("identity", &self.identity)
            .field("actor_type", &self.actor_type)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

impl PartialEq for ActorProxy {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.incarnation == other.incarnation
    }
}

impl Eq for ActorProxy {}
