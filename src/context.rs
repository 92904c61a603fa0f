//! # Context
//!
//! A [`Context`] is the capability object every handler receives. It answers "who am
//! I" (the actor's identity), "who sent this" (the current envelope), and gives access
//! to the [`Core`] for creating children and looking up other actors.
//!
//! The dispatch loop builds a fresh context for every handler invocation; the only state
//! it carries besides the envelope metadata is shared with the owning actor (its identity,
//! its `tracing` span and its actlets). The root context returned by
//! [`Core::context`] has identity `/` and no mailbox of its own.

use crate::actlet::{timer_name, Actlets, TimerConfig};
use crate::actor::Actor;
use crate::core::Core;
use crate::error::ActorError;
use crate::identity::Identity;
use crate::mailbox::TryEnqueueError;
use crate::message::{Envelope, EnvelopeMeta, Message};
use crate::proxy::ActorProxy;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::Span;
use uuid::Uuid;

#[derive(Clone)]
pub struct Context {
    core: Core,
    identity: Identity,
    span: Span,
    actlets: Option<Arc<Actlets>>,
    envelope: Option<EnvelopeMeta>,
}

impl Context {
    pub(crate) fn root(core: Core) -> Self {
        let identity = Identity::root();
        Self {
            core,
            span: tracing::info_span!(parent: None, "core", identity = %identity),
            identity,
            actlets: None,
            envelope: None,
        }
    }

    pub(crate) fn for_actor(core: Core, span: Span, actlets: Arc<Actlets>) -> Self {
        Self {
            core,
            identity: actlets.owner().clone(),
            span,
            actlets: Some(actlets),
            envelope: None,
        }
    }

    /// The context handed to the handler of one envelope.
    pub(crate) fn for_envelope(&self, meta: EnvelopeMeta) -> Self {
        Self {
            envelope: Some(meta),
            ..self.clone()
        }
    }

    pub(crate) fn actlets(&self) -> Option<&Arc<Actlets>> {
        self.actlets.as_ref()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Sender of the message being handled.
    pub fn sender(&self) -> Option<&Identity> {
        self.envelope.as_ref().map(|meta| &meta.sender)
    }

    pub fn reply_to(&self) -> Option<&Identity> {
        self.envelope.as_ref().and_then(|meta| meta.reply_to.as_ref())
    }

    pub fn envelope_id(&self) -> Option<Uuid> {
        self.envelope.as_ref().map(|meta| meta.id)
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    /// Span bound to this context's identity. Handler futures already run inside it.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Creates an actor named `suffix` under this context's identity.
    pub fn create_actor<A: Actor>(&self, suffix: &str, actor: A) -> Result<ActorProxy, ActorError> {
        self.core.create_actor(self, suffix, actor)
    }

    /// Proxy for the live actor named `suffix` under this context's identity.
    pub fn get_proxy(&self, suffix: &str) -> Result<ActorProxy, ActorError> {
        self.core.get_proxy(self, suffix)
    }

    /// Proxy for the live actor at an absolute identity.
    pub fn proxy(&self, identity: &Identity) -> Result<ActorProxy, ActorError> {
        self.core.proxy(identity)
    }

    /// Enqueues `message` to this actor's own mailbox without waiting.
    ///
    /// A bounded mailbox with no free slot fails with `MailboxFull` rather than waiting
    /// for the only consumer, which is the caller itself.
    pub fn tell_me<M: Message>(&self, message: M) -> Result<(), ActorError> {
        let actlets = self.owned_actlets()?;
        let envelope = Envelope::new(self.identity.clone(), self.identity.clone(), message, None);
        actlets.mailbox().try_enqueue(envelope).map_err(|e| match e {
            TryEnqueueError::Full(_) => ActorError::MailboxFull(self.identity.clone()),
            TryEnqueueError::Closed(_) => ActorError::MailboxClosed(self.identity.clone()),
        })
    }

    /// Runs `future` next to this actor; its output is told to the actor when it completes.
    pub fn create_actlet<F, M>(&self, name: &str, future: F) -> Result<(), ActorError>
    where
        F: Future<Output = M> + Send + 'static,
        M: Message,
    {
        self.owned_actlets()?.spawn_future(name, future)
    }

    /// Aborts the actlet `name`. Returns whether it was still running.
    pub fn cancel_actlet(&self, name: &str) -> bool {
        self.actlets.as_ref().is_some_and(|actlets| actlets.cancel(name))
    }

    pub fn is_actlet_running(&self, name: &str) -> bool {
        self.actlets
            .as_ref()
            .is_some_and(|actlets| actlets.is_running(name))
    }

    /// Tells `message` to this actor on the schedule in `config`.
    pub fn create_timer<M>(&self, name: &str, message: M, config: TimerConfig) -> Result<(), ActorError>
    where
        M: Message + Clone,
    {
        self.owned_actlets()?.spawn_timer(name, message, config)
    }

    pub fn cancel_timer(&self, name: &str) -> bool {
        self.cancel_actlet(&timer_name(name))
    }

    pub fn is_timer_running(&self, name: &str) -> bool {
        self.is_actlet_running(&timer_name(name))
    }

    fn owned_actlets(&self) -> Result<&Arc<Actlets>, ActorError> {
        self.actlets
            .as_ref()
            .ok_or_else(|| ActorError::ActorNotFound(self.identity.clone()))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("identity", &self.identity)
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}
