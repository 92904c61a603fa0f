//! # Messages & Envelopes
//!
//! A [`Message`] is an immutable value and the only thing actors exchange. Its concrete
//! Rust type is the dispatch key: the router looks up the handler by `TypeId`, so two
//! different message types can never be confused with each other.
//!
//! Messages are *moved* into a mailbox. Once enqueued, the sender no longer owns the
//! value, and the receiving actor gets exclusive ownership when its handler runs.
//!
//! Every enqueued message travels inside an [`Envelope`] that records who sent it, who
//! it is for, and (for `ask`) where the reply should go.

use crate::error::ActorError;
use crate::identity::Identity;
use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use tokio::sync::oneshot;
use uuid::Uuid;

/// A typed unit of communication between actors.
///
/// `Reply` is what an [`ask`](crate::ActorProxy::ask) for this message returns. Use `()`
/// for messages that are only ever sent with `tell`.
///
/// ```rust
/// use actor_runtime::Message;
///
/// #[derive(Debug)]
/// struct SlowDown {
///     times: u32,
/// }
///
/// impl Message for SlowDown {
///     type Reply = ();
/// }
/// ```
pub trait Message: Send + Debug + 'static {
    type Reply: Send + 'static;
}

/// Reserved message that asks an actor to drain and terminate.
///
/// The dispatch loop recognises it before handler lookup; it cannot be routed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shutdown;

impl Message for Shutdown {
    type Reply = ();
}

/// Sent to an actor when one of its finite timers has delivered every repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDone {
    pub name: String,
}

impl Message for TimerDone {
    type Reply = ();
}

/// Short, human readable type name (e.g. `Shutdown` instead of `actor_runtime::message::Shutdown`).
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

pub(crate) type BoxReply = Box<dyn Any + Send>;
pub(crate) type ReplySender = oneshot::Sender<Result<BoxReply, ActorError>>;

/// Object-safe view of a [`Message`], used once the concrete type has been erased.
pub(crate) trait AnyMessage: Send + Debug {
    fn message_type(&self) -> TypeId;
    fn message_name(&self) -> &'static str;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<M: Message> AnyMessage for M {
    fn message_type(&self) -> TypeId {
        TypeId::of::<M>()
    }

    fn message_name(&self) -> &'static str {
        short_type_name::<M>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Delivery metadata of an envelope, visible to handlers through their context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeMeta {
    pub id: Uuid,
    pub sender: Identity,
    pub receiver: Identity,
    pub reply_to: Option<Identity>,
}

/// A message in transit, together with its delivery metadata.
pub struct Envelope {
    meta: EnvelopeMeta,
    message: Box<dyn AnyMessage>,
    respond_to: Option<ReplySender>,
}

impl Envelope {
    pub(crate) fn new<M: Message>(
        sender: Identity,
        receiver: Identity,
        message: M,
        respond_to: Option<ReplySender>,
    ) -> Self {
        Self {
            meta: EnvelopeMeta {
                id: Uuid::new_v4(),
                sender,
                receiver,
                reply_to: None,
            },
            message: Box::new(message),
            respond_to,
        }
    }

    pub(crate) fn with_reply_to(mut self, reply_to: Option<Identity>) -> Self {
        self.meta.reply_to = reply_to;
        self
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn sender(&self) -> &Identity {
        &self.meta.sender
    }

    pub fn receiver(&self) -> &Identity {
        &self.meta.receiver
    }

    pub fn reply_to(&self) -> Option<&Identity> {
        self.meta.reply_to.as_ref()
    }

    pub fn message_name(&self) -> &'static str {
        self.message.message_name()
    }

    pub fn is<M: Message>(&self) -> bool {
        self.message.message_type() == TypeId::of::<M>()
    }

    /// Answers a waiting `ask`, if there is one.
    pub(crate) fn respond(self, result: Result<BoxReply, ActorError>) {
        if let Some(respond_to) = self.respond_to {
            let _ = respond_to.send(result);
        }
    }

    pub(crate) fn into_parts(self) -> (EnvelopeMeta, Box<dyn AnyMessage>, Option<ReplySender>) {
        (self.meta, self.message, self.respond_to)
    }
}

impl Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("id", &self.meta.id)
            .field("sender", &self.meta.sender)
            .field("receiver", &self.meta.receiver)
            .field("reply_to", &self.meta.reply_to)
            .field("message", &self.message)
            .field("ask", &self.respond_to.is_some())
            .finish()
    }
}
