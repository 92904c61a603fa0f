//! # Mailbox
//!
//! An actor's mailbox is a FIFO queue with many producers and exactly one consumer:
//! the actor's own dispatch loop. That single-consumer property is what lets the
//! loop mutate actor state without any locking.
//!
//! The mailbox is private to the runtime. Callers only ever reach it through an
//! [`ActorProxy`](crate::ActorProxy) or a [`Context`](crate::Context).

use crate::config::MailboxCapacity;
use crate::message::Envelope;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Why a non-blocking enqueue was refused. The envelope is handed back.
pub(crate) enum TryEnqueueError {
    Full(Envelope),
    Closed(Envelope),
}

/// Producer half of a mailbox. Cloned into the Core registry and every sender.
#[derive(Clone)]
pub(crate) enum MailboxSender {
    Bounded(mpsc::Sender<Envelope>),
    Unbounded(mpsc::UnboundedSender<Envelope>),
}

/// Consumer half of a mailbox, owned by the dispatch loop.
pub(crate) enum MailboxReceiver {
    Bounded(mpsc::Receiver<Envelope>),
    Unbounded(mpsc::UnboundedReceiver<Envelope>),
}

pub(crate) fn mailbox(capacity: MailboxCapacity) -> (MailboxSender, MailboxReceiver) {
    match capacity {
        MailboxCapacity::Unbounded => {
            let (sender, receiver) = mpsc::unbounded_channel();
            (
                MailboxSender::Unbounded(sender),
                MailboxReceiver::Unbounded(receiver),
            )
        }
        MailboxCapacity::Bounded(size) => {
            let (sender, receiver) = mpsc::channel(size.max(1));
            (
                MailboxSender::Bounded(sender),
                MailboxReceiver::Bounded(receiver),
            )
        }
    }
}

impl MailboxSender {
    /// Appends to the tail. A bounded mailbox waits for free space.
    ///
    /// Fails (returning the envelope) once the consumer has closed the mailbox.
    pub(crate) async fn enqueue(&self, envelope: Envelope) -> Result<(), Envelope> {
        match self {
            Self::Bounded(sender) => sender.send(envelope).await.map_err(|e| e.0),
            Self::Unbounded(sender) => sender.send(envelope).map_err(|e| e.0),
        }
    }

    /// Appends without waiting. Used by actors writing to their own mailbox, where
    /// waiting for space would deadlock the only consumer.
    pub(crate) fn try_enqueue(&self, envelope: Envelope) -> Result<(), TryEnqueueError> {
        match self {
            Self::Bounded(sender) => sender.try_send(envelope).map_err(|e| match e {
                TrySendError::Full(envelope) => TryEnqueueError::Full(envelope),
                TrySendError::Closed(envelope) => TryEnqueueError::Closed(envelope),
            }),
            Self::Unbounded(sender) => sender
                .send(envelope)
                .map_err(|e| TryEnqueueError::Closed(e.0)),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        match self {
            Self::Bounded(sender) => sender.is_closed(),
            Self::Unbounded(sender) => sender.is_closed(),
        }
    }
}

impl MailboxReceiver {
    /// Waits for the next envelope. `None` once the mailbox is closed and drained.
    pub(crate) async fn dequeue(&mut self) -> Option<Envelope> {
        match self {
            Self::Bounded(receiver) => receiver.recv().await,
            Self::Unbounded(receiver) => receiver.recv().await,
        }
    }

    /// Refuses further envelopes; already queued ones can still be dequeued.
    pub(crate) fn close(&mut self) {
        match self {
            Self::Bounded(receiver) => receiver.close(),
            Self::Unbounded(receiver) => receiver.close(),
        }
    }
}
