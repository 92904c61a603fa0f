//! # Runtime Errors
//!
//! This module defines the error types surfaced by the actor runtime. By centralizing
//! error definitions, every caller of [`Core`](crate::Core), [`Context`](crate::Context)
//! and [`ActorProxy`](crate::ActorProxy) deals with a single [`ActorError`] enum.
//!
//! Only creation and proxy operations report errors to their caller. Failures that
//! happen inside an actor's dispatch loop (`NoHandler`, `HandlerFailure`) are logged
//! and isolated to that actor; they only reach a caller who is waiting on an `ask`.

use crate::identity::Identity;
use std::time::Duration;

/// Error type returned by message handlers and lifecycle hooks.
///
/// Handlers may fail with any error type; the dispatch loop only needs its `Display`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur within the actor runtime itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActorError {
    #[error("Actor already exists: {0}")]
    DuplicateIdentity(Identity),
    #[error("Actor not found: {0}")]
    ActorNotFound(Identity),
    #[error("Mailbox closed: {0}")]
    MailboxClosed(Identity),
    #[error("Mailbox full: {0}")]
    MailboxFull(Identity),
    #[error("No handler on {identity} for message {message}")]
    NoHandler {
        identity: Identity,
        message: &'static str,
    },
    #[error("Handler for {message} on {identity} failed: {reason}")]
    HandlerFailure {
        identity: Identity,
        message: &'static str,
        reason: String,
    },
    #[error("Timed out after {after:?} waiting for {identity}")]
    Timeout { identity: Identity, after: Duration },
    #[error("Actor dropped reply channel: {0}")]
    ReplyDropped(Identity),
    #[error("Invalid identity: {0:?}")]
    InvalidIdentity(String),
    #[error("Core is no longer running")]
    CoreShutdown,
    #[error("Actor {identity} failed to initialize: {reason}")]
    InitializationFailed { identity: Identity, reason: String },
    #[error("Actlet already running: {0}")]
    DuplicateActlet(String),
    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Errors raised while resolving an actor class's handler table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("Handler for {0} is already registered")]
    DuplicateHandler(&'static str),
    #[error("{0} is reserved by the runtime and cannot be routed")]
    ReservedMessage(&'static str),
}
