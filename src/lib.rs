//! # Actor Runtime
//!
//! This crate provides a cooperative actor runtime on top of Tokio: isolated units of
//! state ("actors") that communicate only by exchanging messages through their own
//! mailboxes. No actor state is ever shared, so none of it needs a lock.
//!
//! ## Architecture Overview
//!
//! 1. **Messages** ([`Message`]) - Typed, immutable values. The concrete type is the
//!    dispatch key; `Message::Reply` is what an `ask` returns.
//! 2. **Actors** ([`Actor`], [`Handler`]) - Your state plus one `Handler<M>` impl per
//!    message type, declared once in [`Actor::routes`].
//! 3. **Core** ([`Core`]) - The directory of live actors. Creates actors under
//!    hierarchical identities (`/hello-world/child`) and hands out proxies.
//! 4. **Proxies** ([`ActorProxy`]) - The only way to reach an actor: `tell`, `ask`,
//!    `wait_until_shutdown`.
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_runtime::{Actor, Context, Core, Handler, HandlerError, Message, RouterBuilder};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Append(String);
//! impl Message for Append {
//!     type Reply = ();
//! }
//!
//! #[derive(Debug)]
//! struct Entries;
//! impl Message for Entries {
//!     type Reply = Vec<String>;
//! }
//!
//! #[derive(Default)]
//! struct Journal {
//!     entries: Vec<String>,
//! }
//!
//! impl Actor for Journal {
//!     fn routes() -> RouterBuilder<Self> {
//!         RouterBuilder::new().route::<Append>().route::<Entries>()
//!     }
//! }
//!
//! #[async_trait]
//! impl Handler<Append> for Journal {
//!     async fn handle(&mut self, _ctx: &Context, message: Append) -> Result<(), HandlerError> {
//!         self.entries.push(message.0);
//!         Ok(())
//!     }
//! }
//!
//! #[async_trait]
//! impl Handler<Entries> for Journal {
//!     async fn handle(&mut self, _ctx: &Context, _message: Entries) -> Result<Vec<String>, HandlerError> {
//!         Ok(self.entries.clone())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let core = Core::default();
//!     let ctx = core.context();
//!     let journal = ctx.create_actor("journal", Journal::default()).unwrap();
//!
//!     journal.tell(&ctx, Append("first".into())).await.unwrap();
//!     journal.tell(&ctx, Append("second".into())).await.unwrap();
//!     let entries = journal.ask(&ctx, Entries, Duration::from_secs(1)).await.unwrap();
//!     assert_eq!(entries, vec!["first", "second"]);
//!
//!     journal.shutdown(&ctx).await.unwrap();
//!     journal.wait_until_shutdown().await;
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs its dispatch loop in its own Tokio task
//! - Messages are processed **sequentially** within an actor (no locks needed!)
//! - `tell`s from one sender to one actor are handled in the order they were sent
//! - The runtime works on the single-threaded scheduler as well as the multi-threaded one
//!
//! ## Failure Model
//!
//! A handler error or panic is logged and reported to an `ask` caller as
//! [`ActorError::HandlerFailure`]; the actor keeps processing. A message without a
//! handler is a dead letter: logged, dropped, actor unaffected. Only creation and proxy
//! operations return errors to their caller. There are no restart policies.
//!
//! ## Shutdown
//!
//! Sending [`Shutdown`] makes the actor close its mailbox, deal with what is still queued
//! according to [`ShutdownPolicy`], run [`Actor::stopping`], and terminate.
//! [`Core::shutdown`] does that for every live actor.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockActor`] (scripted replies) and
//! [`mock::Probe`] (records what it receives) for testing actors in isolation.

pub mod actlet;
pub mod actor;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod logging;
mod mailbox;
pub mod message;
pub mod mock;
pub mod proxy;
pub mod record;
pub mod router;

// Re-export core types for convenience
pub use actlet::TimerConfig;
pub use actor::{Actor, Handler};
pub use config::{CoreConfig, MailboxCapacity, ShutdownPolicy, DEFAULT_ASK_TIMEOUT};
pub use context::Context;
pub use crate::core::Core;
pub use error::{ActorError, HandlerError, RouterError};
pub use identity::{Identity, ROOT_IDENTITY};
pub use lifecycle::Lifecycle;
pub use message::{Envelope, EnvelopeMeta, Message, Shutdown, TimerDone};
pub use proxy::ActorProxy;
pub use record::{from_record, to_record, Record, RecordError};
pub use router::{Router, RouterBuilder};
