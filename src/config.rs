//! # Runtime Configuration
//!
//! [`CoreConfig`] collects the knobs that change how every actor of a [`Core`](crate::Core)
//! behaves: mailbox capacity, what happens to queued messages on shutdown, and the
//! default `ask` timeout.
//!
//! The struct implements `serde::Deserialize`, so embedders can load it from whichever
//! format they already use. Durations are expressed in milliseconds:
//!
//! ```rust
//! use actor_runtime::{CoreConfig, MailboxCapacity, ShutdownPolicy};
//!
//! let config: CoreConfig = serde_json::from_str(
//!     r#"{ "mailbox": { "bounded": 64 }, "shutdown_policy": "drop", "default_ask_timeout": 250 }"#,
//! )
//! .unwrap();
//! assert_eq!(config.mailbox, MailboxCapacity::Bounded(64));
//! assert_eq!(config.shutdown_policy, ShutdownPolicy::Drop);
//! ```

use serde::Deserialize;
use std::time::Duration;

/// Default timeout used by [`ActorProxy::ask_default`](crate::ActorProxy::ask_default).
pub const DEFAULT_ASK_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity of each actor's mailbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailboxCapacity {
    /// `tell` never waits.
    #[default]
    Unbounded,
    /// `tell` waits for free space once `n` messages are queued.
    Bounded(usize),
}

/// What an actor does with messages still queued when it dequeues [`Shutdown`](crate::Shutdown).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Handle every message that was queued before the mailbox closed, then stop.
    #[default]
    Drain,
    /// Discard queued messages. Pending `ask`s resolve with `ReplyDropped`.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub mailbox: MailboxCapacity,
    pub shutdown_policy: ShutdownPolicy,
    #[serde(with = "millis")]
    pub default_ask_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            mailbox: MailboxCapacity::default(),
            shutdown_policy: ShutdownPolicy::default(),
            default_ask_timeout: DEFAULT_ASK_TIMEOUT,
        }
    }
}

impl CoreConfig {
    pub fn with_mailbox(mut self, mailbox: MailboxCapacity) -> Self {
        self.mailbox = mailbox;
        self
    }

    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }

    pub fn with_default_ask_timeout(mut self, timeout: Duration) -> Self {
        self.default_ask_timeout = timeout;
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
