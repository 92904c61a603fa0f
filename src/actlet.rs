//! # Actlets & Timers
//!
//! An actlet is a named side task owned by an actor. It runs concurrently with the
//! actor's dispatch loop but never touches actor state: everything it produces comes
//! back to the owner as an ordinary message, so the owner's handlers still run one at
//! a time.
//!
//! Timers are actlets that tell a message to their owner on a fixed interval. A timer
//! with a finite number of repetitions finishes with a [`TimerDone`] message.
//!
//! Actlets are identified by `{owner}/actlet/{name}` (timers by
//! `{owner}/actlet/timer/{name}`); that identity is the sender of every message they
//! deliver. All actlets of an actor are aborted when the actor terminates.

use crate::error::ActorError;
use crate::identity::Identity;
use crate::mailbox::MailboxSender;
use crate::message::{Envelope, Message, TimerDone};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};

const TIMER_PREFIX: &str = "timer/";

/// Schedule of a timer.
///
/// ```rust
/// use actor_runtime::TimerConfig;
/// use std::time::Duration;
///
/// // Three ticks, the first one immediately.
/// let config = TimerConfig::every(Duration::from_millis(100))
///     .starting_now()
///     .with_repetitions(3);
/// assert_eq!(config.repetitions, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Time between two messages.
    pub interval: Duration,
    /// Time to wait before the timer starts.
    pub delay: Duration,
    /// Send one message as soon as the timer starts, before the first interval.
    pub now: bool,
    /// How many messages to send in total. `0` means forever.
    pub repetitions: u32,
}

impl TimerConfig {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            delay: Duration::ZERO,
            now: false,
            repetitions: 0,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn starting_now(mut self) -> Self {
        self.now = true;
        self
    }

    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }
}

pub(crate) fn timer_name(name: &str) -> String {
    format!("{TIMER_PREFIX}{name}")
}

/// What a running actlet uses to reach its owner.
pub(crate) struct ActletLink {
    sender: Identity,
    owner: Identity,
    mailbox: MailboxSender,
}

impl ActletLink {
    /// Enqueues `message` to the owner. `false` once the owner stopped accepting messages.
    pub(crate) async fn tell<M: Message>(&self, message: M) -> bool {
        let envelope = Envelope::new(self.sender.clone(), self.owner.clone(), message, None);
        match self.mailbox.enqueue(envelope).await {
            Ok(()) => true,
            Err(envelope) => {
                debug!(message_type = envelope.message_name(), "Owner is gone, dropping actlet message");
                false
            }
        }
    }
}

/// Actlets owned by one actor.
pub(crate) struct Actlets {
    owner: Identity,
    mailbox: MailboxSender,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Actlets {
    pub(crate) fn new(owner: Identity, mailbox: MailboxSender) -> Self {
        Self {
            owner,
            mailbox,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn owner(&self) -> &Identity {
        &self.owner
    }

    pub(crate) fn mailbox(&self) -> &MailboxSender {
        &self.mailbox
    }

    /// Spawns `body` as the actlet `name`.
    pub(crate) fn spawn<F, Fut>(&self, name: &str, body: F) -> Result<(), ActorError>
    where
        F: FnOnce(ActletLink) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let sender = self.owner.child(&format!("actlet/{name}"))?;

        let mut tasks = self.tasks.lock();
        tasks.retain(|_, task| !task.is_finished());
        if tasks.contains_key(name) {
            return Err(ActorError::DuplicateActlet(sender.to_string()));
        }

        let span = tracing::info_span!(parent: None, "actlet", identity = %sender);
        let link = ActletLink {
            sender,
            owner: self.owner.clone(),
            mailbox: self.mailbox.clone(),
        };
        let task = tokio::spawn(body(link).instrument(span));
        tasks.insert(name.to_string(), task);
        Ok(())
    }

    /// Spawns an actlet whose output is delivered to the owner as a message.
    pub(crate) fn spawn_future<Fut, M>(&self, name: &str, future: Fut) -> Result<(), ActorError>
    where
        Fut: Future<Output = M> + Send + 'static,
        M: Message,
    {
        self.spawn(name, |link| async move {
            let message = future.await;
            link.tell(message).await;
        })
    }

    pub(crate) fn spawn_timer<M>(&self, name: &str, message: M, config: TimerConfig) -> Result<(), ActorError>
    where
        M: Message + Clone,
    {
        let done = TimerDone {
            name: name.to_string(),
        };
        self.spawn(&timer_name(name), move |link| run_timer(link, message, config, done))
    }

    /// Aborts the actlet `name`. Returns whether it was still running.
    pub(crate) fn cancel(&self, name: &str) -> bool {
        match self.tasks.lock().remove(name) {
            Some(task) => {
                let running = !task.is_finished();
                task.abort();
                running
            }
            None => false,
        }
    }

    pub(crate) fn is_running(&self, name: &str) -> bool {
        self.tasks
            .lock()
            .get(name)
            .is_some_and(|task| !task.is_finished())
    }

    pub(crate) fn abort_all(&self) {
        let tasks: Vec<_> = self.tasks.lock().drain().collect();
        for (name, task) in tasks {
            if !task.is_finished() {
                debug!(actlet = %name, "Aborting actlet");
            }
            task.abort();
        }
    }
}

async fn run_timer<M>(link: ActletLink, message: M, config: TimerConfig, done: TimerDone)
where
    M: Message + Clone,
{
    if !config.delay.is_zero() {
        tokio::time::sleep(config.delay).await;
    }

    // Repetitions count messages sent, including the immediate one.
    let mut remaining = (config.repetitions > 0).then_some(config.repetitions);
    if config.now {
        if !link.tell(message.clone()).await {
            return;
        }
        if let Some(count) = remaining.as_mut() {
            *count -= 1;
        }
    }

    while remaining != Some(0) {
        tokio::time::sleep(config.interval).await;
        if !link.tell(message.clone()).await {
            return;
        }
        if let Some(count) = remaining.as_mut() {
            *count -= 1;
        }
    }

    debug!(timer = %done.name, "Timer completed");
    link.tell(done).await;
}
