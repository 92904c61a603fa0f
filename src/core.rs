//! # Core
//!
//! The [`Core`] is the actor directory of one runtime instance: it maps every live
//! [`Identity`] to the running actor's mailbox and lifecycle, creates actors, hands out
//! proxies and shuts everything down.
//!
//! There is no global Core. Build one with [`Core::new`], clone it freely (it is an
//! `Arc` inside), and pass it where it is needed; every [`Context`] carries it too.
//!
//! **Registry discipline**:
//! The registry is the only structure several tasks touch. It sits behind a
//! `parking_lot::Mutex` that is held only for map lookups and updates, never across an
//! `.await`. Entries carry an incarnation number, so a terminating actor can only ever
//! remove its own entry, never a newer actor that reused the identity.

use crate::actlet::Actlets;
use crate::actor::{Actor, ActorCell};
use crate::config::CoreConfig;
use crate::context::Context;
use crate::error::ActorError;
use crate::identity::Identity;
use crate::lifecycle::{self, LifecycleWatch};
use crate::mailbox::{mailbox, MailboxSender};
use crate::message::{short_type_name, Envelope, Shutdown};
use crate::proxy::ActorProxy;
use crate::router::Router;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, Instrument};

#[derive(Clone)]
struct ActorEntry {
    mailbox: MailboxSender,
    lifecycle: LifecycleWatch,
    incarnation: u64,
    actor_type: &'static str,
}

struct Registry {
    running: bool,
    actors: HashMap<Identity, ActorEntry>,
}

struct CoreInner {
    config: CoreConfig,
    registry: Mutex<Registry>,
    routers: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    next_incarnation: AtomicU64,
}

/// Handle to an actor runtime instance.
#[derive(Clone)]
pub struct Core {
    inner: Arc<CoreInner>,
}

impl Default for Core {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl Core {
    pub fn new(config: CoreConfig) -> Self {
        Self {
            inner: Arc::new(CoreInner {
                config,
                registry: Mutex::new(Registry {
                    running: true,
                    actors: HashMap::new(),
                }),
                routers: Mutex::new(HashMap::new()),
                next_incarnation: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    /// The root context (identity `/`). Actors created from it live directly under `/`.
    pub fn context(&self) -> Context {
        Context::root(self.clone())
    }

    /// Starts `actor` under `ctx.identity()/suffix` and returns a proxy to it.
    ///
    /// Must be called from within a Tokio runtime: the actor's dispatch loop is spawned
    /// as its own task.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentity` if `suffix` is not a valid relative path.
    /// - `DuplicateIdentity` if an actor is already live at the computed identity.
    /// - `CoreShutdown` once [`shutdown`](Self::shutdown) has been called.
    /// - `Router` if the actor class declares an invalid route table.
    pub fn create_actor<A: Actor>(
        &self,
        ctx: &Context,
        suffix: &str,
        actor: A,
    ) -> Result<ActorProxy, ActorError> {
        let identity = ctx.identity().child(suffix)?;
        let router = self.router::<A>()?;
        let actor_type = short_type_name::<A>();

        let (sender, receiver) = mailbox(self.inner.config.mailbox);
        let (publisher, watch) = lifecycle::channel();
        let incarnation = self.inner.next_incarnation.fetch_add(1, Ordering::Relaxed);

        {
            let mut registry = self.inner.registry.lock();
            if !registry.running {
                return Err(ActorError::CoreShutdown);
            }
            if registry.actors.contains_key(&identity) {
                return Err(ActorError::DuplicateIdentity(identity));
            }
            registry.actors.insert(
                identity.clone(),
                ActorEntry {
                    mailbox: sender.clone(),
                    lifecycle: watch.clone(),
                    incarnation,
                    actor_type,
                },
            );
        }

        let span = tracing::info_span!(parent: None, "actor", identity = %identity);
        let actlets = Arc::new(Actlets::new(identity.clone(), sender));
        let cell = ActorCell {
            actor,
            actor_type,
            router,
            mailbox: receiver,
            context: Context::for_actor(self.clone(), span.clone(), actlets),
            lifecycle: publisher,
            policy: self.inner.config.shutdown_policy,
            incarnation,
        };
        tokio::spawn(cell.run().instrument(span));

        debug!(%identity, actor_type, incarnation, "Actor created");
        Ok(ActorProxy::new(
            identity,
            self.clone(),
            watch,
            incarnation,
            actor_type,
        ))
    }

    /// Proxy for the live actor named `suffix` under `ctx`'s identity.
    pub fn get_proxy(&self, ctx: &Context, suffix: &str) -> Result<ActorProxy, ActorError> {
        let identity = ctx.identity().child(suffix)?;
        self.proxy(&identity)
    }

    /// Proxy for the live actor at `identity`.
    pub fn proxy(&self, identity: &Identity) -> Result<ActorProxy, ActorError> {
        let entry = self
            .lookup(identity)
            .ok_or_else(|| ActorError::ActorNotFound(identity.clone()))?;
        Ok(ActorProxy::new(
            identity.clone(),
            self.clone(),
            entry.lifecycle,
            entry.incarnation,
            entry.actor_type,
        ))
    }

    /// Whether the route table of actor class `A` has been resolved.
    pub fn is_actor_type_registered<A: Actor>(&self) -> bool {
        self.inner.routers.lock().contains_key(&TypeId::of::<A>())
    }

    /// Identities of every live actor, sorted.
    pub fn actors(&self) -> Vec<Identity> {
        let mut actors: Vec<_> = self.inner.registry.lock().actors.keys().cloned().collect();
        actors.sort();
        actors
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.inner.registry.lock().actors.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.inner.registry.lock().actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.lock().actors.is_empty()
    }

    /// Whether new actors can still be created.
    pub fn is_running(&self) -> bool {
        self.inner.registry.lock().running
    }

    /// Refuses further creation, sends `Shutdown` to every live actor and waits for all
    /// of them to terminate. Safe to call more than once.
    pub async fn shutdown(&self) {
        let live: Vec<(Identity, ActorEntry)> = {
            let mut registry = self.inner.registry.lock();
            registry.running = false;
            registry
                .actors
                .iter()
                .map(|(identity, entry)| (identity.clone(), entry.clone()))
                .collect()
        };
        info!(actors = live.len(), "Core shutting down");

        let root = Identity::root();
        for (identity, entry) in &live {
            if entry.mailbox.is_closed() {
                debug!(%identity, "Already draining");
                continue;
            }
            let envelope = Envelope::new(root.clone(), identity.clone(), Shutdown, None);
            if entry.mailbox.enqueue(envelope).await.is_err() {
                debug!(%identity, "Already draining");
            }
        }

        futures::future::join_all(
            live.iter()
                .map(|(_, entry)| entry.lifecycle.wait_until_shutdown()),
        )
        .await;
        info!("Core shut down");
    }

    /// Enqueues `envelope` to the receiver's mailbox, provided the receiver is still the
    /// incarnation the caller resolved.
    pub(crate) async fn deliver(&self, envelope: Envelope, incarnation: u64) -> Result<(), ActorError> {
        let identity = envelope.receiver().clone();
        let entry = self
            .lookup(&identity)
            .filter(|entry| entry.incarnation == incarnation)
            .ok_or_else(|| ActorError::ActorNotFound(identity.clone()))?;
        entry
            .mailbox
            .enqueue(envelope)
            .await
            .map_err(|_| ActorError::MailboxClosed(identity))
    }

    /// Removes the registry entry of a terminating actor. A no-op if the entry belongs to
    /// another incarnation or is already gone.
    pub(crate) fn remove(&self, identity: &Identity, incarnation: u64) {
        let mut registry = self.inner.registry.lock();
        if registry
            .actors
            .get(identity)
            .is_some_and(|entry| entry.incarnation == incarnation)
        {
            registry.actors.remove(identity);
        }
    }

    fn lookup(&self, identity: &Identity) -> Option<ActorEntry> {
        self.inner.registry.lock().actors.get(identity).cloned()
    }

    /// The shared route table of actor class `A`, built on first use.
    fn router<A: Actor>(&self) -> Result<Arc<Router<A>>, ActorError> {
        let mut routers = self.inner.routers.lock();
        if let Some(router) = routers.get(&TypeId::of::<A>()) {
            if let Ok(router) = Arc::clone(router).downcast::<Router<A>>() {
                return Ok(router);
            }
        }
        let router = Arc::new(A::routes().build()?);
        debug!(
            actor_type = short_type_name::<A>(),
            messages = ?router.message_names(),
            "Route table resolved"
        );
        routers.insert(TypeId::of::<A>(), router.clone());
        Ok(router)
    }
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("config", &self.inner.config)
            .field("actors", &self.actors())
            .finish()
    }
}
