//! # Handler Registry
//!
//! A [`Router`] maps a message's concrete type to the [`Handler`] an actor class
//! implements for it. Each actor class declares its routes once, in
//! [`Actor::routes`]; the [`Core`](crate::Core) resolves that declaration the first time
//! the class is instantiated and shares the resulting immutable router with every
//! instance of the class.
//!
//! Routing the same message type twice, or routing the reserved [`Shutdown`] message,
//! is rejected when the router is built.

use crate::actor::{Actor, Handler};
use crate::context::Context;
use crate::error::{HandlerError, RouterError};
use crate::message::{short_type_name, BoxReply, Message, Shutdown};
use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Type-erased call into `Handler<M>::handle` for one actor class.
#[async_trait]
pub(crate) trait Route<A>: Send + Sync {
    async fn call(
        &self,
        actor: &mut A,
        ctx: &Context,
        message: Box<dyn Any + Send>,
    ) -> Result<BoxReply, HandlerError>;
}

struct TypedRoute<M>(PhantomData<fn() -> M>);

#[async_trait]
impl<A, M> Route<A> for TypedRoute<M>
where
    A: Handler<M>,
    M: Message,
{
    async fn call(
        &self,
        actor: &mut A,
        ctx: &Context,
        message: Box<dyn Any + Send>,
    ) -> Result<BoxReply, HandlerError> {
        let message = message.downcast::<M>().map_err(|_| -> HandlerError {
            format!("route for {} received another message type", short_type_name::<M>()).into()
        })?;
        let reply = actor.handle(ctx, *message).await?;
        Ok(Box::new(reply))
    }
}

struct RouteEntry<A> {
    name: &'static str,
    route: Box<dyn Route<A>>,
}

/// Immutable message-type → handler table of one actor class.
pub struct Router<A> {
    routes: HashMap<TypeId, RouteEntry<A>>,
}

impl<A: Actor> Router<A> {
    pub fn builder() -> RouterBuilder<A> {
        RouterBuilder::new()
    }

    pub(crate) fn match_route(&self, message_type: TypeId) -> Option<&dyn Route<A>> {
        self.routes.get(&message_type).map(|entry| entry.route.as_ref())
    }

    pub fn handles<M: Message>(&self) -> bool {
        self.routes.contains_key(&TypeId::of::<M>())
    }

    pub fn handles_name(&self, name: &str) -> bool {
        self.routes.values().any(|entry| entry.name == name)
    }

    /// Names of every routed message type, sorted.
    pub fn message_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.routes.values().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects routes for an actor class.
///
/// The first invalid route is remembered and reported by [`build`](Self::build), so
/// route declarations can be chained without intermediate `?`.
pub struct RouterBuilder<A> {
    routes: HashMap<TypeId, RouteEntry<A>>,
    error: Option<RouterError>,
}

impl<A: Actor> Default for RouterBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Actor> RouterBuilder<A> {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            error: None,
        }
    }

    /// Routes messages of type `M` to `A`'s `Handler<M>` implementation.
    pub fn route<M: Message>(mut self) -> Self
    where
        A: Handler<M>,
    {
        if self.error.is_some() {
            return self;
        }
        let name = short_type_name::<M>();
        if TypeId::of::<M>() == TypeId::of::<Shutdown>() {
            self.error = Some(RouterError::ReservedMessage(name));
            return self;
        }
        match self.routes.entry(TypeId::of::<M>()) {
            Entry::Occupied(_) => self.error = Some(RouterError::DuplicateHandler(name)),
            Entry::Vacant(slot) => {
                slot.insert(RouteEntry {
                    name,
                    route: Box::new(TypedRoute::<M>(PhantomData)),
                });
            }
        }
        self
    }

    pub fn build(self) -> Result<Router<A>, RouterError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(Router {
                routes: self.routes,
            }),
        }
    }
}
