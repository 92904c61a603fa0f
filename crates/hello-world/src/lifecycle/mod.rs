//! # System Lifecycle & Orchestration
//!
//! [`HelloWorldSystem`] owns the [`Core`](actor_runtime::Core) and the proxy of the
//! root `/hello-world` actor. It is the process-level "conductor": it starts the actor
//! tree, exposes what `main` and the tests need, and shuts everything down.
//!
//! ## Graceful Shutdown
//!
//! 1. **Core::shutdown** - Refuses new actors and sends `Shutdown` to every live actor
//! 2. **Actors drain** - Each actor handles what was queued before its `Shutdown`
//! 3. **Children** - `/hello-world` also stops its heartbeat child in `stopping` and waits for it
//! 4. **Await completion** - `shutdown` returns once every actor has terminated

pub mod hello_world_system;

pub use actor_runtime::logging::setup_tracing;
pub use hello_world_system::*;
