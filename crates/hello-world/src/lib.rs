//! # Hello World App Library
//!
//! The demo's actors and its system orchestration, exposed for integration testing.

pub mod heartbeat_actor;
pub mod hello_world_actor;
pub mod lifecycle;
