//! # Observability & Tracing
//!
//! The runtime logs through `tracing` and never installs a subscriber on its own.
//! [`setup_tracing`] is the subscriber the demo binary and most embedders want.
//!
//! Every actor runs inside an `actor` span carrying its `identity`, so events emitted by
//! handlers are attributed to the actor without passing a logger around. Actlets get an
//! `actlet` span the same way.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle** (`info`): actor started, shutdown requested, mailbox drained,
//!   actor terminated, Core shutdown.
//! - **Dispatch** (`debug`): every handled message with `message_type`, `sender` and
//!   `envelope_id`; tells and asks on the proxy side.
//! - **Dead letters** (`warn`): messages without a handler.
//! - **Failures** (`error`): handler errors and panics, failed initialization.
//!
//! ## Usage
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run -p hello-world
//!
//! # Every message
//! RUST_LOG=debug cargo run -p hello-world
//!
//! # Runtime internals only
//! RUST_LOG=actor_runtime=debug cargo run -p hello-world
//! ```
//!
//! With `RUST_LOG=info` the compact format shows the span inline:
//!
//! ```text
//! INFO actor{identity=/hello-world}: Actor started actor_type="HelloWorld"
//! INFO actor{identity=/hello-world}: Hello, World! 1
//! ```

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already set; use [`try_setup_tracing`] where that
/// can happen (tests).
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], returning `false` instead of panicking when a subscriber is
/// already installed.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init()
        .is_ok()
}
