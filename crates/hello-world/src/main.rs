//! # Hello World
//!
//! Runs the `/hello-world` actor until it stops on its own, Ctrl-C is pressed, or the
//! run time (first argument, in seconds, default 10) elapses.
//!
//! ```bash
//! RUST_LOG=info cargo run -p hello-world -- 5
//! ```

use actor_runtime::CoreConfig;
use hello_world::hello_world_actor::HelloWorld;
use hello_world::lifecycle::{setup_tracing, HelloWorldSystem};
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let run_for = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u64>().map_err(|e| format!("invalid run time {arg:?}: {e}")))
        .transpose()?
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(10));

    info!(?run_for, "Starting hello world");
    let system = HelloWorldSystem::start(CoreConfig::default(), HelloWorld::default())
        .await
        .map_err(|e| e.to_string())?;

    // Change the pace while the greeting loop is running.
    system.slow_down(2).await.map_err(|e| e.to_string())?;
    system.speed_up(4).await.map_err(|e| e.to_string())?;

    tokio::select! {
        _ = system.hello_world.wait_until_shutdown() => info!("hello-world stopped on its own"),
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        _ = tokio::time::sleep(run_for) => info!("Run time elapsed"),
    }

    match system.greetings(Duration::from_secs(5)).await {
        Ok(count) => info!(count, "Greetings so far"),
        Err(e) => error!(error = %e, "Could not read greeting count"),
    }

    // Shutdown system gracefully
    system.shutdown().await;

    info!("Application completed successfully");
    Ok(())
}
