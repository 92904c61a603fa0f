//! # Hello World Actor
//!
//! Logs `Hello, World! {count}` in a loop driven by messages to itself: each [`Log`]
//! handler logs one line, tells itself the next `Log` and then pauses. [`SlowDown`] and
//! [`SpeedUp`] change the pause while the loop is running, which works because they
//! queue up between two `Log` messages in the same mailbox.
//!
//! On initialization the actor creates a [`Heartbeat`] child at
//! `/hello-world/heartbeat`, and it shuts that child down when it stops.

pub mod messages;

pub use messages::*;

use crate::heartbeat_actor::Heartbeat;
use actor_runtime::{Actor, Context, Handler, HandlerError, RouterBuilder};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const HEARTBEAT: &str = "heartbeat";

pub struct HelloWorld {
    pause: Duration,
    count: u64,
    heartbeat_interval: Duration,
}

impl HelloWorld {
    pub fn new(pause: Duration, heartbeat_interval: Duration) -> Self {
        Self {
            pause,
            count: 0,
            heartbeat_interval,
        }
    }
}

impl Default for HelloWorld {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(5))
    }
}

#[async_trait]
impl Actor for HelloWorld {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new()
            .route::<Prepare>()
            .route::<Log>()
            .route::<SlowDown>()
            .route::<SpeedUp>()
            .route::<GetCount>()
            .route::<GetPause>()
    }

    async fn initialize(&mut self, ctx: &Context) -> Result<(), HandlerError> {
        ctx.create_actor(HEARTBEAT, Heartbeat::new(self.heartbeat_interval))?;
        ctx.tell_me(Prepare)?;
        Ok(())
    }

    async fn stopping(&mut self, ctx: &Context) {
        info!(count = self.count, "Said hello");
        if let Ok(heartbeat) = ctx.get_proxy(HEARTBEAT) {
            if let Err(e) = heartbeat.shutdown(ctx).await {
                warn!(error = %e, "Heartbeat already stopping");
            }
            heartbeat.wait_until_shutdown().await;
        }
    }
}

#[async_trait]
impl Handler<Prepare> for HelloWorld {
    async fn handle(&mut self, ctx: &Context, _message: Prepare) -> Result<(), HandlerError> {
        info!("Handling Prepare");
        ctx.tell_me(Log)?;
        Ok(())
    }
}

#[async_trait]
impl Handler<Log> for HelloWorld {
    async fn handle(&mut self, ctx: &Context, _message: Log) -> Result<(), HandlerError> {
        self.count += 1;
        info!("Hello, World! {}", self.count);
        // Fails once shutdown closed the mailbox, which ends the loop.
        if let Err(e) = ctx.tell_me(Log) {
            debug!(error = %e, "Not scheduling another greeting");
        }
        tokio::time::sleep(self.pause).await;
        Ok(())
    }
}

#[async_trait]
impl Handler<SlowDown> for HelloWorld {
    async fn handle(&mut self, _ctx: &Context, message: SlowDown) -> Result<(), HandlerError> {
        self.pause *= message.times;
        info!(times = message.times, pause = ?self.pause, "Slowing down");
        Ok(())
    }
}

#[async_trait]
impl Handler<SpeedUp> for HelloWorld {
    async fn handle(&mut self, _ctx: &Context, message: SpeedUp) -> Result<(), HandlerError> {
        if message.times == 0 {
            return Err("cannot speed up zero times".into());
        }
        self.pause /= message.times;
        info!(times = message.times, pause = ?self.pause, "Speeding up");
        Ok(())
    }
}

#[async_trait]
impl Handler<GetCount> for HelloWorld {
    async fn handle(&mut self, _ctx: &Context, _message: GetCount) -> Result<u64, HandlerError> {
        Ok(self.count)
    }
}

#[async_trait]
impl Handler<GetPause> for HelloWorld {
    async fn handle(&mut self, _ctx: &Context, _message: GetPause) -> Result<Duration, HandlerError> {
        Ok(self.pause)
    }
}
