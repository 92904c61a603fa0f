//! # Heartbeat Actor
//!
//! Counts the ticks of its own `beat` timer. It exists to show a child actor and a
//! timer living under `/hello-world`.

use actor_runtime::{Actor, Context, Handler, HandlerError, Message, RouterBuilder, TimerConfig};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const BEAT_TIMER: &str = "beat";

#[derive(Debug, Clone, Copy)]
pub struct Beat;

impl Message for Beat {
    type Reply = ();
}

#[derive(Debug, Clone, Copy)]
pub struct GetBeats;

impl Message for GetBeats {
    type Reply = u64;
}

pub struct Heartbeat {
    interval: Duration,
    beats: u64,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self { interval, beats: 0 }
    }
}

#[async_trait]
impl Actor for Heartbeat {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new().route::<Beat>().route::<GetBeats>()
    }

    async fn initialize(&mut self, ctx: &Context) -> Result<(), HandlerError> {
        ctx.create_timer(BEAT_TIMER, Beat, TimerConfig::every(self.interval))?;
        Ok(())
    }
}

#[async_trait]
impl Handler<Beat> for Heartbeat {
    async fn handle(&mut self, _ctx: &Context, _message: Beat) -> Result<(), HandlerError> {
        self.beats += 1;
        debug!(beats = self.beats, "Beat");
        Ok(())
    }
}

#[async_trait]
impl Handler<GetBeats> for Heartbeat {
    async fn handle(&mut self, _ctx: &Context, _message: GetBeats) -> Result<u64, HandlerError> {
        Ok(self.beats)
    }
}
