use actor_runtime::Message;
use serde::{Deserialize, Serialize};

/// Sent to itself once initialized; starts the logging loop.
#[derive(Debug, Clone, Copy)]
pub struct Prepare;

impl Message for Prepare {
    type Reply = ();
}

/// Logs one greeting and schedules the next one.
#[derive(Debug, Clone, Copy)]
pub struct Log;

impl Message for Log {
    type Reply = ();
}

/// Multiplies the pause between greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlowDown {
    pub times: u32,
}

impl Message for SlowDown {
    type Reply = ();
}

/// Divides the pause between greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedUp {
    pub times: u32,
}

impl Message for SpeedUp {
    type Reply = ();
}

/// How many greetings have been logged so far.
#[derive(Debug, Clone, Copy)]
pub struct GetCount;

impl Message for GetCount {
    type Reply = u64;
}

/// The current pause between greetings.
#[derive(Debug, Clone, Copy)]
pub struct GetPause;

impl Message for GetPause {
    type Reply = std::time::Duration;
}
