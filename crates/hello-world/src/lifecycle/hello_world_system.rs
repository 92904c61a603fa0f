use crate::heartbeat_actor::GetBeats;
use crate::hello_world_actor::{GetCount, HelloWorld, SlowDown, SpeedUp, HEARTBEAT};
use actor_runtime::{ActorError, ActorProxy, Context, Core, CoreConfig};
use std::time::Duration;
use tracing::info;

pub const HELLO_WORLD: &str = "hello-world";

pub struct HelloWorldSystem {
    core: Core,
    context: Context,
    pub hello_world: ActorProxy,
}

impl HelloWorldSystem {
    /// Starts `/hello-world` (and, through it, `/hello-world/heartbeat`).
    pub async fn start(config: CoreConfig, actor: HelloWorld) -> Result<Self, ActorError> {
        let core = Core::new(config);
        let context = core.context();
        let hello_world = context.create_actor(HELLO_WORLD, actor)?;
        hello_world.wait_until_initialized().await?;
        info!(identity = %hello_world.identity(), "System started");

        Ok(Self {
            core,
            context,
            hello_world,
        })
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub async fn slow_down(&self, times: u32) -> Result<(), ActorError> {
        self.hello_world.tell(&self.context, SlowDown { times }).await
    }

    pub async fn speed_up(&self, times: u32) -> Result<(), ActorError> {
        self.hello_world.tell(&self.context, SpeedUp { times }).await
    }

    pub async fn greetings(&self, timeout: Duration) -> Result<u64, ActorError> {
        self.hello_world.ask(&self.context, GetCount, timeout).await
    }

    pub async fn heartbeats(&self, timeout: Duration) -> Result<u64, ActorError> {
        let heartbeat = self.context.proxy(&self.hello_world.identity().child(HEARTBEAT)?)?;
        heartbeat.ask(&self.context, GetBeats, timeout).await
    }

    /// Shuts every actor down and waits for all of them to terminate.
    pub async fn shutdown(self) {
        self.core.shutdown().await;
        info!("System shut down");
    }
}
