use actor_runtime::mock::Probe;
use actor_runtime::{
    Actor, ActorError, Context, Core, CoreConfig, Handler, HandlerError, Identity, Lifecycle,
    MailboxCapacity, Message, RouterBuilder, Shutdown, ShutdownPolicy, TimerConfig, TimerDone,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

const TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// SHUTDOWN POLICIES
// =============================================================================

#[derive(Debug)]
struct Hold;
impl Message for Hold {
    type Reply = ();
}

#[derive(Debug)]
struct Append(u32);
impl Message for Append {
    type Reply = ();
}

#[derive(Debug)]
struct Entries;
impl Message for Entries {
    type Reply = Vec<u32>;
}

struct Gated {
    gate: Arc<Notify>,
    log: Arc<Mutex<Vec<u32>>>,
    stopped: Arc<AtomicBool>,
}

#[async_trait]
impl Actor for Gated {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new()
            .route::<Hold>()
            .route::<Append>()
            .route::<Entries>()
    }

    async fn stopping(&mut self, _ctx: &Context) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Handler<Hold> for Gated {
    async fn handle(&mut self, _ctx: &Context, _message: Hold) -> Result<(), HandlerError> {
        self.gate.notified().await;
        Ok(())
    }
}

#[async_trait]
impl Handler<Append> for Gated {
    async fn handle(&mut self, _ctx: &Context, message: Append) -> Result<(), HandlerError> {
        self.log.lock().unwrap().push(message.0);
        Ok(())
    }
}

#[async_trait]
impl Handler<Entries> for Gated {
    async fn handle(&mut self, _ctx: &Context, _message: Entries) -> Result<Vec<u32>, HandlerError> {
        Ok(self.log.lock().unwrap().clone())
    }
}

struct ShutdownRun {
    log: Vec<u32>,
    pending_ask: Result<Vec<u32>, ActorError>,
    late_tell: Result<(), ActorError>,
    stopped: bool,
}

/// Queues `Append(1)`, `Shutdown`, `Append(2)` and an `ask` behind a held handler, then
/// releases it.
async fn run_shutdown(policy: ShutdownPolicy) -> ShutdownRun {
    let core = Core::new(CoreConfig::default().with_shutdown_policy(policy));
    let ctx = core.context();
    let gate = Arc::new(Notify::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let stopped = Arc::new(AtomicBool::new(false));
    let proxy = ctx
        .create_actor(
            "gated",
            Gated {
                gate: gate.clone(),
                log: log.clone(),
                stopped: stopped.clone(),
            },
        )
        .unwrap();

    proxy.tell(&ctx, Hold).await.unwrap();
    proxy.tell(&ctx, Append(1)).await.unwrap();
    proxy.tell(&ctx, Shutdown).await.unwrap();
    proxy.tell(&ctx, Append(2)).await.unwrap();
    let pending_ask = {
        let proxy = proxy.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move { proxy.ask(&ctx, Entries, TIMEOUT).await })
    };
    tokio::task::yield_now().await;
    assert_eq!(proxy.lifecycle(), Lifecycle::Running);

    gate.notify_one();
    tokio::time::timeout(TIMEOUT, proxy.wait_until_shutdown())
        .await
        .unwrap();

    let late_tell = proxy.tell(&ctx, Append(3)).await;
    let log = log.lock().unwrap().clone();
    ShutdownRun {
        log,
        pending_ask: pending_ask.await.unwrap(),
        late_tell,
        stopped: stopped.load(Ordering::SeqCst),
    }
}

#[tokio::test]
async fn test_drain_policy_handles_everything_queued() {
    let run = run_shutdown(ShutdownPolicy::Drain).await;
    assert_eq!(run.log, vec![1, 2]);
    assert_eq!(run.pending_ask.unwrap(), vec![1, 2]);
    assert!(matches!(run.late_tell, Err(ActorError::ActorNotFound(_))));
    assert!(run.stopped);
}

#[tokio::test]
async fn test_drop_policy_discards_queue_and_fails_pending_asks() {
    let run = run_shutdown(ShutdownPolicy::Drop).await;
    assert_eq!(run.log, vec![1]);
    assert!(matches!(run.pending_ask, Err(ActorError::ReplyDropped(_))));
    assert!(matches!(run.late_tell, Err(ActorError::ActorNotFound(_))));
    assert!(run.stopped);
}

#[tokio::test]
async fn test_tell_while_draining_fails_with_mailbox_closed() {
    let core = Core::default();
    let ctx = core.context();
    let gate = Arc::new(Notify::new());
    let proxy = ctx
        .create_actor(
            "gated",
            Gated {
                gate: gate.clone(),
                log: Default::default(),
                stopped: Default::default(),
            },
        )
        .unwrap();

    // Shutdown first, then park the drain inside a held handler.
    proxy.tell(&ctx, Shutdown).await.unwrap();
    proxy.tell(&ctx, Hold).await.unwrap();
    while proxy.lifecycle() != Lifecycle::Draining {
        tokio::task::yield_now().await;
    }

    assert!(matches!(
        proxy.tell(&ctx, Append(1)).await,
        Err(ActorError::MailboxClosed(_))
    ));

    gate.notify_one();
    proxy.wait_until_shutdown().await;
}

// =============================================================================
// INITIALIZATION
// =============================================================================

#[derive(Debug)]
struct Ping;
impl Message for Ping {
    type Reply = &'static str;
}

struct Fragile {
    fail: bool,
}

#[async_trait]
impl Actor for Fragile {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new().route::<Ping>()
    }

    async fn initialize(&mut self, _ctx: &Context) -> Result<(), HandlerError> {
        if self.fail {
            return Err("no configuration".into());
        }
        Ok(())
    }
}

#[async_trait]
impl Handler<Ping> for Fragile {
    async fn handle(&mut self, _ctx: &Context, _message: Ping) -> Result<&'static str, HandlerError> {
        Ok("pong")
    }
}

#[tokio::test]
async fn test_failed_initialization_terminates_actor() {
    let core = Core::default();
    let ctx = core.context();
    let proxy = ctx.create_actor("fragile", Fragile { fail: true }).unwrap();

    let err = proxy.wait_until_initialized().await.unwrap_err();
    assert!(matches!(err, ActorError::InitializationFailed { reason, .. } if reason == "no configuration"));

    proxy.wait_until_shutdown().await;
    assert!(core.is_empty());

    // The identity is free again.
    let proxy = ctx.create_actor("fragile", Fragile { fail: false }).unwrap();
    proxy.wait_until_initialized().await.unwrap();
    assert_eq!(proxy.ask(&ctx, Ping, TIMEOUT).await.unwrap(), "pong");
    core.shutdown().await;
}

// =============================================================================
// CORE SHUTDOWN
// =============================================================================

#[tokio::test]
async fn test_core_shutdown_stops_all_and_refuses_creation() {
    let core = Core::default();
    let ctx = core.context();
    let a = ctx.create_actor("a", Fragile { fail: false }).unwrap();
    let b = ctx.create_actor("a/b", Fragile { fail: false }).unwrap();
    assert_eq!(core.len(), 2);

    core.shutdown().await;
    assert!(a.is_shutdown());
    assert!(b.is_shutdown());
    assert!(core.is_empty());
    assert!(matches!(
        ctx.create_actor("c", Fragile { fail: false }),
        Err(ActorError::CoreShutdown)
    ));

    // Idempotent.
    core.shutdown().await;
}

// =============================================================================
// CONTEXT: CHILDREN, SENDERS, SELF-MESSAGES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Note(u32);
impl Message for Note {
    type Reply = ();
}

#[derive(Debug)]
struct SpawnChild;
impl Message for SpawnChild {
    type Reply = Identity;
}

#[derive(Debug)]
struct Relay(u32);
impl Message for Relay {
    type Reply = ();
}

#[derive(Debug)]
struct Origin;
impl Message for Origin {
    type Reply = (Option<Identity>, Option<Identity>);
}

#[derive(Debug)]
struct Flood;
impl Message for Flood {
    type Reply = Vec<Result<(), ActorError>>;
}

#[derive(Default)]
struct Parent {
    child: Option<Probe<Note>>,
    last_reply_to: Option<Identity>,
}

impl Actor for Parent {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new()
            .route::<SpawnChild>()
            .route::<Relay>()
            .route::<Origin>()
            .route::<Flood>()
            .route::<Note>()
    }
}

#[async_trait]
impl Handler<SpawnChild> for Parent {
    async fn handle(&mut self, ctx: &Context, _message: SpawnChild) -> Result<Identity, HandlerError> {
        let probe = self.child.take().ok_or("child already spawned")?;
        let child = ctx.create_actor("child", probe)?;
        Ok(child.identity().clone())
    }
}

#[async_trait]
impl Handler<Relay> for Parent {
    async fn handle(&mut self, ctx: &Context, message: Relay) -> Result<(), HandlerError> {
        ctx.get_proxy("child")?.tell(ctx, Note(message.0)).await?;
        Ok(())
    }
}

#[async_trait]
impl Handler<Origin> for Parent {
    async fn handle(
        &mut self,
        ctx: &Context,
        _message: Origin,
    ) -> Result<(Option<Identity>, Option<Identity>), HandlerError> {
        assert!(ctx.envelope_id().is_some());
        Ok((ctx.sender().cloned(), self.last_reply_to.clone()))
    }
}

#[async_trait]
impl Handler<Flood> for Parent {
    async fn handle(&mut self, ctx: &Context, _message: Flood) -> Result<Vec<Result<(), ActorError>>, HandlerError> {
        Ok(vec![ctx.tell_me(Note(1)), ctx.tell_me(Note(2))])
    }
}

#[async_trait]
impl Handler<Note> for Parent {
    async fn handle(&mut self, ctx: &Context, _message: Note) -> Result<(), HandlerError> {
        self.last_reply_to = ctx.reply_to().cloned();
        Ok(())
    }
}

#[tokio::test]
async fn test_children_are_named_under_parent_and_see_parent_as_sender() {
    let core = Core::default();
    let ctx = core.context();
    let (probe, probe_handle) = Probe::<Note>::new();
    let parent = ctx
        .create_actor(
            "parent",
            Parent {
                child: Some(probe),
                ..Default::default()
            },
        )
        .unwrap();

    let child = parent.ask(&ctx, SpawnChild, TIMEOUT).await.unwrap();
    assert_eq!(child.as_str(), "/parent/child");
    assert_eq!(child.parent().as_ref(), Some(parent.identity()));
    assert!(core.contains(&child));

    parent.tell(&ctx, Relay(1)).await.unwrap();
    parent.tell(&ctx, Relay(2)).await.unwrap();
    assert!(probe_handle.wait_for(2, TIMEOUT).await);
    let parent_identity = parent.identity().clone();
    assert_eq!(
        probe_handle.take_received(),
        vec![(parent_identity.clone(), Note(1)), (parent_identity, Note(2))]
    );

    core.shutdown().await;
}

#[tokio::test]
async fn test_handler_context_exposes_envelope() {
    let core = Core::default();
    let ctx = core.context();
    let parent = ctx.create_actor("parent", Parent::default()).unwrap();

    let (sender, reply_to) = parent.ask(&ctx, Origin, TIMEOUT).await.unwrap();
    assert_eq!(sender, Some(Identity::root()));
    assert_eq!(reply_to, None);

    let answer_to = Identity::parse("/somewhere/else").unwrap();
    parent
        .tell_with_reply_to(&ctx, Note(0), Some(answer_to.clone()))
        .await
        .unwrap();
    let (_, reply_to) = parent.ask(&ctx, Origin, TIMEOUT).await.unwrap();
    assert_eq!(reply_to, Some(answer_to));

    core.shutdown().await;
}

#[tokio::test]
async fn test_tell_me_reports_full_bounded_mailbox() {
    let core = Core::new(CoreConfig::default().with_mailbox(MailboxCapacity::Bounded(1)));
    let ctx = core.context();
    let parent = ctx.create_actor("parent", Parent::default()).unwrap();

    let results = parent.ask(&ctx, Flood, TIMEOUT).await.unwrap();
    assert!(results[0].is_ok());
    assert_eq!(
        results[1],
        Err(ActorError::MailboxFull(parent.identity().clone()))
    );

    // The root context has no mailbox of its own.
    assert!(matches!(ctx.tell_me(Note(0)), Err(ActorError::ActorNotFound(_))));
    core.shutdown().await;
}

// =============================================================================
// ACTLETS & TIMERS
// =============================================================================

#[derive(Debug, Clone)]
struct Tick;
impl Message for Tick {
    type Reply = ();
}

#[derive(Debug)]
struct Fetched(u32);
impl Message for Fetched {
    type Reply = ();
}

#[derive(Debug)]
struct StartFetch;
impl Message for StartFetch {
    type Reply = ();
}

#[derive(Debug)]
struct Report;
impl Message for Report {
    type Reply = Worker;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Worker {
    ticks: u32,
    timers_done: Vec<String>,
    fetched: Option<(u32, String)>,
    timer_running: bool,
    actlet_running: bool,
}

#[async_trait]
impl Actor for Worker {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new()
            .route::<Tick>()
            .route::<TimerDone>()
            .route::<StartFetch>()
            .route::<Fetched>()
            .route::<Report>()
    }

    async fn initialize(&mut self, ctx: &Context) -> Result<(), HandlerError> {
        let config = TimerConfig::every(Duration::from_millis(5))
            .starting_now()
            .with_repetitions(3);
        ctx.create_timer("tick", Tick, config)?;
        Ok(())
    }
}

#[async_trait]
impl Handler<Tick> for Worker {
    async fn handle(&mut self, _ctx: &Context, _message: Tick) -> Result<(), HandlerError> {
        self.ticks += 1;
        Ok(())
    }
}

#[async_trait]
impl Handler<TimerDone> for Worker {
    async fn handle(&mut self, _ctx: &Context, message: TimerDone) -> Result<(), HandlerError> {
        self.timers_done.push(message.name);
        Ok(())
    }
}

#[async_trait]
impl Handler<StartFetch> for Worker {
    async fn handle(&mut self, ctx: &Context, _message: StartFetch) -> Result<(), HandlerError> {
        ctx.create_actlet("fetch", async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Fetched(42)
        })?;
        Ok(())
    }
}

#[async_trait]
impl Handler<Fetched> for Worker {
    async fn handle(&mut self, ctx: &Context, message: Fetched) -> Result<(), HandlerError> {
        let sender = ctx.sender().map(Identity::to_string).unwrap_or_default();
        self.fetched = Some((message.0, sender));
        Ok(())
    }
}

#[async_trait]
impl Handler<Report> for Worker {
    async fn handle(&mut self, ctx: &Context, _message: Report) -> Result<Worker, HandlerError> {
        Ok(Worker {
            timer_running: ctx.is_timer_running("tick"),
            actlet_running: ctx.is_actlet_running("fetch"),
            ..self.clone()
        })
    }
}

#[tokio::test]
async fn test_finite_timer_ticks_then_reports_done() {
    let core = Core::default();
    let ctx = core.context();
    let worker = ctx.create_actor("worker", Worker::default()).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let report = worker.ask(&ctx, Report, TIMEOUT).await.unwrap();
    assert_eq!(report.ticks, 3);
    assert_eq!(report.timers_done, vec!["tick".to_string()]);
    assert!(!report.timer_running);

    core.shutdown().await;
}

#[tokio::test]
async fn test_actlet_result_is_delivered_as_message() {
    let core = Core::default();
    let ctx = core.context();
    let worker = ctx.create_actor("worker", Worker::default()).unwrap();

    worker.tell(&ctx, StartFetch).await.unwrap();
    let err = worker.ask(&ctx, StartFetch, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, ActorError::HandlerFailure { reason, .. } if reason.contains("/worker/actlet/fetch")));

    tokio::time::sleep(Duration::from_millis(100)).await;
    let report = worker.ask(&ctx, Report, TIMEOUT).await.unwrap();
    assert_eq!(
        report.fetched,
        Some((42, "/worker/actlet/fetch".to_string()))
    );
    assert!(!report.actlet_running);

    core.shutdown().await;
}
