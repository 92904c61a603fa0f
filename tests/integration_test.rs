use actor_runtime::{
    Actor, ActorError, Context, Core, Handler, HandlerError, Lifecycle, Message, RouterBuilder,
    Shutdown,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

// --- Test actor: appends every entry to a log shared with the test ---

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

#[derive(Debug)]
struct Fail(&'static str);
impl Message for Fail {
    type Reply = ();
}

#[derive(Debug)]
struct Panic;
impl Message for Panic {
    type Reply = ();
}

#[derive(Debug)]
struct Unhandled;
impl Message for Unhandled {
    type Reply = ();
}

type SharedLog = Arc<Mutex<Vec<u32>>>;

struct Journal {
    log: SharedLog,
}

impl Journal {
    fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl Actor for Journal {
    fn routes() -> RouterBuilder<Self> {
        RouterBuilder::new()
            .route::<Append>()
            .route::<Entries>()
            .route::<Fail>()
            .route::<Panic>()
    }
}

#[async_trait]
impl Handler<Append> for Journal {
    async fn handle(&mut self, _ctx: &Context, message: Append) -> Result<(), HandlerError> {
        // Yield so that out-of-order processing would show up.
        tokio::task::yield_now().await;
        self.log.lock().unwrap().push(message.0);
        Ok(())
    }
}

#[async_trait]
impl Handler<Entries> for Journal {
    async fn handle(&mut self, _ctx: &Context, _message: Entries) -> Result<Vec<u32>, HandlerError> {
        Ok(self.log.lock().unwrap().clone())
    }
}

#[async_trait]
impl Handler<Fail> for Journal {
    async fn handle(&mut self, _ctx: &Context, message: Fail) -> Result<(), HandlerError> {
        Err(message.0.into())
    }
}

#[async_trait]
impl Handler<Panic> for Journal {
    async fn handle(&mut self, _ctx: &Context, _message: Panic) -> Result<(), HandlerError> {
        panic!("journal corrupted");
    }
}

// --- Ordering & shutdown ---

#[tokio::test]
async fn test_five_tells_then_shutdown_are_handled_in_order() {
    actor_runtime::logging::try_setup_tracing();
    let core = Core::default();
    let ctx = core.context();
    let (journal, log) = Journal::new();
    let proxy = ctx.create_actor("journal", journal).unwrap();

    for n in 1..=5 {
        proxy.tell(&ctx, Append(n)).await.unwrap();
    }
    proxy.tell(&ctx, Shutdown).await.unwrap();

    tokio::time::timeout(TIMEOUT, proxy.wait_until_shutdown())
        .await
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    assert!(proxy.is_shutdown());
    assert!(core.is_empty());
}

#[tokio::test]
async fn test_tells_from_many_senders_keep_per_sender_order() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, _log) = Journal::new();
    let proxy = ctx.create_actor("journal", journal).unwrap();

    let senders: Vec<_> = (0..3u32)
        .map(|sender| {
            let proxy = proxy.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                for n in 0..10 {
                    proxy.tell(&ctx, Append(sender * 100 + n)).await.unwrap();
                }
            })
        })
        .collect();
    for sender in senders {
        sender.await.unwrap();
    }

    let entries = proxy.ask(&ctx, Entries, TIMEOUT).await.unwrap();
    assert_eq!(entries.len(), 30);
    for sender in 0..3u32 {
        let own: Vec<_> = entries.iter().filter(|n| **n / 100 == sender).copied().collect();
        assert_eq!(own, (0..10).map(|n| sender * 100 + n).collect::<Vec<_>>());
    }
    core.shutdown().await;
}

#[tokio::test]
async fn test_wait_until_shutdown_resolves_for_every_waiter() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, _log) = Journal::new();
    let proxy = ctx.create_actor("journal", journal).unwrap();

    let waiters: Vec<_> = (0..16)
        .map(|_| {
            let proxy = proxy.clone();
            tokio::spawn(async move { proxy.wait_until_shutdown().await })
        })
        .collect();

    tokio::task::yield_now().await;
    assert!(waiters.iter().all(|waiter| !waiter.is_finished()));
    assert_eq!(proxy.lifecycle(), Lifecycle::Running);

    proxy.shutdown(&ctx).await.unwrap();
    for waiter in waiters {
        tokio::time::timeout(TIMEOUT, waiter).await.unwrap().unwrap();
    }

    // Already terminated: resolves without suspending.
    proxy.wait_until_shutdown().await;
}

// --- Dead letters & failures ---

#[tokio::test]
async fn test_unhandled_message_is_dropped_and_actor_keeps_running() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, _log) = Journal::new();
    let proxy = ctx.create_actor("journal", journal).unwrap();

    proxy.tell(&ctx, Unhandled).await.unwrap();
    proxy.tell(&ctx, Append(7)).await.unwrap();
    assert_eq!(proxy.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![7]);
    assert_eq!(proxy.lifecycle(), Lifecycle::Running);

    let err = proxy.ask(&ctx, Unhandled, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, ActorError::NoHandler { message: "Unhandled", .. }));

    core.shutdown().await;
}

#[tokio::test]
async fn test_handler_error_is_isolated() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, _log) = Journal::new();
    let proxy = ctx.create_actor("journal", journal).unwrap();

    proxy.tell(&ctx, Fail("disk full")).await.unwrap();
    proxy.tell(&ctx, Append(1)).await.unwrap();

    let err = proxy.ask(&ctx, Fail("still full"), TIMEOUT).await.unwrap_err();
    assert_eq!(
        err,
        ActorError::HandlerFailure {
            identity: proxy.identity().clone(),
            message: "Fail",
            reason: "still full".to_string(),
        }
    );
    assert_eq!(proxy.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![1]);

    core.shutdown().await;
}

#[tokio::test]
async fn test_handler_panic_is_isolated() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, _log) = Journal::new();
    let proxy = ctx.create_actor("journal", journal).unwrap();

    let err = proxy.ask(&ctx, Panic, TIMEOUT).await.unwrap_err();
    assert!(
        matches!(&err, ActorError::HandlerFailure { reason, .. } if reason == "journal corrupted")
    );

    proxy.tell(&ctx, Append(2)).await.unwrap();
    assert_eq!(proxy.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![2]);

    core.shutdown().await;
}

#[tokio::test]
async fn test_failing_actor_does_not_affect_sibling() {
    let core = Core::default();
    let ctx = core.context();
    let (first, _) = Journal::new();
    let (second, second_log) = Journal::new();
    let first = ctx.create_actor("first", first).unwrap();
    let second = ctx.create_actor("second", second).unwrap();

    first.tell(&ctx, Panic).await.unwrap();
    second.tell(&ctx, Append(3)).await.unwrap();

    assert_eq!(second.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![3]);
    assert_eq!(*second_log.lock().unwrap(), vec![3]);
    assert_eq!(first.lifecycle(), Lifecycle::Running);

    core.shutdown().await;
}

// --- Identities ---

#[tokio::test]
async fn test_duplicate_identity_is_rejected_until_terminated() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, log) = Journal::new();
    let first = ctx.create_actor("journal", journal).unwrap();

    let (duplicate, _) = Journal::new();
    let err = ctx.create_actor("journal", duplicate).unwrap_err();
    assert_eq!(err, ActorError::DuplicateIdentity(first.identity().clone()));

    // The first actor is unaffected.
    first.tell(&ctx, Append(1)).await.unwrap();
    assert_eq!(first.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![1]);

    first.shutdown(&ctx).await.unwrap();
    first.wait_until_shutdown().await;

    let (reused, reused_log) = Journal::new();
    let second = ctx.create_actor("journal", reused).unwrap();
    second.tell(&ctx, Append(2)).await.unwrap();
    assert_eq!(second.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![2]);
    assert_eq!(*log.lock().unwrap(), vec![1]);
    assert_eq!(*reused_log.lock().unwrap(), vec![2]);

    core.shutdown().await;
}

#[tokio::test]
async fn test_invalid_suffixes_are_rejected() {
    let core = Core::default();
    let ctx = core.context();
    for suffix in ["", "/journal", "a//b", "..", "a/./b"] {
        let (journal, _) = Journal::new();
        assert!(
            matches!(ctx.create_actor(suffix, journal), Err(ActorError::InvalidIdentity(_))),
            "{suffix:?} should be rejected"
        );
    }
    assert!(core.is_empty());
}

#[tokio::test]
async fn test_proxy_lookup_by_identity() {
    let core = Core::default();
    let ctx = core.context();
    let (journal, _log) = Journal::new();
    let created = ctx.create_actor("journal", journal).unwrap();

    let by_suffix = ctx.get_proxy("journal").unwrap();
    let by_identity = core.proxy(created.identity()).unwrap();
    assert_eq!(by_suffix, created);
    assert_eq!(by_identity, created);

    by_suffix.tell(&ctx, Append(4)).await.unwrap();
    assert_eq!(created.ask(&ctx, Entries, TIMEOUT).await.unwrap(), vec![4]);

    assert!(matches!(
        ctx.get_proxy("missing"),
        Err(ActorError::ActorNotFound(_))
    ));

    core.shutdown().await;
    assert!(matches!(
        created.tell(&ctx, Append(5)).await,
        Err(ActorError::ActorNotFound(_))
    ));
}
