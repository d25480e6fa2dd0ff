use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::web::Bytes;
use db::{AppointmentScope, Db};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// How often a feed re-runs its query when no change notification arrives.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Single-entry guard over the fetch path. Poll ticks and change
/// notifications both funnel through it; a trigger that arrives while a
/// fetch is in flight is dropped, not queued.
pub struct FetchGate(AtomicBool);

impl FetchGate {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Claims the gate. Returns false when a fetch already holds it.
    pub fn begin(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn finish(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for FetchGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the process-wide relay: one LISTEN connection on the appointment
/// change channel, fanned out to every feed over a broadcast channel. If
/// the listener dies the relay ends and feeds fall back to polling alone;
/// there is no automatic reconnect.
pub fn spawn_change_relay(db: Db) -> broadcast::Sender<()> {
    let (tx, _) = broadcast::channel(16);
    let relay = tx.clone();
    tokio::spawn(async move {
        let mut listener = match db::listen::appointment_listener(&db).await {
            Ok(l) => l,
            Err(e) => {
                warn!("change feed unavailable, polling only: {e}");
                return;
            }
        };
        info!("appointment change relay started");
        loop {
            match listener.recv().await {
                Ok(_) => {
                    // Drop errors: no subscribers just means nobody is
                    // watching right now.
                    let _ = relay.send(());
                }
                Err(e) => {
                    warn!("change feed closed, polling only: {e}");
                    break;
                }
            }
        }
    });
    tx
}

struct FeedShared {
    db: Db,
    scope: AppointmentScope,
    gate: FetchGate,
    tx: watch::Sender<String>,
}

/// One subscriber's view of the appointment list, kept fresh by the poll
/// timer and the change relay. Each refresh overwrites the held value
/// wholesale (last write wins); consumers receive the full list as JSON.
pub struct AppointmentFeed;

impl AppointmentFeed {
    /// Starts the worker and returns the receiver the SSE stream reads
    /// from. The worker stops when the receiver is dropped.
    pub fn start(
        db: Db,
        scope: AppointmentScope,
        changes: broadcast::Receiver<()>,
    ) -> watch::Receiver<String> {
        let (tx, rx) = watch::channel(String::new());
        let shared = Arc::new(FeedShared {
            db,
            scope,
            gate: FetchGate::new(),
            tx,
        });
        tokio::spawn(Self::run(shared, changes));
        rx
    }

    async fn run(shared: Arc<FeedShared>, mut changes: broadcast::Receiver<()>) {
        let mut poll = tokio::time::interval(POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                // first tick completes immediately and serves as the
                // initial fetch
                _ = poll.tick() => Self::trigger(&shared),
                res = changes.recv() => match res {
                    Ok(()) | Err(RecvError::Lagged(_)) => Self::trigger(&shared),
                    Err(RecvError::Closed) => break,
                },
                _ = shared.tx.closed() => break,
            }
        }
    }

    fn trigger(shared: &Arc<FeedShared>) {
        if !shared.gate.begin() {
            return;
        }
        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            match db::appointments::list_appointments(&shared.db, shared.scope).await {
                Ok(rows) => {
                    if let Ok(json) = serde_json::to_string(&rows) {
                        let _ = shared.tx.send(json);
                    }
                }
                // keep the last good list; the next trigger tries again
                Err(e) => warn!("feed fetch failed: {e}"),
            }
            shared.gate.finish();
        });
    }
}

/// Formats one server-sent event carrying the current list.
pub fn sse_frame(json: &str) -> Bytes {
    Bytes::from(format!("data: {json}\n\n"))
}
