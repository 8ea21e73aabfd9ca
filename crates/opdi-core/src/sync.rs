// ── Synchronizer ──
//
// Lifecycle for keeping one device's state in sync. A single loop task
// owns the `Reconciler` and the `PollScheduler`; the stream task and poll
// tasks only ever talk to it through the inbound queue or the poll
// `JoinSet`, so every state transition is applied in arrival order.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::{self, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::command::{Command, CommandResult};
use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::log::EventLog;
use crate::model::{ConnectionHealth, DeviceSnapshot, DomainEvent, LogEntry, LogKind};
use crate::poll::{PollKind, PollScheduler};
use crate::reconcile::Reconciler;
use crate::reconnect::stream_task;
use crate::stream::SnapshotStream;
use crate::transport::DeviceTransport;

const INBOUND_CHANNEL_SIZE: usize = 256;

type SnapshotSink = Arc<watch::Sender<Arc<DeviceSnapshot>>>;

/// Messages consumed by the synchronizer loop.
#[derive(Debug)]
pub(crate) enum Inbound {
    /// A normalized frame from the event stream.
    Event(DomainEvent),
    /// Request an out-of-cadence poll.
    PollNow(PollKind),
    /// The reconnection controller changed phase.
    StreamHealth(ConnectionHealth),
}

// ── Synchronizer ─────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Created stopped; call
/// [`start()`](Self::start) to begin polling and streaming.
pub struct Synchronizer<T: DeviceTransport> {
    inner: Arc<SynchronizerInner<T>>,
}

impl<T: DeviceTransport> Clone for Synchronizer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SynchronizerInner<T> {
    config: SyncConfig,
    transport: Arc<T>,
    snapshot_tx: SnapshotSink,
    event_log: EventLog,
    cancel: CancellationToken,
    /// Present while started.
    running: Mutex<Option<Running>>,
    /// The reconciler, parked here while stopped so state and sequence
    /// numbers survive a restart.
    reconciler: Mutex<Option<Reconciler<SnapshotSink>>>,
}

struct Running {
    inbound: mpsc::Sender<Inbound>,
    /// Child of the synchronizer's token, fresh for every start.
    cancel: CancellationToken,
    sync_handle: JoinHandle<Reconciler<SnapshotSink>>,
    stream_handle: Option<JoinHandle<()>>,
}

impl<T: DeviceTransport> Synchronizer<T> {
    /// Create a synchronizer. Does NOT start any task.
    pub fn new(config: SyncConfig, transport: T) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(DeviceSnapshot::initial()));
        let snapshot_tx = Arc::new(snapshot_tx);
        let reconciler = Reconciler::new(Arc::clone(&snapshot_tx));

        Self {
            inner: Arc::new(SynchronizerInner {
                config,
                transport: Arc::new(transport),
                snapshot_tx,
                event_log: EventLog::new(),
                cancel: CancellationToken::new(),
                running: Mutex::new(None),
                reconciler: Mutex::new(Some(reconciler)),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.inner.transport
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start polling and (if enabled) the event stream. A no-op while
    /// already running.
    pub async fn start(&self) {
        let mut running = self.inner.running.lock().await;
        if running.is_some() {
            debug!("synchronizer already running");
            return;
        }

        let reconciler = self
            .inner
            .reconciler
            .lock()
            .await
            .take()
            .unwrap_or_else(|| Reconciler::new(Arc::clone(&self.inner.snapshot_tx)));

        let cancel = self.inner.cancel.child_token();
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CHANNEL_SIZE);
        let config = &self.inner.config;

        let sync_handle = tokio::spawn(sync_loop(
            Arc::clone(&self.inner.transport),
            reconciler,
            PollScheduler::new(config.poll_interval),
            inbound_rx,
            self.inner.event_log.clone(),
            cancel.clone(),
        ));

        let stream_handle = config.stream_enabled.then(|| {
            tokio::spawn(stream_task(
                Arc::clone(&self.inner.transport),
                config.reconnect,
                inbound_tx.clone(),
                self.inner.event_log.clone(),
                cancel.clone(),
            ))
        });

        *running = Some(Running {
            inbound: inbound_tx,
            cancel,
            sync_handle,
            stream_handle,
        });
        info!(url = %config.url, "synchronizer started");
    }

    /// Cancel the stream, the poll timer and any in-flight polls, and wait
    /// for every task to finish. The synchronizer may be started again.
    pub async fn stop(&self) {
        // Held until the reconciler is parked so a concurrent start waits
        let mut guard = self.inner.running.lock().await;
        let Some(running) = guard.take() else {
            return;
        };
        running.cancel.cancel();
        drop(running.inbound);

        if let Some(handle) = running.stream_handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "event stream task failed");
            }
        }

        match running.sync_handle.await {
            Ok(mut reconciler) => {
                reconciler.set_stream_health(ConnectionHealth::default());
                *self.inner.reconciler.lock().await = Some(reconciler);
            }
            Err(e) => warn!(error = %e, "synchronizer task failed"),
        }
        drop(guard);
        info!("synchronizer stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.inner.running.lock().await.is_some()
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Request an out-of-cadence poll. Suppressed if the same kind is
    /// already in flight.
    pub async fn poll_now(&self, kind: PollKind) -> Result<(), CoreError> {
        let inbound = self
            .inner
            .running
            .lock()
            .await
            .as_ref()
            .map(|running| running.inbound.clone())
            .ok_or(CoreError::NotRunning)?;
        inbound
            .send(Inbound::PollNow(kind))
            .await
            .map_err(|_| CoreError::NotRunning)
    }

    // ── Observation ──────────────────────────────────────────────────

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        Arc::clone(&self.inner.snapshot_tx.borrow())
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot_tx.subscribe())
    }

    /// Raw frames, stream transitions, poll failures and command outcomes.
    pub fn event_log(&self) -> tokio::sync::broadcast::Receiver<Arc<LogEntry>> {
        self.inner.event_log.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate and deliver a command, then request the matching refresh.
    ///
    /// Works while stopped; the refresh is only requested while running.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let name = command.name();
        if let Err(e) = command.validate() {
            self.inner
                .event_log
                .record(LogKind::Command, format!("{name} rejected: {e}"));
            return Err(e);
        }

        let response = match self.inner.transport.send_command(&command).await {
            Ok(response) => response,
            Err(e) => {
                warn!(command = name, error = %e, "command failed");
                self.inner
                    .event_log
                    .record(LogKind::Command, format!("{name} failed: {e}"));
                return Err(e.into());
            }
        };

        info!(command = name, "command accepted");
        self.inner
            .event_log
            .record(LogKind::Command, format!("{name} ok"));

        let refresh = command.refresh_kind();
        match self.poll_now(refresh).await {
            Ok(()) | Err(CoreError::NotRunning) => {}
            Err(e) => debug!(error = %e, "follow-up refresh not queued"),
        }
        Ok(CommandResult { response, refresh })
    }
}

impl<T> Drop for SynchronizerInner<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Loop ─────────────────────────────────────────────────────────────

type PollOutcome = (PollKind, Result<Value, opdi_api::Error>);

/// The single writer of device state. Returns the reconciler on exit so
/// it can be parked until the next start.
async fn sync_loop<T: DeviceTransport>(
    transport: Arc<T>,
    mut reconciler: Reconciler<SnapshotSink>,
    mut scheduler: PollScheduler,
    mut inbound: mpsc::Receiver<Inbound>,
    log: EventLog,
    cancel: CancellationToken,
) -> Reconciler<SnapshotSink> {
    let mut polls = Polls::new(transport);
    for kind in PollKind::STARTUP {
        polls.issue(&mut scheduler, kind);
    }
    let mut ticker = scheduler.ticker().await;

    // Cancellation is checked first; poll completions and inbound messages
    // are taken in whichever order they become ready.
    while !cancel.is_cancelled() {
        tokio::select! {
            () = cancel.cancelled() => break,
            Some(joined) = polls.set.join_next_with_id() => {
                let (id, outcome) = match joined {
                    Ok((id, outcome)) => (id, Ok(outcome)),
                    Err(e) => (e.id(), Err(e)),
                };
                let Some(kind) = polls.ids.remove(&id) else { continue };
                scheduler.finish(kind);
                match outcome {
                    Ok((_, Ok(payload))) => {
                        if let Err(e) = reconciler.apply_poll(kind, payload) {
                            warn!(poll = %kind, error = %e, "poll response rejected");
                            log.record(LogKind::PollFailed, format!("{kind}: {e}"));
                        }
                    }
                    Ok((_, Err(e))) => {
                        warn!(poll = %kind, error = %e, "poll failed");
                        log.record(LogKind::PollFailed, format!("{kind}: {e}"));
                        reconciler.record_poll_failure(kind, e.to_string());
                    }
                    Err(e) => {
                        warn!(poll = %kind, error = %e, "poll task failed");
                        reconciler.record_poll_failure(kind, e.to_string());
                    }
                }
            }
            Some(message) = inbound.recv() => match message {
                Inbound::Event(event) => {
                    if let Some(kind) = reconciler.apply_event(&event) {
                        polls.issue(&mut scheduler, kind);
                    }
                }
                Inbound::PollNow(kind) => polls.issue(&mut scheduler, kind),
                Inbound::StreamHealth(health) => reconciler.set_stream_health(health),
            },
            _ = ticker.tick() => polls.issue(&mut scheduler, PollKind::Status),
        }
    }

    polls.set.shutdown().await;
    debug!("synchronizer loop exiting");
    reconciler
}

/// In-flight poll tasks, keyed back to their kind.
struct Polls<T> {
    transport: Arc<T>,
    set: JoinSet<PollOutcome>,
    ids: HashMap<task::Id, PollKind>,
}

impl<T: DeviceTransport> Polls<T> {
    fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            set: JoinSet::new(),
            ids: HashMap::new(),
        }
    }

    fn issue(&mut self, scheduler: &mut PollScheduler, kind: PollKind) {
        if !scheduler.try_begin(kind) {
            trace!(poll = %kind, "poll already in flight");
            return;
        }
        let transport = Arc::clone(&self.transport);
        let handle = self.set.spawn(async move {
            let result = transport.fetch_snapshot(kind).await;
            (kind, result)
        });
        self.ids.insert(handle.id(), kind);
    }
}

// ── One-shot fetch ───────────────────────────────────────────────────

/// Poll `kinds` once, in order, and reconcile the results into a snapshot
/// without starting any background task. Stops at the first failure.
pub async fn fetch_once<T: DeviceTransport>(
    transport: &T,
    kinds: &[PollKind],
) -> Result<DeviceSnapshot, CoreError> {
    let (sink, _) = watch::channel(Arc::new(DeviceSnapshot::initial()));
    let mut reconciler = Reconciler::new(sink);
    for &kind in kinds {
        let payload = transport.fetch_snapshot(kind).await?;
        reconciler.apply_poll(kind, payload)?;
    }
    Ok(reconciler.snapshot())
}
