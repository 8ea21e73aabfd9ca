// ── Event stream reconnection ──
//
// `ReconnectController` is the pure state machine (Disconnected →
// Connecting → Open → Disconnected) with deterministic exponential backoff.
// `stream_task` drives it against a transport: open, read until the stream
// ends, back off, repeat, until cancelled.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::log::EventLog;
use crate::model::{ConnectionHealth, LogKind, StreamPhase};
use crate::normalize::normalize;
use crate::sync::Inbound;
use crate::transport::DeviceTransport;

// ── ReconnectPolicy ──────────────────────────────────────────────────

/// Exponential backoff configuration for the event stream.
///
/// `delay = min(max_delay, base_delay * 2^attempt)`, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first retry. Default: 1s.
    pub base_delay: Duration,
    /// Upper bound on the delay. Default: 15s.
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(15_000),
        }
    }
}

impl ReconnectPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        1_u32
            .checked_shl(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

// ── ReconnectController ──────────────────────────────────────────────

/// Owns the stream lifecycle state. At most one stream is ever open.
#[derive(Debug)]
pub struct ReconnectController {
    policy: ReconnectPolicy,
    phase: StreamPhase,
    attempt: u32,
    next_delay: Option<Duration>,
}

impl ReconnectController {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            phase: StreamPhase::Disconnected,
            attempt: 0,
            next_delay: None,
        }
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Begin a connection attempt. A no-op returning `false` unless the
    /// stream is currently disconnected.
    pub fn start(&mut self) -> bool {
        if self.phase != StreamPhase::Disconnected {
            return false;
        }
        self.phase = StreamPhase::Connecting;
        self.next_delay = None;
        true
    }

    /// The transport reported a successful open.
    pub fn on_open(&mut self) {
        self.phase = StreamPhase::Open;
        self.attempt = 0;
        self.next_delay = None;
    }

    /// The stream closed or failed (whether or not it ever opened).
    /// Returns the delay before the next attempt.
    pub fn on_close(&mut self) -> Duration {
        let delay = self.policy.delay_for(self.attempt);
        self.phase = StreamPhase::Disconnected;
        self.attempt = self.attempt.saturating_add(1);
        self.next_delay = Some(delay);
        delay
    }

    pub fn health(&self) -> ConnectionHealth {
        ConnectionHealth {
            phase: self.phase,
            attempt: self.attempt,
            next_delay_ms: self
                .next_delay
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            is_open: self.phase == StreamPhase::Open,
        }
    }
}

// ── Background stream loop ───────────────────────────────────────────

/// Connect → read → on close, back off → reconnect. Every frame is logged
/// before it is normalized and queued for the reconciler.
pub(crate) async fn stream_task<T: DeviceTransport>(
    transport: Arc<T>,
    policy: ReconnectPolicy,
    inbound: mpsc::Sender<Inbound>,
    log: EventLog,
    cancel: CancellationToken,
) {
    let mut controller = ReconnectController::new(policy);

    'outer: loop {
        if !controller.start() {
            break;
        }
        if report(&inbound, &controller).await.is_err() {
            break;
        }

        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            opened = transport.open_stream() => opened,
        };

        match opened {
            Ok(mut frames) => {
                controller.on_open();
                info!("event stream open");
                log.record(LogKind::StreamOpened, "event stream open");
                if report(&inbound, &controller).await.is_err() {
                    break;
                }

                loop {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break 'outer,
                        frame = frames.next() => match frame {
                            Some(Ok(text)) => {
                                log.record(LogKind::Frame, text.as_str());
                                let event = normalize(&text);
                                debug!(event = event.name(), "event stream frame");
                                if inbound.send(Inbound::Event(event)).await.is_err() {
                                    break 'outer;
                                }
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "event stream failed");
                                log.record(LogKind::StreamError, e.to_string());
                                break;
                            }
                            None => {
                                info!("event stream closed");
                                log.record(LogKind::StreamClosed, "event stream closed");
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, attempt = controller.attempt(), "event stream connect failed");
                log.record(LogKind::StreamError, format!("connect failed: {e}"));
            }
        }

        let delay = controller.on_close();
        info!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            attempt = controller.attempt(),
            "waiting before event stream reconnect"
        );
        if report(&inbound, &controller).await.is_err() {
            break;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    debug!("event stream task exiting");
}

async fn report(
    inbound: &mpsc::Sender<Inbound>,
    controller: &ReconnectController,
) -> Result<(), mpsc::error::SendError<Inbound>> {
    inbound.send(Inbound::StreamHealth(controller.health())).await
}
