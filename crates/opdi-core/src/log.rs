// ── Event log ──
//
// Broadcast fan-out of `LogEntry` lines: raw stream frames, stream
// open/close transitions, poll failures, and command outcomes. Lagging
// subscribers lose the oldest lines.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::model::{LogEntry, LogKind};

/// Number of lines a subscriber can fall behind before it starts losing them.
pub const EVENT_LOG_CAPACITY: usize = 400;

/// Cheaply cloneable handle for writing to the event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    tx: broadcast::Sender<Arc<LogEntry>>,
}

impl EventLog {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_LOG_CAPACITY);
        Self { tx }
    }

    pub fn record(&self, kind: LogKind, message: impl Into<String>) {
        // No subscribers is fine
        let _ = self.tx.send(Arc::new(LogEntry::now(kind, message)));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<LogEntry>> {
        self.tx.subscribe()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_entries_in_order() {
        let log = EventLog::new();
        let mut rx = log.subscribe();
        log.record(LogKind::StreamOpened, "event stream open");
        log.record(LogKind::Frame, "{\"type\":\"net\"}");

        assert_eq!(rx.recv().await.unwrap().kind, LogKind::StreamOpened);
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.kind, LogKind::Frame);
        assert_eq!(frame.message, "{\"type\":\"net\"}");
    }
}
