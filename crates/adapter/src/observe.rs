//! Observe module - JSON event records for presentation consumers
//!
//! [`EventRecord`] is the serialisable form of a [`GameEvent`]. [`EventLog`]
//! appends records as JSON lines to a file from a background task, so the
//! game loop never waits on disk I/O.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{EventPayload, GameEvent};
use crate::types::{Action, CellChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Changes,
    Lines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<CellChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<usize>,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}

impl From<&GameEvent> for EventRecord {
    fn from(event: &GameEvent) -> Self {
        let (kind, changes, lines) = match &event.payload {
            EventPayload::Changes(changes) => (EventKind::Changes, changes.clone(), Vec::new()),
            EventPayload::LinesCleared { rows, .. } => {
                (EventKind::Lines, Vec::new(), rows.clone())
            }
        };
        Self {
            kind,
            changes,
            lines,
            score: event.score,
            actions: event.actions.clone(),
        }
    }
}

/// Handle to a background JSON-lines writer
#[derive(Debug)]
pub struct EventLog {
    tx: mpsc::UnboundedSender<EventRecord>,
    task: JoinHandle<()>,
}

impl EventLog {
    /// Open (append) `path` and start the writer task. Must be called inside a
    /// tokio runtime.
    pub fn spawn(path: String) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EventRecord>();
        let task = tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[EventLog] cannot open {}: {}", path, e);
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(4096);

            while let Some(rec) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &rec).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });

        Self { tx, task }
    }

    /// Queue one event. Silently dropped if the writer has stopped.
    pub fn record(&self, event: &GameEvent) {
        let _ = self.tx.send(EventRecord::from(event));
    }

    /// Flush queued records and wait for the writer to finish
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}
