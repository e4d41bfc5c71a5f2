//! Streamable values for live UI updates.
//!
//! A [`StreamWriter`] publishes zero or more partial values and is then closed
//! exactly once, either with a final payload or the payload-less
//! [`StreamValue::Done`] sentinel. Readers ([`StreamableValue`]) see the latest
//! value and can await the close.
//!
//! Closing consumes the writer, so no write can follow it. A writer dropped
//! without being closed closes itself with `Done`.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

// ─────────────────────────────────────────────────────────────────────────────
// Stream Value
// ─────────────────────────────────────────────────────────────────────────────

/// The state of a streamable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum StreamValue {
    /// Nothing written yet.
    Pending,
    /// Latest intermediate value.
    Partial(String),
    /// Closed with a payload.
    Final(String),
    /// Closed without a payload.
    Done,
}

impl StreamValue {
    /// Whether the stream has been closed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Final(_) | Self::Done)
    }

    /// The carried string, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Partial(v) | Self::Final(v) => Some(v),
            Self::Pending | Self::Done => None,
        }
    }
}

/// Create a linked writer/reader pair.
pub fn streamable_value() -> (StreamWriter, StreamableValue) {
    let (tx, rx) = watch::channel(StreamValue::Pending);
    (StreamWriter { tx: Some(tx) }, StreamableValue { rx })
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer
// ─────────────────────────────────────────────────────────────────────────────

/// Producer half of a streamable value.
#[derive(Debug)]
pub struct StreamWriter {
    tx: Option<watch::Sender<StreamValue>>,
}

impl StreamWriter {
    /// Publish an intermediate value.
    pub fn update(&self, value: impl Into<String>) {
        if let Some(tx) = &self.tx {
            tx.send_replace(StreamValue::Partial(value.into()));
        }
    }

    /// Close the stream with a final payload, or with `Done` when `None`.
    pub fn done(mut self, value: Option<String>) {
        self.close(value.map_or(StreamValue::Done, StreamValue::Final));
    }

    fn close(&mut self, terminal: StreamValue) {
        if let Some(tx) = self.tx.take() {
            tx.send_replace(terminal);
        }
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::warn!("Stream writer dropped without being closed, closing with done");
            self.close(StreamValue::Done);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

/// Consumer half of a streamable value. Cheap to clone.
#[derive(Clone)]
pub struct StreamableValue {
    rx: watch::Receiver<StreamValue>,
}

impl StreamableValue {
    /// The latest published value.
    pub fn current(&self) -> StreamValue {
        self.rx.borrow().clone()
    }

    /// Whether the writer has closed the stream.
    pub fn is_closed(&self) -> bool {
        self.rx.borrow().is_terminal()
    }

    /// Wait until the stream is closed and return the terminal value.
    pub async fn closed(&self) -> StreamValue {
        let mut rx = self.rx.clone();
        let terminal = rx
            .wait_for(StreamValue::is_terminal)
            .await
            .map(|value| (*value).clone());
        match terminal {
            Ok(value) => value,
            Err(_) => rx.borrow().clone(),
        }
    }
}

impl std::fmt::Debug for StreamableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamableValue")
            .field("current", &*self.rx.borrow())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
