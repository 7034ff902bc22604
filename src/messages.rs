//! The host's transient, user-facing message queue.
//!
//! Plugins put short status messages here (for example the outcome of a
//! test send); the host drains the receiving end and shows them to the
//! user.

use tokio::sync::mpsc;
use tracing::debug;

/// Sending half of the system message queue, handed to plugins.
#[derive(Clone)]
pub struct SystemMessages {
    tx: mpsc::UnboundedSender<String>,
}

impl SystemMessages {
    /// Creates the queue, returning the plugin-facing half and the host's
    /// receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queues a message for the user. Messages are transient: if the host
    /// side is gone, the message is dropped.
    pub fn put(&self, text: impl Into<String>) {
        let text = text.into();
        if self.tx.send(text).is_err() {
            debug!("System message queue closed, dropping message");
        }
    }
}
