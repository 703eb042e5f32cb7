//! Single-line user status channel
//!
//! Holds only the latest message. Each `set` overwrites the previous line;
//! no history is retained.

use tokio::sync::watch;

#[derive(Clone)]
pub struct StatusLine {
    tx: watch::Sender<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(String::new());
        Self { tx }
    }

    /// Overwrite the status line
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(status = %message, "Status updated");
        self.tx.send_replace(message);
    }

    /// Current status text
    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every overwrite
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}
