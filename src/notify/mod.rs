//! Notification module
//!
//! Formats divergence alerts, suppresses duplicates through a durable
//! ledger, and delivers through Telegram

mod gate;
mod ledger;
mod message;
mod telegram;

pub use gate::NotificationGate;
pub use ledger::{LedgerError, SentLedger, LEDGER_FILE};
pub use message::{dedup_key, format_signal_message};
pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Transport answered with a non-success status
    #[error("Notifier rejected message: {status} - {body}")]
    Rejected { status: u16, body: String },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Trait for notification transports
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Notifier that only logs, used when no transport is configured
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        tracing::info!(message = %text, "Notification (no transport configured)");
        Ok(())
    }
}
