//! Send-if-new over a durable ledger

use super::{Notifier, NotifyError, SentLedger};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Delivers each dedup key at most once, across restarts.
///
/// The ledger check, the delivery and the ledger update happen under one
/// lock, so concurrent callers cannot both send the same key.
pub struct NotificationGate {
    ledger: Mutex<SentLedger>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationGate {
    pub fn new(ledger: SentLedger, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            notifier,
        }
    }

    /// Returns true when the key was new and is now recorded.
    ///
    /// With `deliver` false the key is recorded without sending, which is
    /// how the first cycle seeds the ledger. A failed delivery leaves the key
    /// unrecorded so a later cycle can retry it. Once sent, the key stays
    /// recorded even if the ledger write fails; that error is returned.
    pub async fn notify_if_new(
        &self,
        key: &str,
        message: &str,
        deliver: bool,
    ) -> Result<bool, NotifyError> {
        let mut ledger = self.ledger.lock().await;
        if ledger.contains(key) {
            return Ok(false);
        }
        if deliver {
            self.notifier.send(message).await?;
        }
        ledger.insert_and_persist(key, message).await?;
        Ok(true)
    }

    pub async fn recorded(&self) -> usize {
        self.ledger.lock().await.len()
    }
}
