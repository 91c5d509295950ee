//! Run command implementation

use crate::config::Config;
use crate::notify::{LogNotifier, NotificationGate, Notifier, SentLedger, TelegramNotifier};
use crate::provider::ProviderSet;
use crate::scanner::Scanner;
use crate::symbols::load_symbol_universe;
use crate::worker::Worker;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Send alerts from the first cycle instead of only recording them
    #[arg(long)]
    pub no_seed: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let symbols = load_symbol_universe(&config.symbols)?;
        if symbols.is_empty() {
            tracing::warn!(
                bist = %config.symbols.bist_list_path.display(),
                midas = %config.symbols.midas_list_path.display(),
                "No symbols loaded"
            );
        }

        let providers = ProviderSet::from_config(&config.providers)?;
        let scanner = Arc::new(Scanner::new(providers, config.divergence()));

        let notifier: Arc<dyn Notifier> = match config.notifier.telegram_credentials() {
            Some((token, chat_id)) => Arc::new(TelegramNotifier::new(
                token,
                chat_id,
                Duration::from_secs_f64(config.providers.request_timeout_secs),
            )?),
            None => {
                tracing::warn!("Telegram credentials missing, alerts will only be logged");
                Arc::new(LogNotifier)
            }
        };
        let ledger = SentLedger::open(&config.notifier.state_dir).await?;
        tracing::info!(path = %ledger.path().display(), entries = ledger.len(), "Sent ledger ready");
        let gate = Arc::new(NotificationGate::new(ledger, notifier));

        let mut scanner_config = config.scanner.clone();
        if self.no_seed {
            scanner_config.seed_on_first_cycle = false;
        }
        let deliver_first = !scanner_config.seed_on_first_cycle;
        let worker = Worker::new(scanner_config, symbols, scanner, gate);

        if self.once {
            let report = worker.run_cycle(deliver_first).await;
            tracing::info!(?report, "Single cycle finished");
            return Ok(());
        }
        worker.run().await
    }
}
