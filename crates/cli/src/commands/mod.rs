//! Cart session shared by every subcommand.

pub mod show;

use rocketshoes_cart::{
    ApiClient, CartConfig, CartError, CartNotice, CartStore, ChannelNotifier, ConfigError,
    FileStore,
};
use rocketshoes_core::CurrencyCode;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The cart operation was rejected or failed; details were already logged.
    #[error("{} cart notice(s) raised", .0.len())]
    Rejected(Vec<CartNotice>),
}

/// An opened cart plus the notices it raises.
pub struct Session {
    pub store: CartStore<ApiClient, FileStore, ChannelNotifier>,
    notices: broadcast::Receiver<CartNotice>,
    currency: CurrencyCode,
}

impl Session {
    /// Load config from the environment and open the cart.
    pub async fn open() -> Result<Self, CliError> {
        let config = CartConfig::from_env()?;
        tracing::debug!(?config, "Loaded configuration");

        let notifier = ChannelNotifier::default();
        let notices = notifier.subscribe();
        let store = CartStore::from_config(&config, notifier).await?;

        Ok(Self {
            store,
            notices,
            currency: config.currency,
        })
    }

    /// Log the cart, then fail if any notice was raised.
    pub fn finish(mut self) -> Result<(), CliError> {
        show::log_cart(&self.store.cart(), self.currency);

        let notices = drain(&mut self.notices);
        if notices.is_empty() {
            return Ok(());
        }
        for notice in &notices {
            tracing::error!(product_id = %notice.product_id, detail = %notice.detail, "{notice}");
        }
        Err(CliError::Rejected(notices))
    }
}

fn drain(rx: &mut broadcast::Receiver<CartNotice>) -> Vec<CartNotice> {
    let mut notices = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notice) => notices.push(notice),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Some cart notices were dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    notices
}
