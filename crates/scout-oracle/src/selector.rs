//! Credential selection across a pool of equivalent chat clients.
//!
//! Selection only spreads load across API keys; every client talks to the
//! same provider and model, so the choice never changes a ranking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scout_core::{AppConfig, SelectorKind};

use crate::client::ChatClient;
use crate::error::OracleError;

pub trait ClientSelector: Send + Sync {
    /// Index into a pool of `pool_size` clients for a request asking for
    /// `n` results. `pool_size` is never zero.
    fn select(&self, n: usize, pool_size: usize) -> usize;
}

/// Even `n` goes to the first client, odd `n` to the second.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParitySelector;

impl ClientSelector for ParitySelector {
    fn select(&self, n: usize, pool_size: usize) -> usize {
        if pool_size < 2 {
            0
        } else {
            n % 2
        }
    }
}

/// Rotates through the pool on every call, ignoring `n`.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl ClientSelector for RoundRobinSelector {
    fn select(&self, _n: usize, pool_size: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % pool_size.max(1)
    }
}

#[must_use]
pub fn selector_for(kind: SelectorKind) -> Arc<dyn ClientSelector> {
    match kind {
        SelectorKind::Parity => Arc::new(ParitySelector),
        SelectorKind::RoundRobin => Arc::new(RoundRobinSelector::default()),
    }
}

/// A non-empty set of credentialed clients plus the rule for choosing one.
pub struct ClientPool {
    clients: Vec<ChatClient>,
    selector: Arc<dyn ClientSelector>,
}

impl ClientPool {
    /// # Errors
    ///
    /// Returns [`OracleError::EmptyPool`] if `clients` is empty.
    pub fn new(
        clients: Vec<ChatClient>,
        selector: Arc<dyn ClientSelector>,
    ) -> Result<Self, OracleError> {
        if clients.is_empty() {
            return Err(OracleError::EmptyPool);
        }
        Ok(Self { clients, selector })
    }

    /// Builds one client per configured API key.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if a client cannot be constructed or no keys
    /// are configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, OracleError> {
        let clients = config
            .oracle_api_keys
            .iter()
            .map(|key| {
                ChatClient::with_base_url(
                    key,
                    config.oracle_timeout_secs,
                    &config.user_agent,
                    &config.oracle_base_url,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(clients, selector_for(config.oracle_selector))
    }

    /// The client the selector picks for a request asking for `n` results.
    #[must_use]
    pub fn client_for(&self, n: usize) -> &ChatClient {
        let index = self.selector.select(n, self.clients.len()) % self.clients.len();
        &self.clients[index]
    }

    /// The first client; used for vision calls.
    #[must_use]
    pub fn primary(&self) -> &ChatClient {
        &self.clients[0]
    }
}
