use crate::{
    Result,
    app::chain_client::ChainClient,
    events::{
        ChainEvent,
        EventKind,
    },
    network::{
        ContractName,
        Network,
    },
};
use std::collections::HashSet;
use tokio::sync::mpsc;

/// Identity of one event feed: at most one attachment per key for the
/// process lifetime.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct SubscriptionKey {
    pub contract: ContractName,
    pub network: Network,
    pub event: EventKind,
}

impl SubscriptionKey {
    pub fn new(contract: ContractName, network: Network, event: EventKind) -> Self {
        Self {
            contract,
            network,
            event,
        }
    }
}

pub enum SubscribeOutcome {
    /// First registration for the key; the caller owns the feed.
    Attached(mpsc::Receiver<ChainEvent>),
    /// The key is already live; re-registration is a no-op.
    AlreadyAttached,
}

/// Tracks which event feeds are live. Keys are never released: the set of
/// event kinds is small and fixed, so feeds live as long as the process.
#[derive(Default)]
pub struct SubscriptionRegistry {
    active: HashSet<SubscriptionKey>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the feed on first call per key; later calls are no-ops.
    /// A failed attach leaves the key unmarked so it can be retried.
    pub async fn subscribe_once<C: ChainClient>(
        &mut self,
        chain: &C,
        key: SubscriptionKey,
    ) -> Result<SubscribeOutcome> {
        if self.active.contains(&key) {
            tracing::debug!(?key, "subscription already active");
            return Ok(SubscribeOutcome::AlreadyAttached);
        }
        let receiver = chain.subscribe(key.contract, key.event).await?;
        self.active.insert(key);
        tracing::info!(?key, "subscribed to event feed");
        Ok(SubscribeOutcome::Attached(receiver))
    }

    pub fn is_active(&self, key: &SubscriptionKey) -> bool {
        self.active.contains(key)
    }
}
