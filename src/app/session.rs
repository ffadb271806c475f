use crate::network::Network;
use alloy_primitives::Address;
use std::sync::{
    Arc,
    Mutex,
};

/// Session-scoped wallet context shared between the page assembler and the
/// live aggregator.
///
/// This replaces ambient "currently selected address" state: every component
/// holds a clone of the handle, captures the account before a fetch, and
/// compares against the handle again before applying the result. There is no
/// cancellation primitive; a switched account simply makes the late check
/// discard the completed fetch.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

struct SessionState {
    account: Option<Address>,
    network: Network,
}

impl Session {
    pub fn new(network: Network) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                account: None,
                network,
            })),
        }
    }

    pub fn with_account(network: Network, account: Address) -> Self {
        let session = Self::new(network);
        session.set_account(Some(account));
        session
    }

    pub fn current_account(&self) -> Option<Address> {
        self.inner.lock().unwrap().account
    }

    /// Wallet connected, disconnected or switched.
    pub fn set_account(&self, account: Option<Address>) {
        self.inner.lock().unwrap().account = account;
    }

    pub fn network(&self) -> Network {
        self.inner.lock().unwrap().network
    }

    pub fn set_network(&self, network: Network) {
        self.inner.lock().unwrap().network = network;
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn session__clones_share_the_same_account() {
        // given
        let session = Session::new(Network::Local);
        let observer = session.clone();
        let account = Address::from([7u8; 20]);

        // when
        session.set_account(Some(account));

        // then
        assert_eq!(observer.current_account(), Some(account));

        // when
        session.set_account(None);

        // then
        assert_eq!(observer.current_account(), None);
    }
}
