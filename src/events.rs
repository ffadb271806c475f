use alloy_primitives::{
    Address,
    B256,
    U256,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Sentinel account used for cache keys when no wallet is connected.
pub const ANONYMOUS_ACCOUNT: Address = Address::ZERO;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Copy, Clone, Serialize, Deserialize)]
pub enum Side {
    Blue,
    Green,
}

impl Side {
    /// The on-chain encoding: blue is side `0`, green is side `1`.
    pub fn from_chain(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Side::Blue),
            1 => Some(Side::Green),
            _ => None,
        }
    }

    /// The house's published fairness rule: even randomness pays out blue,
    /// odd pays out green.
    pub fn winning(randomness: U256) -> Self {
        if randomness.bit(0) {
            Side::Green
        } else {
            Side::Blue
        }
    }
}

/// Kinds of log events the crate subscribes to or queries, used as the
/// filter-identity part of a subscription key.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub enum EventKind {
    NewBet,
    RoundStarted,
    RoundEnded,
    Bet,
}

#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub enum ChainEvent {
    NewBet(NewBetEvent),
    RoundStarted(RoundStartedEvent),
    RoundEnded(RoundEndedEvent),
}

/// A wager recorded by the history contract.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct NewBetEvent {
    pub round: u64,
    pub side: Side,
    pub player: Address,
    pub amount: U256,
}

#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundStartedEvent {
    pub round: u64,
    pub ends_after: u64,
}

/// Resolution of a round: the randomness draw and the pot split inputs.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundEndedEvent {
    pub round: u64,
    pub randomness: U256,
    pub total_booty: U256,
    pub total_winners: U256,
}

/// A `RoundEnded` log as returned by a block-range query, carrying the
/// transaction hash the record is keyed to.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct RoundEndedLog {
    pub event: RoundEndedEvent,
    pub transaction_hash: B256,
}

/// A `Bet` log from the current round's pot contract.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct BetEvent {
    pub player: Address,
    pub amount: U256,
    pub side: Side,
    pub round: u64,
}

/// One entry in a live, unresolved-round bet list. Equality is on the whole
/// `(address, amount)` pair: repeat bets from the same address are legitimate
/// as long as the amounts differ.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct LiveBet {
    pub address: Address,
    pub amount: U256,
}

impl From<&BetEvent> for LiveBet {
    fn from(event: &BetEvent) -> Self {
        LiveBet {
            address: event.player,
            amount: event.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn winning__even_randomness__pays_blue() {
        assert_eq!(Side::winning(U256::from(10u64)), Side::Blue);
        assert_eq!(Side::winning(U256::ZERO), Side::Blue);
    }

    #[test]
    fn winning__odd_randomness__pays_green() {
        assert_eq!(Side::winning(U256::from(7u64)), Side::Green);
        assert_eq!(Side::winning(U256::from(1u64)), Side::Green);
    }

    #[test]
    fn from_chain__rejects_unknown_side() {
        assert_eq!(Side::from_chain(0), Some(Side::Blue));
        assert_eq!(Side::from_chain(1), Some(Side::Green));
        assert_eq!(Side::from_chain(2), None);
    }
}
