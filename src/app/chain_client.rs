use crate::{
    Result,
    events::{
        BetEvent,
        ChainEvent,
        EventKind,
        NewBetEvent,
        RoundEndedLog,
        Side,
    },
    network::ContractName,
};
use alloy_primitives::{
    Address,
    U256,
};
use tokio::sync::mpsc;

/// Read-only window onto the deployed game contracts.
///
/// Everything the crate knows about the chain flows through this port; the
/// actual RPC transport lives outside the crate. All calls are suspension
/// points: failures surface as errors and never as fabricated data.
pub trait ChainClient {
    /// Id of the in-progress (unresolved) round.
    fn current_round(&self) -> impl Future<Output = Result<u64>>;

    /// Whether the game sits in the between-rounds gap where no betting is
    /// possible and the next round can be started.
    fn can_continue(&self) -> impl Future<Output = Result<bool>>;

    /// Unix timestamp after which the current round may be resolved.
    fn ends_after(&self) -> impl Future<Output = Result<u64>>;

    fn block_number(&self) -> impl Future<Output = Result<u64>>;

    /// `RoundEnded` logs in the inclusive block range.
    fn round_ended_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> impl Future<Output = Result<Vec<RoundEndedLog>>>;

    /// `NewBet` logs filtered to one player in the inclusive block range.
    fn new_bet_logs(
        &self,
        player: Address,
        from_block: u64,
        to_block: u64,
    ) -> impl Future<Output = Result<Vec<NewBetEvent>>>;

    /// `Bet` logs on the current round's pot contract, filtered by side and
    /// round, oldest first.
    fn booty_bet_logs(
        &self,
        side: Side,
        round: u64,
        from_block: u64,
        to_block: u64,
    ) -> impl Future<Output = Result<Vec<BetEvent>>>;

    fn total_green(&self) -> impl Future<Output = Result<U256>>;

    fn total_blue(&self) -> impl Future<Output = Result<U256>>;

    /// Attach a push feed of decoded events of one kind on one contract.
    ///
    /// Callers go through the subscription registry rather than calling this
    /// directly, so each (contract, network, event) key is attached at most
    /// once per process.
    fn subscribe(
        &self,
        contract: ContractName,
        event: EventKind,
    ) -> impl Future<Output = Result<mpsc::Receiver<ChainEvent>>>;
}
