use crate::records::{
    BlockRange,
    RoundRecord,
};
use alloy_primitives::Address;

/// Durable per-account state: block-range bookmarks and round settlements.
///
/// Both tables are keyed by the account (the anonymous sentinel when no
/// wallet is connected), so re-running a sync is naturally idempotent.
pub trait RecordStore {
    /// Cached range for the account, if any fetch ever completed.
    fn block_range(&self, account: &Address) -> crate::Result<Option<BlockRange>>;

    /// Record a successfully fetched range. The stored value is the monotonic
    /// union of the old and new ranges; it never shrinks.
    fn save_block_range(
        &mut self,
        account: &Address,
        fetched: BlockRange,
    ) -> crate::Result<()>;

    fn round_record(
        &self,
        account: &Address,
        round: u64,
    ) -> crate::Result<Option<RoundRecord>>;

    /// Persist a settled round. First write creates the record; later writes
    /// only replace a null-staked placeholder, never a staked record.
    fn save_round_record(
        &mut self,
        account: &Address,
        record: &RoundRecord,
    ) -> crate::Result<()>;

    /// All cached records for the account with `from <= round <= to`,
    /// ascending by round.
    fn round_records_between(
        &self,
        account: &Address,
        from: u64,
        to: u64,
    ) -> crate::Result<Vec<RoundRecord>>;
}
