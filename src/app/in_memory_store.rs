use crate::{
    app::record_store::RecordStore,
    records::{
        BlockRange,
        RoundRecord,
    },
};
use alloy_primitives::Address;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};

/// Hash-map record store for tests and ephemeral sessions. Clones share the
/// same underlying state so tests can observe writes from outside.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    block_ranges: Arc<Mutex<HashMap<Address, BlockRange>>>,
    round_records: Arc<Mutex<HashMap<(Address, u64), RoundRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn block_range(&self, account: &Address) -> crate::Result<Option<BlockRange>> {
        let guard = self.block_ranges.lock().unwrap();
        Ok(guard.get(account).copied())
    }

    fn save_block_range(
        &mut self,
        account: &Address,
        fetched: BlockRange,
    ) -> crate::Result<()> {
        let mut guard = self.block_ranges.lock().unwrap();
        let merged = match guard.get(account) {
            Some(existing) => existing.union(fetched),
            None => fetched,
        };
        guard.insert(*account, merged);
        Ok(())
    }

    fn round_record(
        &self,
        account: &Address,
        round: u64,
    ) -> crate::Result<Option<RoundRecord>> {
        let guard = self.round_records.lock().unwrap();
        Ok(guard.get(&(*account, round)).cloned())
    }

    fn save_round_record(
        &mut self,
        account: &Address,
        record: &RoundRecord,
    ) -> crate::Result<()> {
        let mut guard = self.round_records.lock().unwrap();
        let key = (*account, record.round);
        if let Some(existing) = guard.get(&key) {
            if !record.supersedes(existing) {
                return Ok(());
            }
        }
        guard.insert(key, record.clone());
        Ok(())
    }

    fn round_records_between(
        &self,
        account: &Address,
        from: u64,
        to: u64,
    ) -> crate::Result<Vec<RoundRecord>> {
        let guard = self.round_records.lock().unwrap();
        let mut records: Vec<RoundRecord> = guard
            .iter()
            .filter(|((acct, round), _)| acct == account && *round >= from && *round <= to)
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by_key(|record| record.round);
        Ok(records)
    }
}
