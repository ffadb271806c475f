// Sled-backed persistence for block-range bookmarks and round settlements.
use crate::{
    app::record_store::RecordStore,
    records::{
        BlockRange,
        RoundRecord,
    },
};
use alloy_primitives::Address;
use anyhow::Context;
use serde::{
    Serialize,
    de::DeserializeOwned,
};
use sled::{
    Config,
    Db,
    Tree,
};
use std::path::Path;

#[derive(Clone)]
pub struct SledRecordStore {
    block_ranges: Tree,
    round_records: Tree,
}

impl SledRecordStore {
    pub fn new(db: &Db) -> crate::Result<Self> {
        let block_ranges = db
            .open_tree("block_ranges")
            .context("open block_ranges tree")?;
        let round_records = db
            .open_tree("round_records")
            .context("open round_records tree")?;
        Ok(Self {
            block_ranges,
            round_records,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let config = Config::default().path(path);
        let db = config.open().context("open sled database")?;
        Self::new(&db)
    }

    fn account_key(account: &Address) -> Vec<u8> {
        account.to_string().into_bytes()
    }

    // Rounds are zero-padded so lexicographic key order matches numeric
    // round order within one account's prefix.
    fn round_key(account: &Address, round: u64) -> Vec<u8> {
        format!("{account}|{round:020}").into_bytes()
    }

    fn serialize_record<T: Serialize>(value: &T, label: &str) -> crate::Result<Vec<u8>> {
        serde_json::to_vec(value).with_context(|| format!("serialize {label}"))
    }
}

impl RecordStore for SledRecordStore {
    fn block_range(&self, account: &Address) -> crate::Result<Option<BlockRange>> {
        let value = match self.block_ranges.get(Self::account_key(account))? {
            Some(value) => value,
            None => return Ok(None),
        };
        let range = deserialize::<BlockRange>(value.as_ref())?;
        Ok(Some(range))
    }

    fn save_block_range(
        &mut self,
        account: &Address,
        fetched: BlockRange,
    ) -> crate::Result<()> {
        let merged = match self.block_range(account)? {
            Some(existing) => existing.union(fetched),
            None => fetched,
        };
        let bytes = Self::serialize_record(&merged, "block range")?;
        self.block_ranges
            .insert(Self::account_key(account), bytes)
            .context("persist block range")?;
        self.block_ranges.flush().context("flush block ranges")?;
        Ok(())
    }

    fn round_record(
        &self,
        account: &Address,
        round: u64,
    ) -> crate::Result<Option<RoundRecord>> {
        let value = match self.round_records.get(Self::round_key(account, round))? {
            Some(value) => value,
            None => return Ok(None),
        };
        let record = deserialize::<RoundRecord>(value.as_ref())?;
        Ok(Some(record))
    }

    fn save_round_record(
        &mut self,
        account: &Address,
        record: &RoundRecord,
    ) -> crate::Result<()> {
        if let Some(existing) = self.round_record(account, record.round)? {
            if !record.supersedes(&existing) {
                return Ok(());
            }
        }
        let bytes = Self::serialize_record(record, "round record")?;
        self.round_records
            .insert(Self::round_key(account, record.round), bytes)
            .context("persist round record")?;
        self.round_records.flush().context("flush round records")?;
        Ok(())
    }

    fn round_records_between(
        &self,
        account: &Address,
        from: u64,
        to: u64,
    ) -> crate::Result<Vec<RoundRecord>> {
        let start = Self::round_key(account, from);
        let end = Self::round_key(account, to);
        let mut records = Vec::new();
        for entry in self.round_records.range(start..=end) {
            let (_, value) = entry.context("iterate round records")?;
            records.push(deserialize::<RoundRecord>(value.as_ref())?);
        }
        Ok(records)
    }
}

fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> crate::Result<T> {
    serde_json::from_slice(bytes).context("deserialize sled record")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::SledRecordStore;
    use crate::{
        app::record_store::RecordStore,
        events::Side,
        records::{
            BlockRange,
            RoundRecord,
        },
    };
    use alloy_primitives::{
        Address,
        B256,
        I256,
        U256,
    };
    use tempdir::TempDir;

    fn store(temp_dir: &TempDir) -> SledRecordStore {
        SledRecordStore::open(temp_dir.path()).expect("open sled store")
    }

    fn record(round: u64, stake: Option<i64>) -> RoundRecord {
        RoundRecord {
            round,
            transaction_hash: B256::from([round as u8; 32]),
            result: U256::from(10u64),
            total_booty: U256::from(100u64),
            total_winners: U256::from(10u64),
            my_bet_side: stake.map(|_| Side::Blue),
            my_bet_amount: stake.map(|s| I256::try_from(s).unwrap()),
        }
    }

    #[test]
    fn save_block_range__grows_by_monotonic_union() {
        // given
        let temp_dir = TempDir::new("sled_record_store").unwrap();
        let mut store = store(&temp_dir);
        let account = Address::from([1u8; 20]);

        // when
        store
            .save_block_range(&account, BlockRange::new(100, 200))
            .unwrap();
        store
            .save_block_range(&account, BlockRange::new(50, 80))
            .unwrap();
        store
            .save_block_range(&account, BlockRange::new(150, 260))
            .unwrap();

        // then
        let range = store.block_range(&account).unwrap().unwrap();
        assert_eq!(range, BlockRange::new(50, 260));
    }

    #[test]
    fn block_range__unknown_account_is_none() {
        let temp_dir = TempDir::new("sled_record_store_empty").unwrap();
        let store = store(&temp_dir);
        assert!(
            store
                .block_range(&Address::from([9u8; 20]))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn save_round_record__staked_record_survives_null_rewrite() {
        // given
        let temp_dir = TempDir::new("sled_record_store_upgrade").unwrap();
        let mut store = store(&temp_dir);
        let account = Address::from([2u8; 20]);

        // when: staked first, null placeholder second
        store.save_round_record(&account, &record(7, Some(500))).unwrap();
        store.save_round_record(&account, &record(7, None)).unwrap();

        // then
        let stored = store.round_record(&account, 7).unwrap().unwrap();
        assert_eq!(stored.my_bet_amount, Some(I256::try_from(500i64).unwrap()));

        // when: arrival order reversed for another round
        store.save_round_record(&account, &record(8, None)).unwrap();
        store.save_round_record(&account, &record(8, Some(-30))).unwrap();

        // then: the staked record wins either way
        let stored = store.round_record(&account, 8).unwrap().unwrap();
        assert_eq!(stored.my_bet_amount, Some(I256::try_from(-30i64).unwrap()));
    }

    #[test]
    fn round_records_between__returns_window_ascending_per_account() {
        // given
        let temp_dir = TempDir::new("sled_record_store_range").unwrap();
        let mut store = store(&temp_dir);
        let account = Address::from([3u8; 20]);
        let other = Address::from([4u8; 20]);

        for round in [5u64, 12, 9, 30] {
            store.save_round_record(&account, &record(round, None)).unwrap();
        }
        store.save_round_record(&other, &record(10, Some(1))).unwrap();

        // when
        let rows = store.round_records_between(&account, 6, 29).unwrap();

        // then
        let rounds: Vec<u64> = rows.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![9, 12]);
        assert!(rows.iter().all(|r| r.my_bet_amount.is_none()));
    }
}
