use crate::events::Side;
use alloy_primitives::{
    B256,
    I256,
    U256,
};
use serde::{
    Deserialize,
    Serialize,
};

/// The inclusive span of chain history already synchronized for one account.
///
/// A range only ever grows through [`BlockRange::union`]; nothing shrinks it
/// and no gap is re-introduced once closed. The default `(0, 0)` stands for
/// "nothing cached yet".
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct BlockRange {
    pub first_block: u64,
    pub last_block: u64,
}

impl BlockRange {
    pub fn new(first_block: u64, last_block: u64) -> Self {
        Self {
            first_block,
            last_block,
        }
    }

    /// Monotonic union: min of firsts, max of lasts.
    pub fn union(self, other: BlockRange) -> Self {
        Self {
            first_block: self.first_block.min(other.first_block),
            last_block: self.last_block.max(other.last_block),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_block == 0 && self.last_block == 0
    }
}

/// One account's settled view of a resolved round, keyed by (account, round).
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u64,
    pub transaction_hash: B256,
    pub result: U256,
    pub total_booty: U256,
    pub total_winners: U256,
    pub my_bet_side: Option<Side>,
    pub my_bet_amount: Option<I256>,
}

impl RoundRecord {
    /// Whether this record may replace `existing` in the store.
    ///
    /// A resolved-with-stake record is authoritative over a
    /// resolved-without-stake placeholder; the upgrade is one-directional and
    /// a staked record is never downgraded back to null.
    pub fn supersedes(&self, existing: &RoundRecord) -> bool {
        existing.my_bet_amount.is_none()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use proptest::prelude::*;

    fn staked_record(round: u64, amount: i64) -> RoundRecord {
        RoundRecord {
            round,
            transaction_hash: B256::from([1u8; 32]),
            result: U256::from(10u64),
            total_booty: U256::from(100u64),
            total_winners: U256::from(10u64),
            my_bet_side: Some(Side::Blue),
            my_bet_amount: Some(I256::try_from(amount).unwrap()),
        }
    }

    fn null_record(round: u64) -> RoundRecord {
        RoundRecord {
            my_bet_side: None,
            my_bet_amount: None,
            ..staked_record(round, 0)
        }
    }

    #[test]
    fn union__extends_in_both_directions() {
        // given
        let cached = BlockRange::new(100, 200);

        // when
        let forward = cached.union(BlockRange::new(201, 250));
        let backward = cached.union(BlockRange::new(50, 99));

        // then
        assert_eq!(forward, BlockRange::new(100, 250));
        assert_eq!(backward, BlockRange::new(50, 200));
    }

    #[test]
    fn supersedes__staked_replaces_null_but_not_vice_versa() {
        let staked = staked_record(7, 500);
        let null = null_record(7);

        assert!(staked.supersedes(&null));
        assert!(!null.supersedes(&staked));
        assert!(!staked_record(7, 1).supersedes(&staked));
    }

    proptest! {
        #[test]
        fn union__never_shrinks_over_any_sequence(
            ranges in prop::collection::vec((0u64..100_000, 0u64..100_000), 1..40)
        ) {
            let mut cached = BlockRange::default();
            let mut covered: Vec<BlockRange> = Vec::new();

            for (a, b) in ranges {
                let incoming = BlockRange::new(a.min(b), a.max(b));
                covered.push(incoming);
                let next = cached.union(incoming);

                // never shrinks
                prop_assert!(next.first_block <= cached.first_block);
                prop_assert!(next.last_block >= cached.last_block);
                cached = next;

                // never drops a previously covered sub-range
                for range in &covered {
                    prop_assert!(cached.first_block <= range.first_block);
                    prop_assert!(cached.last_block >= range.last_block);
                }
            }
        }
    }
}
