use crate::records::{
    BlockRange,
    RoundRecord,
};
use std::collections::BTreeMap;

pub const BLOCKS_PER_DAY: u64 = 6_600;
pub const BLOCKS_PER_PAGE: u64 = 6 * BLOCKS_PER_DAY;

/// Instructions for filling the cache gap of one requested page.
///
/// When `needs_fetch` is false the plan carries the cached bounds, so saving
/// it back is a no-op union.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct FetchPlan {
    pub from_block: u64,
    pub to_block: u64,
    pub needs_fetch: bool,
}

/// Compute the single contiguous block gap that must be fetched to cover
/// `page`, given what is already cached.
///
/// The cache is assumed to be one contiguous interval abutting the chain head
/// or extending backward from it; disjoint cached islands are not supported,
/// so at most one gap exists per call. A gap above the cache (new blocks
/// arrived) wins over a gap below it (user paged further into history).
pub fn plan_fetch(page: u32, current_block: u64, cached: &BlockRange) -> FetchPlan {
    let reach = u64::from(page) * BLOCKS_PER_PAGE;
    let from_block = current_block.saturating_sub(reach);
    let to_block = (from_block + BLOCKS_PER_PAGE).min(current_block);

    if to_block > cached.last_block {
        FetchPlan {
            from_block: cached.last_block + 1,
            to_block,
            needs_fetch: true,
        }
    } else if from_block < cached.first_block {
        FetchPlan {
            from_block,
            to_block: cached.first_block - 1,
            needs_fetch: true,
        }
    } else {
        FetchPlan {
            from_block: cached.first_block,
            to_block: cached.last_block,
            needs_fetch: false,
        }
    }
}

/// Inclusive round-number window `[from, to]` shown on `page`, newest rounds
/// on page 1. `None` when the page lies entirely before round zero.
pub fn round_window(current_round: u64, page: u32, per_page: u64) -> Option<(u64, u64)> {
    let first_slot = u64::from(page.saturating_sub(1)) * per_page + 1;
    let last_slot = first_slot + per_page - 1;

    let to = current_round.checked_sub(first_slot)?;
    let from = current_round.saturating_sub(last_slot);
    Some((from, to))
}

/// Round span the cache is consulted for: everything from the page's furthest
/// reach up to the current round, so earlier pages' rows can participate in
/// the merge.
pub fn cache_window(current_round: u64, page: u32, per_page: u64) -> (u64, u64) {
    let reach = u64::from(page) * per_page;
    (current_round.saturating_sub(reach), current_round)
}

/// Combine cached and freshly computed records into the page result: filter
/// to the round window, deduplicate by round keeping the last-seen value
/// (fresh rows follow cached ones), ascending by round. Callers reverse for
/// newest-first display.
pub fn merge_page(
    cached: Vec<RoundRecord>,
    fresh: Vec<RoundRecord>,
    window: (u64, u64),
) -> Vec<RoundRecord> {
    let (from, to) = window;
    let mut by_round: BTreeMap<u64, RoundRecord> = BTreeMap::new();
    for record in cached.into_iter().chain(fresh) {
        if record.round >= from && record.round <= to {
            by_round.insert(record.round, record);
        }
    }
    by_round.into_values().collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use alloy_primitives::{
        B256,
        U256,
    };

    fn record(round: u64, tx_byte: u8) -> RoundRecord {
        RoundRecord {
            round,
            transaction_hash: B256::from([tx_byte; 32]),
            result: U256::from(2u64),
            total_booty: U256::ZERO,
            total_winners: U256::ZERO,
            my_bet_side: None,
            my_bet_amount: None,
        }
    }

    #[test]
    fn plan_fetch__empty_cache__fetches_whole_page_window_from_block_one() {
        // given
        let cached = BlockRange::default();

        // when
        let plan = plan_fetch(1, 100_000, &cached);

        // then
        assert_eq!(
            plan,
            FetchPlan {
                from_block: 1,
                to_block: 100_000,
                needs_fetch: true,
            }
        );
    }

    #[test]
    fn plan_fetch__page_inside_cache__no_fetch_needed() {
        // given: cache already covers the page window
        let cached = BlockRange::new(100_000 - 2 * BLOCKS_PER_PAGE, 100_000);

        // when
        let plan = plan_fetch(2, 100_000, &cached);

        // then
        assert!(!plan.needs_fetch);
        assert_eq!(plan.from_block, cached.first_block);
        assert_eq!(plan.to_block, cached.last_block);
    }

    #[test]
    fn plan_fetch__chain_moved_past_cache__gap_starts_right_after_cached_top() {
        // given
        let cached = BlockRange::new(50_000, 90_000);

        // when: new blocks arrived since the last sync
        let plan = plan_fetch(1, 95_000, &cached);

        // then
        assert_eq!(
            plan,
            FetchPlan {
                from_block: 90_001,
                to_block: 95_000,
                needs_fetch: true,
            }
        );
    }

    #[test]
    fn plan_fetch__paging_back_past_cache__gap_ends_right_below_cached_bottom() {
        // given: cache covers the first page only
        let current_block = 200_000;
        let cached = BlockRange::new(current_block - BLOCKS_PER_PAGE, current_block);

        // when
        let plan = plan_fetch(2, current_block, &cached);

        // then
        assert_eq!(
            plan,
            FetchPlan {
                from_block: current_block - 2 * BLOCKS_PER_PAGE,
                to_block: cached.first_block - 1,
                needs_fetch: true,
            }
        );
    }

    #[test]
    fn plan_fetch__window_clamps_at_genesis() {
        // given: a young chain shorter than one page of blocks
        let cached = BlockRange::default();

        // when
        let plan = plan_fetch(3, 5_000, &cached);

        // then
        assert_eq!(plan.from_block, 1);
        assert_eq!(plan.to_block, 5_000);
        assert!(plan.needs_fetch);
    }

    #[test]
    fn round_window__first_page_covers_newest_rounds() {
        assert_eq!(round_window(100, 1, 6), Some((94, 99)));
        assert_eq!(round_window(100, 2, 6), Some((88, 93)));
    }

    #[test]
    fn round_window__clamps_at_round_zero() {
        assert_eq!(round_window(4, 1, 6), Some((0, 3)));
    }

    #[test]
    fn round_window__page_beyond_history_is_none() {
        assert_eq!(round_window(5, 2, 6), None);
    }

    #[test]
    fn cache_window__spans_back_to_the_pages_reach() {
        assert_eq!(cache_window(100, 2, 6), (88, 100));
        assert_eq!(cache_window(5, 3, 6), (0, 5));
    }

    #[test]
    fn merge_page__dedups_by_round_keeping_last_seen() {
        // given: the same round cached and freshly fetched
        let cached = vec![record(10, 1), record(11, 1)];
        let fresh = vec![record(10, 2)];

        // when
        let merged = merge_page(cached, fresh, (10, 11));

        // then: fresh row wins, one entry per round, ascending
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].round, 10);
        assert_eq!(merged[0].transaction_hash, B256::from([2u8; 32]));
        assert_eq!(merged[1].round, 11);
    }

    #[test]
    fn merge_page__drops_rounds_outside_the_window() {
        // given
        let cached = vec![record(5, 1), record(9, 1)];
        let fresh = vec![record(12, 2), record(8, 2)];

        // when
        let merged = merge_page(cached, fresh, (8, 11));

        // then
        let rounds: Vec<u64> = merged.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![8, 9]);
    }
}
