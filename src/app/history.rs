use crate::{
    Result,
    app::{
        chain_client::ChainClient,
        pages::{
            self,
            BLOCKS_PER_DAY,
        },
        record_store::RecordStore,
        session::Session,
        settlement,
    },
    events::ANONYMOUS_ACCOUNT,
    records::{
        BlockRange,
        RoundRecord,
    },
};
use alloy_primitives::Address;
use anyhow::Context;

/// Orchestrates reconciler, chain queries, settlement and the record store
/// into one deduplicated, sorted page of rounds.
pub struct HistoryPager<C, S> {
    chain: C,
    store: S,
    session: Session,
}

impl<C, S> HistoryPager<C, S> {
    pub fn new(chain: C, store: S, session: Session) -> Self {
        Self {
            chain,
            store,
            session,
        }
    }
}

impl<C: ChainClient, S: RecordStore> HistoryPager<C, S> {
    /// Assemble one page of round records, ascending by round number within
    /// the page's window (callers reverse for newest-first display).
    ///
    /// `bump_round` treats the current round as already finished, for the
    /// refresh triggered right after a `RoundEnded` push. Freshly settled
    /// records and the extended block range are persisted as they are
    /// produced, keyed by the account captured here; if the session's active
    /// account changes while the queries are in flight, the page itself is
    /// discarded and comes back empty.
    pub async fn get_page(
        &mut self,
        account: Option<Address>,
        page: u32,
        per_page: u64,
        bump_round: bool,
    ) -> Result<Vec<RoundRecord>> {
        let store_account = account.unwrap_or(ANONYMOUS_ACCOUNT);

        let can_continue = self
            .chain
            .can_continue()
            .await
            .context("query betting-gap state")?;
        let mut current_round = self
            .chain
            .current_round()
            .await
            .context("query current round")?;
        let current_block = self
            .chain
            .block_number()
            .await
            .context("query chain height")?;
        let cached_range = self.store.block_range(&store_account)?.unwrap_or_default();

        // A finished-but-unstarted round already counts as history.
        if bump_round || can_continue {
            current_round += 1;
        }
        let Some(window) = pages::round_window(current_round, page, per_page) else {
            return Ok(Vec::new());
        };

        let plan = pages::plan_fetch(page, current_block, &cached_range);
        tracing::debug!(
            page,
            current_block,
            cached_from = cached_range.first_block,
            cached_to = cached_range.last_block,
            fetch_from = plan.from_block,
            fetch_to = plan.to_block,
            needs_fetch = plan.needs_fetch,
            "history fetch plan"
        );

        let (cache_from, cache_to) = pages::cache_window(current_round, page, per_page);
        let cached_rows =
            self.store
                .round_records_between(&store_account, cache_from, cache_to)?;

        let (resolutions, bet_events) = if plan.needs_fetch {
            let resolutions = self
                .chain
                .round_ended_logs(plan.from_block, plan.to_block)
                .await
                .context("query round resolutions")?;
            // A bet can land up to a day of blocks before the resolution log
            // that settles it, so the bet query reaches back further.
            let bet_events = match account {
                Some(player) => {
                    let bets_from = plan.from_block.saturating_sub(BLOCKS_PER_DAY);
                    self.chain
                        .new_bet_logs(player, bets_from, plan.to_block)
                        .await
                        .context("query account bets")?
                }
                None => Vec::new(),
            };
            (resolutions, bet_events)
        } else {
            (Vec::new(), Vec::new())
        };

        let wagers = settlement::aggregate_wagers(&bet_events);
        let mut fresh = Vec::with_capacity(resolutions.len());
        for log in &resolutions {
            let record = settlement::settle(log, wagers.get(&log.event.round));
            // Persist immediately; the store keeps staked records over
            // null-staked rewrites, so replays are harmless.
            self.store.save_round_record(&store_account, &record)?;
            fresh.push(record);
        }
        self.store.save_block_range(
            &store_account,
            BlockRange::new(plan.from_block, plan.to_block),
        )?;

        // The fetch is keyed to the account captured above, so everything
        // persisted stays valid; only the returned page would be stale.
        if self.session.current_account() != account {
            tracing::debug!("account switched during history fetch, discarding page");
            return Ok(Vec::new());
        }

        Ok(pages::merge_page(cached_rows, fresh, window))
    }
}
