use crate::{
    Result,
    app::{
        chain_client::ChainClient,
        pages::BLOCKS_PER_DAY,
        session::Session,
        subscriptions::{
            SubscribeOutcome,
            SubscriptionKey,
            SubscriptionRegistry,
        },
    },
    events::{
        ChainEvent,
        EventKind,
        LiveBet,
        NewBetEvent,
        RoundStartedEvent,
        Side,
    },
    network::{
        ContractName,
        Network,
    },
};
use alloy_primitives::U256;
use anyhow::{
    Context,
    anyhow,
};
use tokio::sync::mpsc;

/// Sent when no round is active (betting gap).
pub const NO_ACTIVE_ROUND: i64 = -1;
/// Sent while the round duration is unknown or still at its default.
pub const DEFAULT_ROUND_TIMER: i64 = -50_000;

/// Unlimited historical scans are not viable, so the initial bet-log query is
/// bounded to roughly a month of blocks.
pub const LIVE_LOOKBACK_BLOCKS: u64 = 30 * BLOCKS_PER_DAY;

/// Below this pot size an evenly split round is assumed to be the market
/// maker's automatic seed, not real betting, so no countdown is shown.
const MM_AUTO_SEED_WEI: u64 = 2_500_000_000_000_000_000;

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum LiveUpdate {
    /// New running total and most-recent-first bet list for one side.
    Side {
        side: Side,
        total_booty: U256,
        bets: Vec<LiveBet>,
    },
    RoundStarted {
        round: u64,
        ends_in_seconds: i64,
    },
    RoundEnded {
        round: u64,
    },
}

#[derive(Debug, Clone, Default)]
struct SideState {
    total: U256,
    bets: Vec<LiveBet>,
}

impl SideState {
    fn from_logs(total: U256, bets: Vec<LiveBet>) -> Self {
        Self { total, bets }
    }

    fn contains(&self, bet: &LiveBet) -> bool {
        self.bets.iter().any(|known| known == bet)
    }

    fn prepend(&mut self, bet: LiveBet) {
        self.total += bet.amount;
        self.bets.insert(0, bet);
    }
}

/// Tracks the in-progress round's wagers from push events, one instance per
/// account/network context.
///
/// Consumers receive [`LiveUpdate`]s on the channel returned by
/// [`LiveRoundAggregator::start`]; the aggregator itself is driven by
/// [`LiveRoundAggregator::run`].
pub struct LiveRoundAggregator<C> {
    chain: C,
    session: Session,
    round: u64,
    blue: SideState,
    green: SideState,
    new_bets: mpsc::Receiver<ChainEvent>,
    round_started: mpsc::Receiver<ChainEvent>,
    round_ended: mpsc::Receiver<ChainEvent>,
    updates: mpsc::Sender<LiveUpdate>,
}

impl<C: ChainClient> LiveRoundAggregator<C> {
    /// Register the event feeds (at most once per key), load the current
    /// round's existing bets and hand back the aggregator with its update
    /// stream.
    pub async fn start(
        chain: C,
        registry: &mut SubscriptionRegistry,
        session: Session,
        network: Network,
    ) -> Result<(Self, mpsc::Receiver<LiveUpdate>)> {
        let new_bets =
            attach(registry, &chain, network, EventKind::NewBet).await?;
        let round_started =
            attach(registry, &chain, network, EventKind::RoundStarted).await?;
        let round_ended =
            attach(registry, &chain, network, EventKind::RoundEnded).await?;

        let round = chain
            .current_round()
            .await
            .context("query current round")?;
        let (updates, updates_rx) = mpsc::channel(16);

        let mut aggregator = Self {
            chain,
            session,
            round,
            blue: SideState::default(),
            green: SideState::default(),
            new_bets,
            round_started,
            round_ended,
            updates,
        };
        aggregator.load_current_round().await?;
        Ok((aggregator, updates_rx))
    }

    /// Consume pushed events until every feed closes or the update receiver
    /// is dropped. Failures while reloading after a round start are logged
    /// and leave the (already reset) side state intact.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let keep_going = tokio::select! {
                event = self.new_bets.recv() => match event {
                    Some(ChainEvent::NewBet(bet)) => self.on_new_bet(bet).await,
                    Some(_) => true,
                    None => false,
                },
                event = self.round_started.recv() => match event {
                    Some(ChainEvent::RoundStarted(started)) => {
                        self.on_round_started(started).await
                    }
                    Some(_) => true,
                    None => false,
                },
                event = self.round_ended.recv() => match event {
                    Some(ChainEvent::RoundEnded(ended)) => {
                        self.push(LiveUpdate::RoundEnded { round: ended.round }).await
                    }
                    Some(_) => true,
                    None => false,
                },
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Current totals and bet lists for the tracked round, zeroed in the
    /// betting gap. Applies the mid-fetch wallet-switch guard: a result
    /// arriving for a stale account is discarded, not applied.
    async fn load_current_round(&mut self) -> Result<()> {
        if self
            .chain
            .can_continue()
            .await
            .context("query betting-gap state")?
        {
            self.blue = SideState::default();
            self.green = SideState::default();
            self.push_side(Side::Blue).await;
            self.push_side(Side::Green).await;
            return Ok(());
        }

        let account = self.session.current_account();
        let current_block = self
            .chain
            .block_number()
            .await
            .context("query chain height")?;
        let from_block = current_block.saturating_sub(LIVE_LOOKBACK_BLOCKS);

        let green_logs = self
            .chain
            .booty_bet_logs(Side::Green, self.round, from_block, current_block)
            .await
            .context("query green bets")?;
        let blue_logs = self
            .chain
            .booty_bet_logs(Side::Blue, self.round, from_block, current_block)
            .await
            .context("query blue bets")?;
        let total_green = self.chain.total_green().await.context("query green pot")?;
        let total_blue = self.chain.total_blue().await.context("query blue pot")?;

        if self.session.current_account() != account {
            tracing::debug!("account switched during live-bet fetch, discarding");
            return Ok(());
        }

        self.green = SideState::from_logs(total_green, newest_first(green_logs));
        self.blue = SideState::from_logs(total_blue, newest_first(blue_logs));
        self.push_side(Side::Blue).await;
        self.push_side(Side::Green).await;
        Ok(())
    }

    // A player repeating the exact same (address, amount) bet on one side is
    // indistinguishable from a duplicate push and gets dropped; the refreshed
    // history path still settles it correctly.
    async fn on_new_bet(&mut self, bet: NewBetEvent) -> bool {
        if bet.round != self.round {
            return true;
        }
        let entry = LiveBet {
            address: bet.player,
            amount: bet.amount,
        };
        let state = match bet.side {
            Side::Blue => &mut self.blue,
            Side::Green => &mut self.green,
        };
        if state.contains(&entry) {
            tracing::debug!(round = bet.round, side = ?bet.side, "duplicate live bet ignored");
            return true;
        }
        state.prepend(entry);
        self.push_side(bet.side).await
    }

    async fn on_round_started(&mut self, started: RoundStartedEvent) -> bool {
        self.round = started.round;
        self.blue = SideState::default();
        self.green = SideState::default();

        let keep_going = self
            .push(LiveUpdate::RoundStarted {
                round: started.round,
                ends_in_seconds: DEFAULT_ROUND_TIMER,
            })
            .await
            && self.push_side(Side::Blue).await
            && self.push_side(Side::Green).await;
        if !keep_going {
            return false;
        }

        if let Err(err) = self.load_current_round().await {
            tracing::warn!(round = started.round, "reload after round start failed: {err:#}");
        }
        true
    }

    async fn push_side(&self, side: Side) -> bool {
        let state = match side {
            Side::Blue => &self.blue,
            Side::Green => &self.green,
        };
        self.push(LiveUpdate::Side {
            side,
            total_booty: state.total,
            bets: state.bets.clone(),
        })
        .await
    }

    async fn push(&self, update: LiveUpdate) -> bool {
        self.updates.send(update).await.is_ok()
    }
}

async fn attach<C: ChainClient>(
    registry: &mut SubscriptionRegistry,
    chain: &C,
    network: Network,
    event: EventKind,
) -> Result<mpsc::Receiver<ChainEvent>> {
    let key = SubscriptionKey::new(ContractName::History, network, event);
    match registry.subscribe_once(chain, key).await? {
        SubscribeOutcome::Attached(receiver) => Ok(receiver),
        SubscribeOutcome::AlreadyAttached => {
            Err(anyhow!("live round already tracked for {key:?}"))
        }
    }
}

fn newest_first(logs: Vec<crate::events::BetEvent>) -> Vec<LiveBet> {
    logs.iter().rev().map(LiveBet::from).collect()
}

/// Seconds until the current round can be resolved: [`NO_ACTIVE_ROUND`] in
/// the betting gap, `default_timer` while only the market maker's even seed
/// sits in the pot, otherwise the on-chain deadline minus now.
pub async fn round_ends_in<C: ChainClient>(chain: &C, default_timer: i64) -> Result<i64> {
    if chain
        .can_continue()
        .await
        .context("query betting-gap state")?
    {
        return Ok(NO_ACTIVE_ROUND);
    }

    let ends_after = chain.ends_after().await.context("query round deadline")?;
    let total_green = chain.total_green().await.context("query green pot")?;
    let total_blue = chain.total_blue().await.context("query blue pot")?;

    if total_green == total_blue && total_green < U256::from(MM_AUTO_SEED_WEI) {
        return Ok(default_timer);
    }

    let now = chrono::Utc::now().timestamp();
    Ok(ends_after as i64 - now)
}
