use crate::{
    events::{
        NewBetEvent,
        RoundEndedLog,
        Side,
    },
    records::RoundRecord,
};
use alloy_primitives::{
    I256,
    U256,
};
use std::collections::HashMap;

/// An account's wagers on one round, summed per side.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct SideWagers {
    pub blue: U256,
    pub green: U256,
}

impl SideWagers {
    fn add(&mut self, side: Side, amount: U256) {
        match side {
            Side::Blue => self.blue += amount,
            Side::Green => self.green += amount,
        }
    }
}

/// Sum an account's raw bet logs per round and side. Repeated bets on the
/// same side within a round are added, not overwritten.
pub fn aggregate_wagers(events: &[NewBetEvent]) -> HashMap<u64, SideWagers> {
    let mut wagers: HashMap<u64, SideWagers> = HashMap::new();
    for event in events {
        wagers
            .entry(event.round)
            .or_default()
            .add(event.side, event.amount);
    }
    wagers
}

/// Derive the account's net outcome for one resolved round.
///
/// Winning side is `randomness mod 2` (even pays blue, odd pays green); the
/// win is `total_booty * my_bet / total_winners` with truncating division;
/// the net saldo subtracts the losing wager and the stake itself. A zero pot,
/// a zero winner pool or a zero saldo all record null stake fields.
pub fn settle(log: &RoundEndedLog, wagers: Option<&SideWagers>) -> RoundRecord {
    let event = &log.event;
    let mut record = RoundRecord {
        round: event.round,
        transaction_hash: log.transaction_hash,
        result: event.randomness,
        total_booty: event.total_booty,
        total_winners: event.total_winners,
        my_bet_side: None,
        my_bet_amount: None,
    };

    let Some(wagers) = wagers else {
        return record;
    };
    if event.total_booty.is_zero() || event.total_winners.is_zero() {
        return record;
    }

    let (my_bet, my_lose) = match Side::winning(event.randomness) {
        Side::Blue => (wagers.blue, wagers.green),
        Side::Green => (wagers.green, wagers.blue),
    };

    // Unrepresentable for any real wei values; refuse to report a number the
    // logs cannot justify.
    let my_win = match event.total_booty.checked_mul(my_bet) {
        Some(product) => product / event.total_winners,
        None => {
            tracing::warn!(round = event.round, "settlement overflow, recording no stake");
            return record;
        }
    };
    let Some(saldo) = signed(my_win)
        .zip(signed(my_lose))
        .zip(signed(my_bet))
        .and_then(|((win, lose), bet)| win.checked_sub(lose)?.checked_sub(bet))
    else {
        tracing::warn!(round = event.round, "settlement overflow, recording no stake");
        return record;
    };

    if saldo.is_zero() {
        return record;
    }

    record.my_bet_side = Some(if wagers.green > wagers.blue {
        Side::Green
    } else {
        Side::Blue
    });
    record.my_bet_amount = Some(saldo);
    record
}

fn signed(value: U256) -> Option<I256> {
    I256::try_from(value).ok()
}
