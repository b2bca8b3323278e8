//! Round engine: mine selection, settlement and explanation.
//!
//! Stateless: every function here is a pure computation over the bets it
//! is handed, plus the caller's `RandomSource` for the one random draw.

pub mod random;
pub mod selector;
pub mod settlement;

use tracing::info;

use crate::types::{Bet, GameError, InvalidRound, RoundOutcome};
use random::RandomSource;

pub use selector::{select_mine, tally_cells, CellTally};
pub use settlement::{settle, BONUS_RATE};

/// Reject bet sets the engine cannot resolve.
pub(crate) fn validate_bets(bets: &[Bet]) -> Result<(), InvalidRound> {
    if bets.is_empty() {
        return Err(InvalidRound::NoBets);
    }
    bets.iter().try_for_each(Bet::validate)
}

/// Resolve a round end to end: select the mine, settle every bet, and
/// attach the explanation.
pub fn resolve_round<R>(bets: &[Bet], rng: &mut R) -> Result<RoundOutcome, GameError>
where
    R: RandomSource + ?Sized,
{
    let (mine_cell, reason) = select_mine(bets, rng)?;
    let settlement = settle(bets, mine_cell)?;

    let outcome = RoundOutcome {
        mine_cell,
        explanation: reason.to_string(),
        reason,
        bets: settlement.bets,
        lost_amount: settlement.lost_amount,
        total_bonus: settlement.total_bonus,
        house_income: settlement.house_income,
    };

    info!(
        mine = %outcome.mine_cell,
        bets = outcome.bets.len(),
        staked = format!("${:.2}", outcome.total_staked()),
        house_income = format!("${:.2}", outcome.house_income),
        "Round resolved"
    );

    Ok(outcome)
}
