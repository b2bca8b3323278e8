//! Settlement: payouts, net results and house income for a fixed mine.
//!
//! Losers on the mine cell forfeit their stake; everyone else gets the stake
//! back plus a fixed 25% bonus. The house keeps the forfeited stakes and pays
//! the bonuses, so a round can leave the house negative.

use tracing::debug;

use super::validate_bets;
use crate::types::{Bet, BetResult, CellIndex, GameError, Settlement};

/// Bonus paid on a winning stake (the "1.25x" coefficient).
pub const BONUS_RATE: f64 = 0.25;

/// Settle every bet against `mine_cell`.
///
/// Pure: identical input produces a bit-identical `Settlement`. Results keep
/// the order of `bets`.
pub fn settle(bets: &[Bet], mine_cell: CellIndex) -> Result<Settlement, GameError> {
    validate_bets(bets)?;

    let mut lost_amount = 0.0;
    let mut total_bonus = 0.0;

    let results: Vec<BetResult> = bets
        .iter()
        .map(|bet| {
            let (payout, net_result) = if bet.cell == mine_cell {
                lost_amount += bet.amount;
                (0.0, -bet.amount)
            } else {
                let bonus = bet.amount * BONUS_RATE;
                total_bonus += bonus;
                (bet.amount + bonus, bonus)
            };
            BetResult {
                participant_id: bet.participant_id.clone(),
                kind: bet.kind,
                cell: bet.cell,
                amount: bet.amount,
                payout,
                net_result,
            }
        })
        .collect();

    let house_income = lost_amount - total_bonus;

    debug!(
        mine = %mine_cell,
        bets = results.len(),
        lost = format!("${:.2}", lost_amount),
        bonus = format!("${:.2}", total_bonus),
        house_income = format!("${:.2}", house_income),
        "Round settled"
    );

    Ok(Settlement {
        mine_cell,
        bets: results,
        lost_amount,
        total_bonus,
        house_income,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
