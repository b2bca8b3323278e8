//! Mine placement.
//!
//! Aggregates the round's bets per cell and picks the mine from the used
//! cells. The rule is adversarial to whichever side minimises house risk:
//! a lone cell always hits, a two-way split hits the smaller stake unless
//! the stakes are lopsided, and wider boards hit one of the
//! least-populated cells at random.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::random::RandomSource;
use super::validate_bets;
use crate::types::{Bet, CellIndex, GameError, MineReason};

/// Two stakes further apart than this flip the two-cell rule.
pub const STAKE_RATIO_THRESHOLD: f64 = 2.0;

// ---------------------------------------------------------------------------
// Per-cell aggregation
// ---------------------------------------------------------------------------

/// Totals for one used cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellTally {
    pub cell: CellIndex,
    pub total_stake: f64,
    pub participants: usize,
}

/// Aggregate bets by cell. Only cells with at least one bet appear, in
/// ascending cell order.
pub fn tally_cells(bets: &[Bet]) -> Vec<CellTally> {
    let mut by_cell: BTreeMap<CellIndex, CellTally> = BTreeMap::new();
    for bet in bets {
        let tally = by_cell.entry(bet.cell).or_insert(CellTally {
            cell: bet.cell,
            total_stake: 0.0,
            participants: 0,
        });
        tally.total_stake += bet.amount;
        tally.participants += 1;
    }
    by_cell.into_values().collect()
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Choose the mine cell for a round.
///
/// The random source is consulted only when three or more cells are used and
/// more than one of them shares the minimum participant count.
pub fn select_mine<R>(bets: &[Bet], rng: &mut R) -> Result<(CellIndex, MineReason), GameError>
where
    R: RandomSource + ?Sized,
{
    validate_bets(bets)?;
    let used = tally_cells(bets);

    let (mine, reason) = match used.as_slice() {
        [only] => (only.cell, MineReason::SingleCell { cell: only.cell }),
        [first, second] => two_cell(first, second),
        _ => least_popular(&used, rng),
    };

    debug!(
        mine = %mine,
        used_cells = used.len(),
        bets = bets.len(),
        reason = %reason,
        "Mine selected"
    );

    Ok((mine, reason))
}

/// Two used cells, `a` before `b` in ascending order.
fn two_cell(a: &CellTally, b: &CellTally) -> (CellIndex, MineReason) {
    let a_over_b = a.total_stake / b.total_stake;
    let b_over_a = b.total_stake / a.total_stake;
    let ratio = a_over_b.max(b_over_a);

    if a_over_b <= STAKE_RATIO_THRESHOLD && b_over_a <= STAKE_RATIO_THRESHOLD {
        // Equal stakes resolve to the first (lower-index) cell.
        let mine = if a.total_stake <= b.total_stake { a.cell } else { b.cell };
        (
            mine,
            MineReason::TwoCellBalanced {
                first: a.cell,
                second: b.cell,
                ratio,
                mine,
            },
        )
    } else {
        let mine = if a.total_stake >= b.total_stake { a.cell } else { b.cell };
        (
            mine,
            MineReason::TwoCellLopsided {
                first: a.cell,
                second: b.cell,
                ratio,
                mine,
            },
        )
    }
}

/// Three or more used cells: uniform draw among the least-populated.
fn least_popular<R>(used: &[CellTally], rng: &mut R) -> (CellIndex, MineReason)
where
    R: RandomSource + ?Sized,
{
    let min_participants = used.iter().map(|t| t.participants).min().unwrap_or(0);
    let pool: Vec<CellIndex> = used
        .iter()
        .filter(|t| t.participants == min_participants)
        .map(|t| t.cell)
        .collect();

    // Pool is non-empty: the minimum is achieved by at least one used cell.
    let index = if pool.len() > 1 { rng.pick(pool.len()) } else { 0 };
    let mine = pool[index];

    (
        mine,
        MineReason::LeastPopular {
            min_participants,
            pool,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
