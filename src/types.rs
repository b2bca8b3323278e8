//! Shared types for the MINEFIELD game.
//!
//! These types form the data model used across the engine, the session
//! and the binary. The engine only ever reads them; nothing here is
//! mutated once a round has been resolved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the board (3x3 grid).
pub const GRID_CELLS: u8 = 9;

// ---------------------------------------------------------------------------
// Cell index
// ---------------------------------------------------------------------------

/// A cell on the 3x3 board, numbered 1 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellIndex(u8);

impl CellIndex {
    /// Build a cell index, rejecting anything outside 1..=9.
    pub fn new(value: u8) -> Result<Self, InvalidRound> {
        if (1..=GRID_CELLS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRound::CellOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every cell on the board in ascending order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (1..=GRID_CELLS).map(CellIndex)
    }
}

impl TryFrom<u8> for CellIndex {
    type Error = InvalidRound;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CellIndex::new(value)
    }
}

impl From<CellIndex> for u8 {
    fn from(cell: CellIndex) -> Self {
        cell.0
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Participants and bets
// ---------------------------------------------------------------------------

/// Who placed a bet. Only used for bookkeeping, never by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantKind {
    User,
    Bot,
}

impl fmt::Display for ParticipantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantKind::User => write!(f, "USER"),
            ParticipantKind::Bot => write!(f, "BOT"),
        }
    }
}

/// A stake committed to one cell by one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub participant_id: String,
    pub kind: ParticipantKind,
    pub cell: CellIndex,
    pub amount: f64,
}

impl Bet {
    /// Create a bet, validating the stake.
    pub fn new(
        participant_id: impl Into<String>,
        kind: ParticipantKind,
        cell: CellIndex,
        amount: f64,
    ) -> Result<Self, InvalidRound> {
        let bet = Self {
            participant_id: participant_id.into(),
            kind,
            cell,
            amount,
        };
        bet.validate()?;
        Ok(bet)
    }

    /// Check the stake invariant. `amount` is a public field, so the engine
    /// re-checks every bet it is handed; the cell is valid by construction.
    pub fn validate(&self) -> Result<(), InvalidRound> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(InvalidRound::NonPositiveAmount {
                participant: self.participant_id.clone(),
                amount: self.amount,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn sample(cell: u8, amount: f64) -> Self {
        Self {
            participant_id: format!("p-{cell}-{amount}"),
            kind: ParticipantKind::Bot,
            cell: CellIndex(cell),
            amount,
        }
    }
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> cell {} (${:.2})",
            self.kind, self.participant_id, self.cell, self.amount
        )
    }
}

// ---------------------------------------------------------------------------
// Mine selection reason
// ---------------------------------------------------------------------------

/// Why a given cell was chosen as the mine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "case", rename_all = "snake_case")]
pub enum MineReason {
    /// Every bet sat on the same cell.
    SingleCell { cell: CellIndex },
    /// Two cells with stakes within 2x of each other: the smaller stake hit.
    TwoCellBalanced {
        first: CellIndex,
        second: CellIndex,
        ratio: f64,
        mine: CellIndex,
    },
    /// Two cells with stakes more than 2x apart: the larger stake hit.
    TwoCellLopsided {
        first: CellIndex,
        second: CellIndex,
        ratio: f64,
        mine: CellIndex,
    },
    /// Three or more cells: drawn from the least-populated ones.
    LeastPopular {
        min_participants: usize,
        pool: Vec<CellIndex>,
    },
}

impl fmt::Display for MineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MineReason::SingleCell { cell } => {
                write!(f, "Single cell used: every bet was on cell {cell}, so the mine is there.")
            }
            MineReason::TwoCellBalanced { first, second, ratio, mine } => write!(
                f,
                "Two cells used ({first} and {second}) with stakes within 2x (ratio {ratio:.2}): \
                 the mine goes to the smaller stake, cell {mine}."
            ),
            MineReason::TwoCellLopsided { first, second, ratio, mine } => write!(
                f,
                "Two cells used ({first} and {second}) with stakes more than 2x apart \
                 (ratio {ratio:.2}): the mine goes to the larger stake, cell {mine}."
            ),
            MineReason::LeastPopular { min_participants, pool } => {
                let cells: Vec<String> = pool.iter().map(|c| c.to_string()).collect();
                write!(
                    f,
                    "Least-populated-cell pool, size {}: cells [{}] each had {} bet(s); \
                     the mine was drawn at random from them.",
                    pool.len(),
                    cells.join(", "),
                    min_participants,
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Settlement output
// ---------------------------------------------------------------------------

/// Result of a single bet after the mine is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetResult {
    pub participant_id: String,
    pub kind: ParticipantKind,
    pub cell: CellIndex,
    pub amount: f64,
    /// Amount returned to the participant (stake + bonus, or 0).
    pub payout: f64,
    /// Gain or loss relative to the stake.
    pub net_result: f64,
}

impl BetResult {
    pub fn is_winner(&self) -> bool {
        self.payout > 0.0
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_winner() { "WIN" } else { "LOSE" };
        write!(
            f,
            "{} cell {} stake=${:.2} payout=${:.2} net={:+.2} {}",
            self.participant_id, self.cell, self.amount, self.payout, self.net_result, verdict
        )
    }
}

/// Per-bet results and house accounting for a fixed mine cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub mine_cell: CellIndex,
    /// One entry per input bet, in input order.
    pub bets: Vec<BetResult>,
    /// Stakes forfeited on the mine cell.
    pub lost_amount: f64,
    /// Bonuses owed to winners.
    pub total_bonus: f64,
    /// `lost_amount - total_bonus`; negative on a losing round for the house.
    pub house_income: f64,
}

/// Everything produced by resolving one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub mine_cell: CellIndex,
    pub reason: MineReason,
    pub explanation: String,
    pub bets: Vec<BetResult>,
    pub lost_amount: f64,
    pub total_bonus: f64,
    pub house_income: f64,
}

impl RoundOutcome {
    /// Total staked across all bets in the round.
    pub fn total_staked(&self) -> f64 {
        self.bets.iter().map(|b| b.amount).sum()
    }

    /// Sum of net results over all bets (the players' aggregate P&L).
    pub fn players_net(&self) -> f64 {
        self.bets.iter().map(|b| b.net_result).sum()
    }

    /// Results belonging to one participant.
    pub fn results_for<'a>(
        &'a self,
        participant_id: &'a str,
    ) -> impl Iterator<Item = &'a BetResult> {
        self.bets.iter().filter(move |b| b.participant_id == participant_id)
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let winners = self.bets.iter().filter(|b| b.is_winner()).count();
        write!(
            f,
            "mine=cell {} | bets={} (W{}/L{}) | lost=${:.2} | bonus=${:.2} | house={:+.2}",
            self.mine_cell,
            self.bets.len(),
            winners,
            self.bets.len() - winners,
            self.lost_amount,
            self.total_bonus,
            self.house_income,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a bet set cannot be resolved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidRound {
    #[error("round has no bets")]
    NoBets,

    #[error("bet by {participant} has non-positive amount {amount}")]
    NonPositiveAmount { participant: String, amount: f64 },

    #[error("cell {0} is outside the board (1-9)")]
    CellOutOfRange(u8),
}

/// Domain-specific error types for MINEFIELD.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid round: {0}")]
    InvalidRound(#[from] InvalidRound),

    #[error("Wrong phase: expected {expected}, session is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("Participant already has a bet this round: {0}")]
    DuplicateParticipant(String),

    #[error("No bet found for participant: {0}")]
    UnknownParticipant(String),

    #[error("Bet ${amount:.2} outside limits ${min:.2}-${max:.2}")]
    BetOutOfLimits { amount: f64, min: f64, max: f64 },

    #[error("Insufficient balance: need ${needed:.2}, have ${available:.2}")]
    InsufficientBalance { needed: f64, available: f64 },
}

/// Session phase. The engine only participates in `Accepting -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Accepting,
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Accepting => write!(f, "ACCEPTING"),
            Phase::Resolved => write!(f, "RESOLVED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
