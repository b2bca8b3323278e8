//! Round history and player statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::types::{CellIndex, RoundOutcome};

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One archived round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u64,
    pub timestamp: DateTime<Utc>,
    pub mine_cell: CellIndex,
    pub explanation: String,
    pub bet_count: usize,
    pub total_staked: f64,
    pub house_income: f64,
    /// The user's net result, or `None` if the user sat the round out.
    pub user_net: Option<f64>,
}

impl RoundRecord {
    pub fn from_outcome(round: u64, outcome: &RoundOutcome, user_net: Option<f64>) -> Self {
        Self {
            round,
            timestamp: Utc::now(),
            mine_cell: outcome.mine_cell,
            explanation: outcome.explanation.clone(),
            bet_count: outcome.bets.len(),
            total_staked: outcome.total_staked(),
            house_income: outcome.house_income,
            user_net,
        }
    }
}

impl fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Round #{} [{}]: mine=cell {} bets={} staked=${:.2} house={:+.2}",
            self.round,
            self.timestamp.format("%H:%M:%S"),
            self.mine_cell,
            self.bet_count,
            self.total_staked,
            self.house_income,
        )?;
        if let Some(net) = self.user_net {
            write!(f, " you={net:+.2}")?;
        }
        Ok(())
    }
}

/// Bounded log of resolved rounds; the oldest entry is dropped when full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    limit: usize,
    records: VecDeque<RoundRecord>,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: RoundRecord) {
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.records.back()
    }

    /// Records newest first, as a history panel lists them.
    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter().rev()
    }

    /// Sum of house income across the retained rounds.
    pub fn house_income(&self) -> f64 {
        self.records.iter().map(|r| r.house_income).sum()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Player statistics
// ---------------------------------------------------------------------------

/// Lifetime counters for the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub rounds_played: u64,
    pub rounds_won: u64,
    pub rounds_lost: u64,
    /// Sum of positive net results.
    pub total_won: f64,
    /// Sum of stakes lost (as a positive number).
    pub total_lost: f64,
}

impl PlayerStats {
    /// Record the user's net result for one round.
    pub fn record(&mut self, net: f64) {
        self.rounds_played += 1;
        if net > 0.0 {
            self.rounds_won += 1;
            self.total_won += net;
        } else if net < 0.0 {
            self.rounds_lost += 1;
            self.total_lost += -net;
        }
    }

    /// Win rate as a percentage. Returns 0.0 if nothing was decided.
    pub fn win_rate(&self) -> f64 {
        let decided = self.rounds_won + self.rounds_lost;
        if decided == 0 {
            0.0
        } else {
            (self.rounds_won as f64 / decided as f64) * 100.0
        }
    }

    pub fn net(&self) -> f64 {
        self.total_won - self.total_lost
    }
}

impl fmt::Display for PlayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rounds={} (W{}/L{}) | win_rate={:.1}% | won=${:.2} | lost=${:.2} | net={:+.2}",
            self.rounds_played,
            self.rounds_won,
            self.rounds_lost,
            self.win_rate(),
            self.total_won,
            self.total_lost,
            self.net(),
        )
    }
}
