//! Game session: the caller-owned state around the round engine.
//!
//! Holds the bets being accepted, the user and casino balances, the round
//! history and the user's statistics. The engine itself stays pure; the
//! session applies its outcome strictly after it returns.
//!
//! Phases: `Accepting` (bets may be added or removed) → `Resolved` (outcome
//! fixed, no bet changes) → `Accepting` again via `next_round`.

pub mod history;

use tracing::{debug, info};

use crate::bots::BotRoster;
use crate::config::{AppConfig, BotConfig, GameConfig};
use crate::engine::{self, random::RandomSource};
use crate::types::{Bet, CellIndex, GameError, ParticipantKind, Phase, RoundOutcome};
use history::{History, PlayerStats, RoundRecord};

pub struct GameSession {
    config: GameConfig,
    phase: Phase,
    rounds_resolved: u64,
    bets: Vec<Bet>,
    user_balance: f64,
    casino_balance: f64,
    history: History,
    stats: PlayerStats,
    bots: BotRoster,
    last_outcome: Option<RoundOutcome>,
}

impl GameSession {
    pub fn new(config: GameConfig, bots: BotConfig) -> Self {
        Self {
            phase: Phase::Accepting,
            rounds_resolved: 0,
            bets: Vec::new(),
            user_balance: config.initial_user_balance,
            casino_balance: config.initial_casino_balance,
            history: History::new(config.history_limit),
            stats: PlayerStats::default(),
            bots: BotRoster::new(bots),
            last_outcome: None,
            config,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.game.clone(), config.bots.clone())
    }

    // -- Accessors -------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn user_balance(&self) -> f64 {
        self.user_balance
    }

    pub fn casino_balance(&self) -> f64 {
        self.casino_balance
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Number of the round currently accepting bets (or just resolved).
    pub fn round_number(&self) -> u64 {
        match self.phase {
            Phase::Accepting => self.rounds_resolved + 1,
            Phase::Resolved => self.rounds_resolved,
        }
    }

    /// Stake the user currently has on the board.
    pub fn open_user_stake(&self) -> f64 {
        self.bets
            .iter()
            .filter(|b| b.kind == ParticipantKind::User)
            .map(|b| b.amount)
            .sum()
    }

    // -- Accepting phase -------------------------------------------------

    /// Commit a stake to a cell. User bets must fit the configured limits
    /// and the user's uncommitted balance; nothing is debited until the
    /// round resolves.
    pub fn place_bet(
        &mut self,
        participant_id: &str,
        kind: ParticipantKind,
        cell: CellIndex,
        amount: f64,
    ) -> Result<&Bet, GameError> {
        self.expect_phase(Phase::Accepting)?;
        let bet = Bet::new(participant_id, kind, cell, amount)?;

        if kind == ParticipantKind::User {
            if amount < self.config.min_bet || amount > self.config.max_bet {
                return Err(GameError::BetOutOfLimits {
                    amount,
                    min: self.config.min_bet,
                    max: self.config.max_bet,
                });
            }
            let available = self.user_balance - self.open_user_stake();
            if amount > available {
                return Err(GameError::InsufficientBalance {
                    needed: amount,
                    available,
                });
            }
        }

        self.push_bet(bet)
    }

    /// Withdraw a participant's bet before the round starts.
    pub fn remove_bet(&mut self, participant_id: &str) -> Result<Bet, GameError> {
        self.expect_phase(Phase::Accepting)?;
        let index = self
            .bets
            .iter()
            .position(|b| b.participant_id == participant_id)
            .ok_or_else(|| GameError::UnknownParticipant(participant_id.to_string()))?;
        let bet = self.bets.remove(index);
        debug!(participant = participant_id, cell = %bet.cell, "Bet removed");
        Ok(bet)
    }

    /// Withdraw every open bet. Returns how many were dropped.
    pub fn clear_bets(&mut self) -> Result<usize, GameError> {
        self.expect_phase(Phase::Accepting)?;
        let dropped = self.bets.len();
        self.bets.clear();
        debug!(round = self.round_number(), dropped, "Board cleared");
        Ok(dropped)
    }

    /// Add a bot with a random cell and stake.
    pub fn add_bot<R>(&mut self, rng: &mut R) -> Result<&Bet, GameError>
    where
        R: RandomSource + ?Sized,
    {
        self.expect_phase(Phase::Accepting)?;
        let bet = self.bots.next_bet(rng)?;
        self.push_bet(bet)
    }

    fn push_bet(&mut self, bet: Bet) -> Result<&Bet, GameError> {
        if self.bets.iter().any(|b| b.participant_id == bet.participant_id) {
            return Err(GameError::DuplicateParticipant(bet.participant_id));
        }
        debug!(
            round = self.round_number(),
            participant = %bet.participant_id,
            kind = %bet.kind,
            cell = %bet.cell,
            amount = bet.amount,
            "Bet placed"
        );
        self.bets.push(bet);
        Ok(&self.bets[self.bets.len() - 1])
    }

    // -- Resolution ------------------------------------------------------

    /// Resolve the round and apply its outcome to balances, stats and
    /// history. Rejected rounds leave the session untouched.
    pub fn start_round<R>(&mut self, rng: &mut R) -> Result<&RoundOutcome, GameError>
    where
        R: RandomSource + ?Sized,
    {
        self.expect_phase(Phase::Accepting)?;
        let outcome = engine::resolve_round(&self.bets, rng)?;

        let user_results: Vec<f64> = outcome
            .bets
            .iter()
            .filter(|b| b.kind == ParticipantKind::User)
            .map(|b| b.net_result)
            .collect();
        let user_net = if user_results.is_empty() {
            None
        } else {
            Some(user_results.iter().sum::<f64>())
        };

        if let Some(net) = user_net {
            self.user_balance += net;
            self.stats.record(net);
        }
        self.casino_balance += outcome.house_income;
        self.rounds_resolved += 1;
        self.history
            .push(RoundRecord::from_outcome(self.rounds_resolved, &outcome, user_net));
        self.phase = Phase::Resolved;

        info!(
            round = self.rounds_resolved,
            mine = %outcome.mine_cell,
            user_net = ?user_net,
            user_balance = format!("${:.2}", self.user_balance),
            casino_balance = format!("${:.2}", self.casino_balance),
            "Round applied"
        );

        Ok(&*self.last_outcome.insert(outcome))
    }

    /// Clear the board and start accepting bets for the next round.
    pub fn next_round(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Resolved)?;
        self.bets.clear();
        self.last_outcome = None;
        self.phase = Phase::Accepting;
        debug!(round = self.round_number(), "Accepting bets");
        Ok(())
    }

    /// Forget the user's statistics and the round history. Balances stay.
    pub fn reset_stats(&mut self) {
        self.stats = PlayerStats::default();
        self.history.clear();
        info!("Statistics reset");
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
