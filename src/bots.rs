//! Bot participants.
//!
//! Bots fill the board so a lone player still faces a contested round.
//! They have no wallet: their stakes are drawn from the configured range
//! and never checked against a balance.

use tracing::debug;

use crate::config::BotConfig;
use crate::engine::random::RandomSource;
use crate::types::{Bet, CellIndex, GameError, ParticipantKind, GRID_CELLS};

/// Hands out bot identities and random bets.
#[derive(Debug, Clone)]
pub struct BotRoster {
    config: BotConfig,
    spawned: u64,
}

impl BotRoster {
    pub fn new(config: BotConfig) -> Self {
        Self { config, spawned: 0 }
    }

    /// Number of bots created so far.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Draw a bet for a new bot: uniform cell, uniform whole-unit stake.
    pub fn next_bet<R>(&mut self, rng: &mut R) -> Result<Bet, GameError>
    where
        R: RandomSource + ?Sized,
    {
        self.spawned += 1;
        let id = format!("bot-{}", self.spawned);

        let cell = CellIndex::new(rng.pick(GRID_CELLS as usize) as u8 + 1)?;
        let span = self.config.max_stake.saturating_sub(self.config.min_stake) as usize + 1;
        let stake = self.config.min_stake as f64 + rng.pick(span) as f64;

        debug!(bot = %id, cell = %cell, stake, "Bot bet drawn");
        Ok(Bet::new(id, ParticipantKind::Bot, cell, stake)?)
    }
}
