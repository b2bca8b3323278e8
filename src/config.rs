//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults matching the shipped `config.toml`, so a
//! partial file only needs the values it overrides.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub bots: BotConfig,
    pub simulation: SimulationConfig,
}

/// Balances, bet limits and history size for a session.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub initial_user_balance: f64,
    pub initial_casino_balance: f64,
    pub min_bet: f64,
    pub max_bet: f64,
    /// Rounds kept in the history log; older ones are dropped.
    pub history_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_user_balance: 1000.0,
            initial_casino_balance: 10_000.0,
            min_bet: 1.0,
            max_bet: 500.0,
            history_limit: 50,
        }
    }
}

/// Bot participants added to each round.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    pub per_round: usize,
    /// Whole-unit stake range, inclusive.
    pub min_stake: u32,
    pub max_stake: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            per_round: 4,
            min_stake: 10,
            max_stake: 100,
        }
    }
}

/// Settings for the round-playing binary.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub rounds: u64,
    pub round_interval_ms: u64,
    /// Fixed RNG seed; random each run when absent.
    pub seed: Option<u64>,
    pub user_id: String,
    pub user_stake: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            round_interval_ms: 1000,
            seed: None,
            user_id: "player".to_string(),
            user_stake: 50.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        let game = &self.game;
        if !(game.min_bet > 0.0) {
            bail!("game.min_bet must be positive, got {}", game.min_bet);
        }
        if !game.max_bet.is_finite() {
            bail!("game.max_bet must be finite, got {}", game.max_bet);
        }
        if game.min_bet > game.max_bet {
            bail!("game.min_bet ({}) exceeds game.max_bet ({})", game.min_bet, game.max_bet);
        }
        for (name, balance) in [
            ("initial_user_balance", game.initial_user_balance),
            ("initial_casino_balance", game.initial_casino_balance),
        ] {
            if !(balance.is_finite() && balance > 0.0) {
                bail!("game.{name} must be positive and finite, got {balance}");
            }
        }
        if game.history_limit == 0 {
            bail!("game.history_limit must be at least 1");
        }
        if self.bots.min_stake == 0 {
            bail!("bots.min_stake must be at least 1");
        }
        if self.bots.min_stake > self.bots.max_stake {
            bail!(
                "bots.min_stake ({}) exceeds bots.max_stake ({})",
                self.bots.min_stake,
                self.bots.max_stake
            );
        }
        if !(self.simulation.user_stake.is_finite() && self.simulation.user_stake > 0.0) {
            bail!("simulation.user_stake must be positive and finite");
        }
        if self.simulation.round_interval_ms == 0 {
            bail!("simulation.round_interval_ms must be at least 1");
        }
        Ok(())
    }
}
