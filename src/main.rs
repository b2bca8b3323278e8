//! MINEFIELD: 3x3 grid betting minigame
//!
//! Entry point. Loads configuration, initialises structured logging and
//! plays the configured number of rounds on a fixed interval: the user
//! bets on a random cell, bots fill the board, the engine places the mine
//! and the session applies the result. Stops early on Ctrl+C.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

use minefield::config::AppConfig;
use minefield::engine::random::{RandomSource, RngSource};
use minefield::session::GameSession;
use minefield::types::{CellIndex, GameError, ParticipantKind, Phase, RoundOutcome, GRID_CELLS};

const BANNER: &str = r#"
 __  __ ___ _  _ ___ ___ ___ ___ _    ___
|  \/  |_ _| \| | __| __|_ _| __| |  |   \
| |\/| || || .` | _|| _| | || _|| |__| |) |
|_|  |_|___|_|\_|___|_| |___|___|____|___/

  Nine cells, one mine. Winners take 1.25x.
"#;

const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        config = %config_path,
        rounds = cfg.simulation.rounds,
        bots_per_round = cfg.bots.per_round,
        user_balance = cfg.game.initial_user_balance,
        casino_balance = cfg.game.initial_casino_balance,
        "MINEFIELD starting up"
    );

    let mut rng = match cfg.simulation.seed {
        Some(seed) => {
            info!(seed, "Using fixed RNG seed");
            RngSource::seeded(seed)
        }
        None => RngSource::from_entropy(),
    };
    let mut session = GameSession::from_config(&cfg);

    // -- Main loop -------------------------------------------------------

    let period = Duration::from_millis(cfg.simulation.round_interval_ms);
    let mut interval = tokio::time::interval(period);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut played = 0;
    while played < cfg.simulation.rounds {
        tokio::select! {
            _ = interval.tick() => {
                match play_round(&mut session, &cfg, &mut rng) {
                    Ok(outcome) => {
                        played += 1;
                        log_outcome(&outcome);
                    }
                    Err(e) => warn!(error = %e, "Round failed, board cleared"),
                }
                if session.phase() == Phase::Resolved {
                    session.next_round()?;
                } else {
                    let dropped = session.clear_bets()?;
                    debug!(dropped, "Open bets withdrawn");
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(
        user_balance = format!("${:.2}", session.user_balance()),
        casino_balance = format!("${:.2}", session.casino_balance()),
        house_income = format!("${:.2}", session.history().house_income()),
        stats = %session.stats(),
        "MINEFIELD shut down cleanly."
    );

    Ok(())
}

/// Fill the board for one round and resolve it.
fn play_round(
    session: &mut GameSession,
    cfg: &AppConfig,
    rng: &mut dyn RandomSource,
) -> Result<RoundOutcome, GameError> {
    let sim = &cfg.simulation;
    let round = session.round_number();
    let cell = CellIndex::new(rng.pick(GRID_CELLS as usize) as u8 + 1)?;
    match session.place_bet(&sim.user_id, ParticipantKind::User, cell, sim.user_stake) {
        Ok(bet) => info!(round, bet = %bet, "User bet placed"),
        Err(e) => warn!(error = %e, "User sits this round out"),
    }

    // At least one bot, so a round the user sits out still has bets.
    for _ in 0..cfg.bots.per_round.max(1) {
        session.add_bot(rng)?;
    }

    let outcome = session.start_round(rng)?;
    Ok(outcome.clone())
}

/// Log a human-readable round summary.
fn log_outcome(outcome: &RoundOutcome) {
    info!(summary = %outcome, "Round complete");
    info!(reason = %outcome.explanation, "Mine placement");
    for result in &outcome.bets {
        debug!(result = %result, "Bet settled");
    }
    if let Ok(json) = serde_json::to_string(outcome) {
        debug!(outcome = %json, "Round outcome");
    }
}

/// Initialise the `tracing` subscriber.
///
/// `RUST_LOG` overrides the default `minefield=info` filter.
/// `MINEFIELD_LOG_FORMAT` picks the output: `json` for one object per line,
/// `compact` for terse lines, anything else for the full human format.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minefield=info"));
    let builder = fmt().with_env_filter(filter);

    match std::env::var("MINEFIELD_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().with_current_span(false).init(),
        Ok("compact") => builder.compact().with_target(false).init(),
        _ => builder.with_target(true).init(),
    }
}
