//! Multi-round session simulation.
//!
//! Plays many rounds with a user and bots and checks that the money the
//! session moves always balances.

use minefield::config::{AppConfig, BotConfig, GameConfig};
use minefield::engine::random::{RandomSource, RngSource};
use minefield::session::GameSession;
use minefield::types::{CellIndex, ParticipantKind, Phase};

fn config() -> AppConfig {
    AppConfig {
        game: GameConfig {
            initial_user_balance: 500.0,
            initial_casino_balance: 5_000.0,
            min_bet: 1.0,
            max_bet: 100.0,
            history_limit: 10,
        },
        bots: BotConfig {
            per_round: 3,
            min_stake: 5,
            max_stake: 60,
        },
        ..AppConfig::default()
    }
}

#[test]
fn test_simulated_rounds_balance() {
    let cfg = config();
    let mut session = GameSession::from_config(&cfg);
    let mut rng = RngSource::seeded(2026);

    let mut house_total = 0.0;
    let mut user_total = 0.0;
    let mut user_rounds = 0;

    for round in 1..=40u64 {
        assert_eq!(session.round_number(), round);
        let cell = CellIndex::new(rng.pick(9) as u8 + 1).unwrap();
        let user_in = session
            .place_bet("player", ParticipantKind::User, cell, 20.0)
            .is_ok();
        if user_in {
            user_rounds += 1;
        }
        for _ in 0..cfg.bots.per_round {
            session.add_bot(&mut rng).unwrap();
        }

        let outcome = session.start_round(&mut rng).unwrap().clone();
        assert!(outcome.bets.iter().any(|b| b.cell == outcome.mine_cell));
        house_total += outcome.house_income;
        let user_net: f64 = outcome.results_for("player").map(|b| b.net_result).sum();
        user_total += user_net;

        let record = session.history().latest().unwrap();
        assert_eq!(record.round, round);
        assert_eq!(record.user_net.is_some(), user_in);

        session.next_round().unwrap();
        assert_eq!(session.phase(), Phase::Accepting);
    }

    assert!((session.casino_balance() - (5_000.0 + house_total)).abs() < 1e-6);
    assert!((session.user_balance() - (500.0 + user_total)).abs() < 1e-6);
    assert_eq!(session.history().len(), 10);
    assert_eq!(session.stats().rounds_played, user_rounds);
    assert_eq!(
        session.stats().rounds_won + session.stats().rounds_lost,
        session.stats().rounds_played
    );
}

#[test]
fn test_user_priced_out_sits_out() {
    let mut cfg = config();
    cfg.game.initial_user_balance = 15.0;
    let mut session = GameSession::from_config(&cfg);

    let cell = CellIndex::new(4).unwrap();
    assert!(session.place_bet("player", ParticipantKind::User, cell, 20.0).is_err());

    let mut rng = RngSource::seeded(1);
    session.add_bot(&mut rng).unwrap();
    session.start_round(&mut rng).unwrap();

    assert_eq!(session.user_balance(), 15.0);
    assert_eq!(session.stats().rounds_played, 0);
}

#[test]
fn test_same_seed_same_session() {
    let play = |seed: u64| {
        let cfg = config();
        let mut session = GameSession::from_config(&cfg);
        let mut rng = RngSource::seeded(seed);
        for _ in 0..15 {
            for _ in 0..cfg.bots.per_round {
                session.add_bot(&mut rng).unwrap();
            }
            session.start_round(&mut rng).unwrap();
            session.next_round().unwrap();
        }
        (
            session.casino_balance(),
            session.history().iter().map(|r| r.mine_cell).collect::<Vec<_>>(),
        )
    };
    assert_eq!(play(7), play(7));
}
