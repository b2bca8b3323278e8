//! MINEFIELD: 3x3 grid betting minigame
//!
//! Library crate exposing the round engine, the game session and their
//! supporting modules for the binary and integration tests.

pub mod config;
pub mod types;
pub mod engine;
pub mod bots;
pub mod session;
