//! Integration tests across the engine and the session.

mod properties;
mod simulation;
