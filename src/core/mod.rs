//! Core types: card ids, players, errors, RNG, configuration.
//!
//! These are the small value types every other module builds on. Nothing
//! here knows about card rules.

pub mod entity;
pub mod player;
pub mod error;
pub mod rng;
pub mod config;

pub use entity::{CardId, ChargeType, HealthType, TurnType};
pub use player::PlayerId;
pub use error::{CardError, CardResult};
pub use rng::{GameRng, GameRngState};
pub use config::BoardConfig;
