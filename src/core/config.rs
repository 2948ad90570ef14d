//! Board configuration.
//!
//! Games configure the arena at startup. Card templates are configured
//! separately through the catalog (`CardTypeRegistry::from_json`).

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Board configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of sides (default: 2).
    pub player_count: usize,

    /// Cards to reserve room for up front.
    /// Search boards grow and shrink constantly; reserving avoids reallocation.
    pub initial_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            initial_capacity: 64,
        }
    }
}

impl BoardConfig {
    /// Set the number of players.
    #[must_use]
    pub fn with_players(mut self, player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");
        self.player_count = player_count;
        self
    }

    /// Set the arena capacity hint.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Check whether `player` takes part in games with this configuration.
    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        player.index() < self.player_count
    }
}
