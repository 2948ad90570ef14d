//! # rust-ccg-units
//!
//! Reversible card-instance state machine for game-tree search.
//!
//! ## Design Principles
//!
//! 1. **Mutate, then undo**: Every in-turn mutation of a card has an exact
//!    inverse, so search can walk a game tree on a single board.
//!
//! 2. **Ids, not pointers**: Cards reference each other by `CardId`. A board
//!    copy is a copy of plain values plus shared templates.
//!
//! 3. **Scripts at the seam**: Card templates only flag that they run a
//!    script. The game supplies the behavior through `AbilityScriptRuntime`.
//!
//! ## Modules
//!
//! - `core`: Card ids, players, errors, RNG, configuration
//! - `cards`: Templates, card instances, conditions, JSON encoding
//! - `board`: Card arena with undo history, turn transitions, rollouts
//!
//! ## Example
//!
//! ```
//! use rust_ccg_units::{AbilityCost, Board, CardType, NoScripts, PlayerId};
//! use std::sync::Arc;
//!
//! let gauss = Arc::new(
//!     CardType::new("Gauss Cannon")
//!         .with_charges(0, 1, 1)
//!         .with_build_time(1)
//!         .with_ability(AbilityCost::free().with_charges(1)),
//! );
//!
//! let mut board = Board::default();
//! let p0 = PlayerId::new(0);
//! let id = board.buy(gauss, p0, &mut NoScripts);
//! board.begin_turn(p0, &mut NoScripts);
//!
//! let mark = board.history_len();
//! board.use_ability(id, &mut NoScripts);
//! assert_eq!(board.card(id).unwrap().current_charges(), 0);
//!
//! board.undo_to(mark);
//! assert!(board.card(id).unwrap().can_use_ability());
//! ```

pub mod core;
pub mod cards;
pub mod board;

// Re-export commonly used types
pub use crate::core::{
    CardId, HealthType, TurnType, ChargeType,
    PlayerId,
    CardError, CardResult,
    GameRng, GameRngState,
    BoardConfig,
};

pub use crate::cards::{
    AbilityCost, CardType, CardTypeId, CardTypeRegistry,
    AliveStatus, CardCreationMethod, CardStatus, CauseOfDeath, DamageSource,
    Card, CardIdList,
    CardCondition, Condition,
    IsomorphicCardComparator,
};

pub use crate::board::{
    Board, BoardAction,
    AbilityScriptRuntime, NoScripts, ScriptContext, ScriptTable,
};
