//! Card system: templates, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardType`: Static per-template data, shared through `Arc`
//! - `CardTypeRegistry`: Template lookup by id and name, JSON catalogs
//! - `Card`: One unit in play, with exact undo for every mutation
//! - `Condition` / `CardCondition`: Predicates over card state
//! - `IsomorphicCardComparator`: Groups interchangeable cards for search
//!
//! ## Unowned Cards
//!
//! A default-constructed card has `player: None` until the orchestrator
//! places it.

pub mod card_type;
pub mod registry;
pub mod status;
pub mod card;
pub mod condition;
pub mod isomorphism;
mod serial;

pub use card_type::{AbilityCost, CardType, CardTypeId};
pub use registry::CardTypeRegistry;
pub use status::{AliveStatus, CardCreationMethod, CardStatus, CauseOfDeath, DamageSource};
pub use card::{Card, CardIdList};
pub use condition::{CardCondition, Condition};
pub use isomorphism::IsomorphicCardComparator;
