//! Card template registry.
//!
//! The `CardTypeRegistry` stores every template of a game. Cards hold their
//! template through an `Arc`, so the registry hands out shared handles and
//! resolves template names when cards are decoded from JSON.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::card_type::{CardType, CardTypeId};
use crate::core::{CardError, CardResult};

/// On-disk catalog layout.
#[derive(Deserialize)]
struct Catalog {
    card_types: Vec<CardType>,
}

/// Registry of card templates.
///
/// ## Example
///
/// ```
/// use rust_ccg_units::cards::{CardType, CardTypeRegistry};
///
/// let mut registry = CardTypeRegistry::new();
/// let wall = registry.register(CardType::new("Wall").with_health(3).blocker());
///
/// let found = registry.by_name("Wall").unwrap();
/// assert_eq!(found.id, wall.id);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardTypeRegistry {
    types: Vec<Arc<CardType>>,
    by_name: FxHashMap<String, CardTypeId>,
}

impl CardTypeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog: `{"card_types": [{"name": ..., ...}, ...]}`.
    ///
    /// Templates get ids in catalog order.
    pub fn from_json(text: &str) -> CardResult<Self> {
        let catalog: Catalog = serde_json::from_str(text)?;
        let mut registry = Self::new();
        for card_type in catalog.card_types {
            registry.try_register(card_type)?;
        }
        log::debug!("loaded card catalog with {} types", registry.len());
        Ok(registry)
    }

    /// Register a template, assigning its id.
    ///
    /// Returns an error if the name is taken.
    pub fn try_register(&mut self, mut card_type: CardType) -> CardResult<Arc<CardType>> {
        if self.by_name.contains_key(&card_type.name) {
            return Err(CardError::DuplicateCardType(card_type.name));
        }
        let id = CardTypeId::new(self.types.len() as u32);
        card_type.id = id;
        self.by_name.insert(card_type.name.clone(), id);
        let handle = Arc::new(card_type);
        self.types.push(Arc::clone(&handle));
        Ok(handle)
    }

    /// Register a template, assigning its id.
    ///
    /// Panics if a template with the same name already exists.
    pub fn register(&mut self, card_type: CardType) -> Arc<CardType> {
        let name = card_type.name.clone();
        match self.try_register(card_type) {
            Ok(handle) => handle,
            Err(_) => panic!("Card type {:?} already registered", name),
        }
    }

    /// Get a template by id.
    #[must_use]
    pub fn get(&self, id: CardTypeId) -> Option<&Arc<CardType>> {
        self.types.get(id.raw() as usize)
    }

    /// Get a template by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<CardType>> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Resolve a template name, failing with `UnknownCardType`.
    pub fn resolve(&self, name: &str) -> CardResult<Arc<CardType>> {
        self.by_name(name)
            .cloned()
            .ok_or_else(|| CardError::UnknownCardType(name.to_string()))
    }

    /// Get the number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all templates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardType>> {
        self.types.iter()
    }
}
