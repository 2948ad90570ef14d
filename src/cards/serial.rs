//! Lossless JSON encoding of a card instance.
//!
//! The template is written by name and resolved through a
//! `CardTypeRegistry` on the way back in. Enums are written by name, the
//! status bitmask by its bits, and the causal id lists as integer arrays.
//!
//! Decoding validates the card invariants, so a malformed document yields a
//! `CardError` and never a half-built card.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardIdList};
use super::registry::CardTypeRegistry;
use super::status::{AliveStatus, CardStatus, CauseOfDeath};
use crate::core::{CardError, CardId, CardResult, ChargeType, HealthType, PlayerId, TurnType};

/// Wire layout: one field per card attribute.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CardRecord {
    card_type: String,
    id: CardId,
    target_id: CardId,
    has_target: bool,
    player: Option<PlayerId>,
    current_health: HealthType,
    current_chill: HealthType,
    damage_taken: HealthType,
    #[serde(default)]
    breach_damage: HealthType,
    construction_time: TurnType,
    current_delay: TurnType,
    lifespan: TurnType,
    current_charges: ChargeType,
    status: u8,
    alive_status: AliveStatus,
    cause_of_death: CauseOfDeath,
    sellable: bool,
    in_play: bool,
    was_breached: bool,
    ability_used_this_turn: bool,
    killed_card_ids: CardIdList,
    created_card_ids: CardIdList,
}

impl CardRecord {
    fn from_card(card: &Card) -> Self {
        Self {
            card_type: card.card_type.name.clone(),
            id: card.id,
            target_id: card.target.unwrap_or(CardId::new(0)),
            has_target: card.target.is_some(),
            player: card.player,
            current_health: card.current_health,
            current_chill: card.current_chill,
            damage_taken: card.damage_taken,
            breach_damage: card.breach_damage,
            construction_time: card.construction_time,
            current_delay: card.current_delay,
            lifespan: card.lifespan,
            current_charges: card.current_charges,
            status: card.status.bits(),
            alive_status: card.alive_status,
            cause_of_death: card.cause_of_death,
            sellable: card.sellable,
            in_play: card.in_play,
            was_breached: card.was_breached,
            ability_used_this_turn: card.ability_used_this_turn,
            killed_card_ids: card.killed_card_ids.clone(),
            created_card_ids: card.created_card_ids.clone(),
        }
    }

    fn into_card(self, registry: &CardTypeRegistry) -> CardResult<Card> {
        let card_type = registry.resolve(&self.card_type)?;
        let status = CardStatus::from_bits(self.status).ok_or(CardError::UnknownStatusBits(self.status))?;

        if (self.alive_status == AliveStatus::Alive) != (self.cause_of_death == CauseOfDeath::None) {
            return Err(CardError::InconsistentState("cause of death must be set exactly when dead"));
        }
        if self.current_chill > self.current_health {
            return Err(CardError::InconsistentState("chill exceeds health"));
        }
        if self.damage_taken > self.current_health {
            return Err(CardError::InconsistentState("damage exceeds health"));
        }
        if self.alive_status == AliveStatus::Alive && self.damage_taken >= self.current_health {
            return Err(CardError::InconsistentState("alive card has no health left"));
        }
        if self.breach_damage > self.damage_taken {
            return Err(CardError::InconsistentState("breach damage exceeds damage taken"));
        }
        if self.breach_damage > 0 && !self.was_breached {
            return Err(CardError::InconsistentState("breach damage on a card that was not breached"));
        }
        if self.current_charges > card_type.max_charges {
            return Err(CardError::InconsistentState("charges exceed template maximum"));
        }

        Ok(Card {
            card_type,
            id: self.id,
            target: self.has_target.then_some(self.target_id),
            player: self.player,
            current_health: self.current_health,
            current_chill: self.current_chill,
            damage_taken: self.damage_taken,
            breach_damage: self.breach_damage,
            construction_time: self.construction_time,
            current_delay: self.current_delay,
            lifespan: self.lifespan,
            current_charges: self.current_charges,
            status,
            alive_status: self.alive_status,
            cause_of_death: self.cause_of_death,
            sellable: self.sellable,
            in_play: self.in_play,
            was_breached: self.was_breached,
            ability_used_this_turn: self.ability_used_this_turn,
            killed_card_ids: self.killed_card_ids,
            created_card_ids: self.created_card_ids,
        })
    }
}

impl Card {
    /// Encode every field as JSON, pretty-printed if `formatted`.
    pub fn to_json_string(&self, formatted: bool) -> CardResult<String> {
        let record = CardRecord::from_card(self);
        let text = if formatted {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        Ok(text)
    }

    /// Encode as a parsed JSON value.
    pub fn to_value(&self) -> CardResult<serde_json::Value> {
        Ok(serde_json::to_value(CardRecord::from_card(self))?)
    }

    /// Decode a card from JSON text.
    pub fn from_json(text: &str, registry: &CardTypeRegistry) -> CardResult<Self> {
        let record: CardRecord = serde_json::from_str(text).map_err(|err| {
            log::warn!("rejected card json: {}", err);
            CardError::from(err)
        })?;
        record.into_card(registry)
    }

    /// Decode a card from an already parsed JSON value.
    pub fn from_value(value: &serde_json::Value, registry: &CardTypeRegistry) -> CardResult<Self> {
        let record = CardRecord::deserialize(value).map_err(|err| {
            log::warn!("rejected card json value: {}", err);
            CardError::from(err)
        })?;
        record.into_card(registry)
    }
}
