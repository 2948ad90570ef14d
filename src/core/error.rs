//! Recoverable errors.
//!
//! Card mutators follow a precondition contract (check `can_*` first) and
//! never return errors. Only loading data from text can fail: a card from
//! JSON, or a catalog of card types.

use thiserror::Error;

/// Errors raised while decoding cards or card catalogs.
#[derive(Debug, Error)]
pub enum CardError {
    /// The input is not valid JSON or does not match the card schema.
    #[error("malformed card json: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The card names a template missing from the registry.
    #[error("unknown card type `{0}`")]
    UnknownCardType(String),

    /// A catalog defines the same template name twice.
    #[error("card type `{0}` is already registered")]
    DuplicateCardType(String),

    /// The fields decode but violate a card invariant.
    #[error("inconsistent card state: {0}")]
    InconsistentState(&'static str),

    /// The status bitmask has bits no status flag uses.
    #[error("unknown status bits {0:#04x}")]
    UnknownStatusBits(u8),
}

/// Result alias for card decoding.
pub type CardResult<T> = Result<T, CardError>;
