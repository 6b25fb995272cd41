use thiserror::Error;

use crate::model::PositionType;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("unknown formation: {0}")]
    UnknownFormation(String),

    #[error("slot {index} out of range for {position} in formation {formation}")]
    SlotOutOfRange {
        formation: String,
        position: PositionType,
        index: usize,
    },

    #[error("holding not found: {0}")]
    HoldingNotFound(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
