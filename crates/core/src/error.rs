use thiserror::Error;

pub type VantaResult<T> = Result<T, VantaError>;

/// Error taxonomy for the redemption path.
///
/// Advisory (recommendation/chat) degradation is deliberately absent:
/// advisor calls fall back to empty or default output inside the advisor
/// crate and never surface as errors.
#[derive(Error, Debug)]
pub enum VantaError {
    #[error("Authentication required: no identified member")]
    AuthenticationRequired,

    #[error("Perk not found in catalog: {perk_id}")]
    PerkUnavailable { perk_id: String },

    #[error("Perk redemption limit reached: {perk_id}")]
    PerkSoldOut { perk_id: String },

    #[error("Ledger append failed: {0}")]
    LedgerWriteFailed(String),

    #[error("Profile update failed after ledger append: {0}")]
    ProfileWriteFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
