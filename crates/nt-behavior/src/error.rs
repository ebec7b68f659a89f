use thiserror::Error;

use nt_core::AgentId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("no home available for {0}")]
    NoHomeAvailable(AgentId),

    #[error("text generation failed: {0}")]
    TextGeneration(String),

    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
