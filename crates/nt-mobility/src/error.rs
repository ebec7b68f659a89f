use nt_core::AgentId;
use thiserror::Error;

use crate::MovementPhase;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0} has no movement record")]
    NotTracked(AgentId),

    #[error("agent {agent} cannot take a new target while {phase:?}")]
    Busy { agent: AgentId, phase: MovementPhase },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
