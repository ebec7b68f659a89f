use nt_core::CoreError;
use nt_schedule::ScheduleError;
use nt_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("world error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("tick registration error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("scenario parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agent {index} speed override {speed} must be a positive finite number")]
    InvalidSpeed { index: usize, speed: f32 },
}

pub type SimResult<T> = Result<T, SimError>;
