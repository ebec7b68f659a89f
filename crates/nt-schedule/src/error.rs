use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("tick entry {name:?} has invalid interval {interval} (must be finite and >= 0)")]
    InvalidInterval { name: String, interval: f32 },

    #[error("tick entry {0:?} is already registered")]
    DuplicateEntry(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
