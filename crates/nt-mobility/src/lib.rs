//! `nt-mobility`: per-agent movement phase and position integration.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `MovementPhase`, `MovementState`:  per-agent phase machine        |
//! | [`store`]   | `MobilityStore`:  `Vec<Option<MovementState>>` keyed by `AgentId` |
//! | [`engine`]  | `MobilityEngine`:  command application + integration step        |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                              |
//!
//! # Phase model
//!
//! ```text
//! Idle ──BeginPlanning──▶ Planning ──(timer ≥ planning)──▶ Idle
//! Idle ──MoveTo──▶ Moving ──(reached target)──▶ Arriving ──(timer ≥ arriving)──▶ Idle
//! ```
//!
//! The behavior scheduler never writes a `MovementState` directly.  It emits
//! [`MovementCommand`][nt_behavior::MovementCommand]s which the engine applies
//! immediately; only [`MobilityEngine::update`] advances timers and moves
//! agents.
//!
//! Timers and travel distance are both multiplied by an external movement
//! scale (`time_scale / base_time_scale`), so speeding up the clock speeds up
//! walking and the planning/arriving pauses together.

pub mod engine;
pub mod error;
pub mod state;
pub mod store;


pub use engine::{MobilityEngine, PhaseChange, is_valid_speed};
pub use error::{MobilityError, MobilityResult};
pub use state::{MovementPhase, MovementState};
pub use store::MobilityStore;
