//! `nt-core`: foundational types for the `npc_town` agent scheduler.
//!
//! This crate is a dependency of every other `nt-*` crate.  It intentionally
//! has no `nt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geo`]         | `Cell` (grid coordinate), `Vec2` (pixel position)     |
//! | [`time`]        | `Calendar`, `DayPeriod`, hour-of-day predicates       |
//! | [`config`]      | `SimConfig`                                           |
//! | [`rng`]         | `AgentRng` (per-agent, seeded)                        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and value types.  |
//!           | Required by the TOML scenario loader in `nt-sim`.          |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Cell, Vec2};
pub use ids::AgentId;
pub use rng::AgentRng;
pub use time::{Calendar, DayPeriod, is_meal_time, is_sleep_time, is_work_hours};
