//! `nt-agent`: per-agent record storage for the `npc_town` scheduler.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`store`]       | `AgentStore` (SoA records), `AgentRngs` (per-agent RNG)   |
//! | [`builder`]     | `AgentStoreBuilder` (fluent construction)                 |
//!
//! Records are keyed by `AgentId` and any of them may be absent for a given
//! agent (`None`).  The scheduler treats an agent with a missing position as
//! "not present this tick" and skips it without touching its other records.

pub mod builder;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use store::{AgentRngs, AgentStore};
