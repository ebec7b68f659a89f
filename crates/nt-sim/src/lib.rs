//! `nt-sim`: the behavior scheduler and frame loop for `npc_town`.
//!
//! # Frame
//!
//! ```text
//! Sim::advance(dt):
//!   ① calendar     advance simulated time by dt × time_scale.
//!   ② planning     (every planning_interval) idle agents get a plan:
//!                  intent → MovingToZone, tracker ← BeginPlanning.
//!   ③ movement     (every movement_interval) phase timers and positions
//!                  are integrated by the movement tracker.
//!   ④ reconcile    arrivals: agents whose step finished either start their
//!                  activity (inside the zone) or get the next step;
//!                  activities: timers count down, expired or contradicted
//!                  activities are replanned, sleepers at home are left be.
//!   ⑤ events       queued SimEvents go to the observer, then on_frame_end.
//! ```
//!
//! All failure cases (unknown zone, no path, missing records) fall back to
//! `Idle` or skip the agent; nothing in a frame can fail.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nt_behavior::DailyRoutine;
//! use nt_sim::{NoopObserver, Scenario};
//! use nt_spatial::AStarRouter;
//!
//! let scenario = Scenario::from_toml_str(&std::fs::read_to_string("town.toml")?)?;
//! let mut sim = scenario.build(DailyRoutine, AStarRouter)?;
//! sim.run_frames(60 * 60, 1.0 / 60.0, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{EventLog, NoopObserver, ReplanReason, SimEvent, SimObserver};
pub use scenario::{AgentSpec, Scenario, ZoneSpec};
pub use sim::{
    CALENDAR_SYSTEM, MOVEMENT_SYSTEM, PLANNING_SYSTEM, RECONCILE_SYSTEM, Sim, SimState,
};
