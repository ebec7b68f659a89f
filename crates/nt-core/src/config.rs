//! Top-level simulation configuration.

use crate::{Calendar, CoreError, CoreResult};

/// Tunables for one simulation run.
///
/// Typically loaded from the `[sim]` table of a TOML scenario by `nt-sim`.
/// Every field has a default, so a scenario only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed and frame sequence always produce
    /// identical results.
    pub seed: u64,

    /// Edge length of one grid cell in pixels.
    pub cell_size: f32,

    /// Simulated seconds per real second.
    pub time_scale: f32,

    /// The `time_scale` at which agents walk at their nominal speed.
    /// Movement is scaled by `time_scale / base_time_scale`.
    pub base_time_scale: f32,

    /// Hour of day 1 the calendar starts at.
    pub start_hour: u32,

    /// Real seconds between planning passes.
    pub planning_interval_secs: f32,

    /// Real seconds between movement integration steps.
    pub movement_interval_secs: f32,

    /// Scaled seconds an agent spends in the `Planning` phase.
    pub planning_duration_secs: f32,

    /// Scaled seconds an agent spends in the `Arriving` phase.
    pub arriving_duration_secs: f32,

    /// Amount subtracted from an activity timer on every reconciliation pass.
    pub activity_tick_secs: f32,

    /// Lower bound (inclusive) of a freshly drawn activity duration.
    pub activity_min_secs: f32,

    /// Upper bound (exclusive) of a freshly drawn activity duration.
    pub activity_max_secs: f32,

    /// Walking speed in pixels per second at nominal movement scale, for
    /// agents that do not set their own.
    pub walk_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                   42,
            cell_size:              32.0,
            time_scale:             60.0,
            base_time_scale:        60.0,
            start_hour:             8,
            planning_interval_secs: 0.5,
            movement_interval_secs: 0.016,
            planning_duration_secs: 0.5,
            arriving_duration_secs: 0.2,
            activity_tick_secs:     16.67,
            activity_min_secs:      300.0,
            activity_max_secs:      900.0,
            walk_speed:             50.0,
        }
    }
}

impl SimConfig {
    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.cell_size > 0.0) {
            return Err(CoreError::Config(format!("cell_size must be > 0, got {}", self.cell_size)));
        }
        if !(self.time_scale >= 0.0) {
            return Err(CoreError::Config(format!("time_scale must be >= 0, got {}", self.time_scale)));
        }
        if !(self.base_time_scale > 0.0) {
            return Err(CoreError::Config(format!(
                "base_time_scale must be > 0, got {}",
                self.base_time_scale
            )));
        }
        if self.start_hour >= 24 {
            return Err(CoreError::Config(format!("start_hour must be < 24, got {}", self.start_hour)));
        }
        if !(self.planning_interval_secs >= 0.0 && self.movement_interval_secs >= 0.0) {
            return Err(CoreError::Config("tick intervals must be >= 0".into()));
        }
        if !(self.walk_speed > 0.0) {
            return Err(CoreError::Config(format!("walk_speed must be > 0, got {}", self.walk_speed)));
        }
        if !(self.activity_min_secs < self.activity_max_secs) {
            return Err(CoreError::Config(format!(
                "activity duration range is empty: [{}, {})",
                self.activity_min_secs, self.activity_max_secs
            )));
        }
        Ok(())
    }

    /// Multiplier applied to movement speed and phase timers.
    #[inline]
    pub fn movement_scale(&self, time_scale: f32) -> f32 {
        time_scale / self.base_time_scale
    }

    /// Construct a `Calendar` pre-configured for this run.
    pub fn make_calendar(&self) -> Calendar {
        Calendar::starting_at(self.start_hour, self.time_scale)
    }
}
