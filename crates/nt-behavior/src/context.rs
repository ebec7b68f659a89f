//! Read-only simulation state passed to every behavior callback.

use nt_agent::AgentStore;
use nt_core::Calendar;
use nt_spatial::{Grid, ZoneMap};

use crate::HomeRegistry;

/// A read-only snapshot of the world passed to every
/// [`BehaviorModel`][crate::BehaviorModel] callback.
///
/// Built by nt-sim for the duration of one scheduler pass.  Nothing in it can
/// be mutated while it is live.
pub struct SimContext<'a> {
    /// Current simulated time.
    pub calendar: &'a Calendar,

    pub grid: &'a Grid,

    pub zones: &'a ZoneMap,

    /// Home assignments.  `None` when the simulation runs without a registry;
    /// policies then fall back to residential zones by category.
    pub homes: Option<&'a HomeRegistry>,

    /// Read-only view of every agent's records.
    pub agents: &'a AgentStore,

    /// Edge length of one grid cell in pixels.
    pub cell_size: f32,
}

impl<'a> SimContext<'a> {
    #[inline]
    pub fn new(
        calendar:  &'a Calendar,
        grid:      &'a Grid,
        zones:     &'a ZoneMap,
        homes:     Option<&'a HomeRegistry>,
        agents:    &'a AgentStore,
        cell_size: f32,
    ) -> Self {
        Self { calendar, grid, zones, homes, agents, cell_size }
    }
}
