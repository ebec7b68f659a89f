//! TOML scenario files: config, map, zones, homes and agents in one document.
//!
//! # Format
//!
//! ```toml
//! grid = [
//!     "##########",
//!     "#........#",
//!     "#..~~....#",
//!     "##########",
//! ]
//! homes = ["Home", "Home_2"]          # optional; default pool otherwise
//!
//! [sim]                               # optional; any SimConfig field
//! seed       = 7
//! start_hour = 9
//!
//! [[zones]]
//! name   = "Work"
//! x      = 1
//! y      = 1
//! width  = 3
//! height = 2
//! categories = ["work"]               # optional; inferred from the name
//!
//! [[agents]]
//! name  = "Alice"
//! cell  = [2, 1]                      # optional; omitted means unplaced
//! speed = 80.0                        # optional; px/s
//! ```
//!
//! Grid glyphs: `.` open, `#` wall, `~` water, `T` forest, `,` grass,
//! `=` path.

use serde::Deserialize;

use nt_agent::{AgentRngs, AgentStore, AgentStoreBuilder};
use nt_behavior::{BehaviorModel, HomeRegistry};
use nt_core::{Cell, SimConfig};
use nt_mobility::is_valid_speed;
use nt_spatial::{CategorySet, Grid, Router, SpatialError, Zone, ZoneCategory, ZoneMap};

use crate::{Sim, SimBuilder, SimError, SimResult};

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub sim: SimConfig,

    /// One string per grid row.
    pub grid: Vec<String>,

    /// Home pool, in allocation order.
    #[serde(default)]
    pub homes: Option<Vec<String>>,

    #[serde(default)]
    pub zones: Vec<ZoneSpec>,

    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneSpec {
    pub name:   String,
    pub x:      i32,
    pub y:      i32,
    pub width:  u32,
    pub height: u32,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSpec {
    pub name: String,
    #[serde(default)]
    pub cell: Option<[i32; 2]>,
    #[serde(default)]
    pub speed: Option<f32>,
}

impl Scenario {
    /// Parse a scenario.  Agent speed overrides must be positive and finite.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let scenario: Scenario = toml::from_str(text)?;
        for (index, agent) in scenario.agents.iter().enumerate() {
            if let Some(speed) = agent.speed.filter(|&s| !is_valid_speed(s)) {
                return Err(SimError::InvalidSpeed { index, speed });
            }
        }
        Ok(scenario)
    }

    pub fn grid(&self) -> SimResult<Grid> {
        Ok(Grid::from_rows(self.grid.as_slice())?)
    }

    /// Zones with categories resolved once: explicit lists are parsed, missing
    /// ones are inferred from the zone name.
    pub fn zone_map(&self) -> SimResult<ZoneMap> {
        let mut zones = Vec::with_capacity(self.zones.len());
        for spec in &self.zones {
            let zone = match &spec.categories {
                None => Zone::new(spec.name.as_str(), spec.x, spec.y, spec.width, spec.height),
                Some(names) => {
                    let categories = names
                        .iter()
                        .map(|n| n.parse::<ZoneCategory>())
                        .collect::<Result<CategorySet, SpatialError>>()?;
                    Zone::with_categories(spec.name.as_str(), spec.x, spec.y, spec.width, spec.height, categories)
                }
            };
            zones.push(zone);
        }
        Ok(ZoneMap::from_zones(zones)?)
    }

    pub fn home_registry(&self) -> HomeRegistry {
        match &self.homes {
            Some(pool) => HomeRegistry::new(pool.iter().cloned()),
            None => HomeRegistry::default(),
        }
    }

    /// Agent records in file order, placed at the centre of their cell.
    /// Cells outside `grid` are rejected.
    pub fn agent_store(&self, grid: &Grid) -> SimResult<(AgentStore, AgentRngs)> {
        let mut builder = AgentStoreBuilder::new(self.sim.seed);
        for spec in &self.agents {
            builder = match spec.cell {
                Some([x, y]) => {
                    let cell = Cell::new(x, y);
                    if !grid.in_bounds(cell) {
                        return Err(SpatialError::OutOfBounds(cell).into());
                    }
                    builder.agent(spec.name.as_str(), cell.center(self.sim.cell_size))
                }
                None => builder.unplaced(spec.name.as_str()),
            };
        }
        Ok(builder.build())
    }

    /// A builder with every part of the scenario filled in.
    pub fn builder<B: BehaviorModel, R: Router + 'static>(
        &self,
        behavior: B,
        router:   R,
    ) -> SimResult<SimBuilder<B, R>> {
        let grid = self.grid()?;
        let zones = self.zone_map()?;
        let (agents, rngs) = self.agent_store(&grid)?;
        let speeds = self.agents.iter().map(|a| a.speed).collect();

        Ok(SimBuilder::new(self.sim.clone(), agents, rngs, behavior, router)
            .grid(grid)
            .zones(zones)
            .homes(self.home_registry())
            .speeds(speeds))
    }

    pub fn build<B: BehaviorModel, R: Router + 'static>(&self, behavior: B, router: R) -> SimResult<Sim<B, R>> {
        self.builder(behavior, router)?.build()
    }
}
