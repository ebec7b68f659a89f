//! Fluent builder for constructing a [`Sim`].

use nt_agent::{AgentRngs, AgentStore};
use nt_behavior::{AgentIntent, BehaviorModel, HomeRegistry, TextGenerator};
use nt_core::{AgentId, SimConfig};
use nt_mobility::{MobilityEngine, is_valid_speed};
use nt_spatial::{Grid, Router, ZoneMap};

use crate::sim::SimState;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<B, R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, cell size, time scale, tick intervals, …
/// - [`AgentStore`] + [`AgentRngs`]: from [`nt_agent::AgentStoreBuilder`]
/// - `B: BehaviorModel`: the planning policy (e.g. [`nt_behavior::DailyRoutine`])
/// - `R: Router`: the path search (e.g. [`nt_spatial::AStarRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                  |
/// |----------------------|------------------------------------------|
/// | `.grid(g)`           | 1×1 open grid                            |
/// | `.zones(z)`          | no zones                                 |
/// | `.homes(h)`          | `HomeRegistry::default()`                |
/// | `.without_homes()`   | (registry present)                       |
/// | `.speeds(v)`         | every agent walks at `config.walk_speed` |
/// | `.text_generator(t)` | none; labels use the plain activity name |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(config.seed)
///     .agent("Alice", Cell::new(1, 1).center(config.cell_size))
///     .build();
/// let mut sim = SimBuilder::new(config, store, rngs, DailyRoutine, AStarRouter)
///     .grid(grid)
///     .zones(zones)
///     .build()?;
/// sim.run_frames(600, 1.0 / 60.0, &mut NoopObserver);
/// ```
pub struct SimBuilder<B: BehaviorModel, R: Router> {
    config:   SimConfig,
    agents:   AgentStore,
    rngs:     AgentRngs,
    grid:     Option<Grid>,
    zones:    Option<ZoneMap>,
    homes:    Option<HomeRegistry>,
    speeds:   Option<Vec<Option<f32>>>,
    text:     Option<Box<dyn TextGenerator>>,
    behavior: B,
    router:   R,
}

impl<B: BehaviorModel, R: Router + 'static> SimBuilder<B, R> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:   SimConfig,
        agents:   AgentStore,
        rngs:     AgentRngs,
        behavior: B,
        router:   R,
    ) -> Self {
        Self {
            config,
            agents,
            rngs,
            grid:   None,
            zones:  None,
            homes:  Some(HomeRegistry::default()),
            speeds: None,
            text:   None,
            behavior,
            router,
        }
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn zones(mut self, zones: ZoneMap) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Allocate homes from `homes` instead of the default pool.
    pub fn homes(mut self, homes: HomeRegistry) -> Self {
        self.homes = Some(homes);
        self
    }

    /// Run without a home registry.  Sleeping agents then head for the first
    /// residential zone.
    pub fn without_homes(mut self) -> Self {
        self.homes = None;
        self
    }

    /// Per-agent walking speed overrides (must be length `agent_count`).
    /// `None` entries use `config.walk_speed`; others must be positive and
    /// finite.
    pub fn speeds(mut self, speeds: Vec<Option<f32>>) -> Self {
        self.speeds = Some(speeds);
        self
    }

    pub fn text_generator(mut self, generator: impl TextGenerator + 'static) -> Self {
        self.text = Some(Box::new(generator));
        self
    }

    /// Validate inputs, create movement and intent records, assign homes in
    /// agent order, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B, R>> {
        self.config.validate()?;
        let agent_count = self.agents.count;

        // ── Validate and resolve optional inputs ──────────────────────────
        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }

        let speeds = match self.speeds {
            Some(s) => {
                if s.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      s.len(),
                        what:     "agent speeds",
                    });
                }
                if let Some((index, speed)) = s
                    .iter()
                    .enumerate()
                    .find_map(|(i, v)| v.filter(|&sp| !is_valid_speed(sp)).map(|sp| (i, sp)))
                {
                    return Err(SimError::InvalidSpeed { index, speed });
                }
                s
            }
            None => vec![None; agent_count],
        };

        // ── Per-agent records ─────────────────────────────────────────────
        let mut mobility = MobilityEngine::from_config(&self.config, agent_count);
        for (i, &speed) in speeds.iter().enumerate() {
            mobility.track(AgentId(i as u32), speed);
        }
        let intents = vec![Some(AgentIntent::new()); agent_count];

        let mut homes = self.homes;
        if let Some(registry) = homes.as_mut() {
            for agent in self.agents.agent_ids() {
                // Homeless agents are tolerated; exhaustion is logged.
                let _ = registry.assign(agent);
            }
        }

        let state = SimState {
            calendar: self.config.make_calendar(),
            config:   self.config,
            grid:     self.grid.unwrap_or_else(|| Grid::open(1, 1)),
            zones:    self.zones.unwrap_or_default(),
            homes,
            agents:   self.agents,
            rngs:     self.rngs,
            mobility,
            intents,
            behavior: self.behavior,
            router:   self.router,
            text:     self.text,
            events:   Vec::new(),
        };
        Sim::new(state)
    }
}
