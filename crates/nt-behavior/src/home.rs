//! `HomeRegistry`: one-to-one assignment of agents to home zones.
//!
//! # Allocation
//!
//! Homes come from a fixed, ordered pool of zone names.  [`HomeRegistry::assign`]
//! hands out the first free entry and is idempotent: assigning an agent that
//! already has a home returns that home unchanged.  Once every entry is taken,
//! `assign` fails with [`BehaviorError::NoHomeAvailable`]; planning tolerates
//! homeless agents by falling back to any residential zone.
//!
//! Pool names are not checked against the zone map.  A map that lacks some of
//! them simply leaves the agents assigned to those names on the fallback path.

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use nt_core::{AgentId, Vec2};
use nt_spatial::ZoneMap;

use crate::{BehaviorError, BehaviorResult};

/// Home zone names used when a scenario does not list its own.
pub const DEFAULT_HOME_POOL: [&str; 6] = ["Home", "Home_2", "Home_3", "Home_4", "Home_5", "Home_6"];

pub struct HomeRegistry {
    pool:     Vec<String>,
    by_agent: FxHashMap<AgentId, String>,
    by_home:  FxHashMap<String, AgentId>,
}

impl Default for HomeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_POOL)
    }
}

impl HomeRegistry {
    /// A registry allocating from `pool` in order.  Duplicate names are
    /// dropped.
    pub fn new<I, S>(pool: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in pool {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            pool:     names,
            by_agent: FxHashMap::default(),
            by_home:  FxHashMap::default(),
        }
    }

    /// Assign `agent` a home, or return the one it already has.
    pub fn assign(&mut self, agent: AgentId) -> BehaviorResult<&str> {
        if !self.by_agent.contains_key(&agent) {
            let Some(home) = self.pool.iter().find(|h| !self.by_home.contains_key(*h)) else {
                warn!(%agent, "home pool exhausted");
                return Err(BehaviorError::NoHomeAvailable(agent));
            };
            let home = home.clone();
            info!(%agent, %home, "home assigned");
            self.by_home.insert(home.clone(), agent);
            self.by_agent.insert(agent, home);
        }
        self.home_of(agent).ok_or(BehaviorError::NoHomeAvailable(agent))
    }

    /// Release `agent`'s home back to the pool.
    pub fn unassign(&mut self, agent: AgentId) -> Option<String> {
        let home = self.by_agent.remove(&agent)?;
        self.by_home.remove(&home);
        Some(home)
    }

    #[inline]
    pub fn home_of(&self, agent: AgentId) -> Option<&str> {
        self.by_agent.get(&agent).map(String::as_str)
    }

    /// Inverse lookup: who lives in `home`.
    #[inline]
    pub fn resident(&self, home: &str) -> Option<AgentId> {
        self.by_home.get(home).copied()
    }

    /// Every `(agent, home)` pair, ordered by agent id.
    pub fn assignments(&self) -> Vec<(AgentId, &str)> {
        let mut out: Vec<_> = self
            .by_agent
            .iter()
            .map(|(&a, h)| (a, h.as_str()))
            .collect();
        out.sort_by_key(|&(a, _)| a);
        out
    }

    /// Pixel-space centre of `agent`'s home zone, if both exist.
    pub fn home_center(&self, agent: AgentId, zones: &ZoneMap, cell_size: f32) -> Option<Vec2> {
        let zone = zones.get(self.home_of(agent)?)?;
        Some(zone.center_cell().center(cell_size))
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Number of pool entries not yet assigned.
    pub fn available(&self) -> usize {
        self.pool.len() - self.by_home.len()
    }
}
