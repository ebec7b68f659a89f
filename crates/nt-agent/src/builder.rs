//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use nt_agent::AgentStoreBuilder;
//! use nt_core::Vec2;
//!
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .agent("Alice", Vec2::new(16.0, 16.0))
//!     .agent("Bob", Vec2::new(48.0, 16.0))
//!     .build();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(rngs.len(), 2);
//! ```

use nt_core::Vec2;

use crate::{AgentRngs, AgentStore};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    seed:   u64,
    agents: Vec<(Option<String>, Option<Vec2>)>,
}

impl AgentStoreBuilder {
    /// Create a builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, agents: Vec::new() }
    }

    /// Add a named agent placed at `position`.
    pub fn agent(mut self, name: impl Into<String>, position: Vec2) -> Self {
        self.agents.push((Some(name.into()), Some(position)));
        self
    }

    /// Add an agent with no position record.  The scheduler skips it until a
    /// position is written.
    pub fn unplaced(mut self, name: impl Into<String>) -> Self {
        self.agents.push((Some(name.into()), None));
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.  Agent ids follow insertion
    /// order starting at 0.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let mut store = AgentStore::new();
        for (name, position) in self.agents {
            store.push_agent(name, position);
        }
        let rngs = AgentRngs::new(store.count, self.seed);
        (store, rngs)
    }
}
