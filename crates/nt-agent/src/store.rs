//! Core agent storage: `AgentStore` (SoA records) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! A scheduler pass needs `&mut AgentRngs` (to draw zone choices and activity
//! durations) while it also writes labels into `AgentStore` and reads
//! positions.  Keeping the RNGs in a separate struct lets both borrows live
//! side by side as disjoint fields of the owning simulation.

use nt_core::{AgentId, AgentRng, Vec2};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`].
pub struct AgentRngs {
    seed:      u64,
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { seed: global_seed, inner }
    }

    /// Seed and append the RNG for a newly spawned agent.
    pub fn push(&mut self, agent: AgentId) {
        debug_assert_eq!(agent.index(), self.inner.len());
        self.inner.push(AgentRng::new(self.seed, agent));
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentRng> {
        self.inner.get_mut(agent.index())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for the generic per-agent records the
/// scheduler consumes.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them.  Despawned agents keep their slot (ids are never
/// reused) with every record cleared.
pub struct AgentStore {
    /// Number of agent slots.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Continuous pixel-space position.  `None` when the agent is not placed.
    pub position: Vec<Option<Vec2>>,

    /// Descriptive name, if the agent has one.
    pub name: Vec<Option<String>>,

    /// Display label sink: free text shown to the user.  Never read by the
    /// scheduler's decision logic.
    pub label: Vec<String>,
}

impl AgentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            count:    0,
            position: Vec::new(),
            name:     Vec::new(),
            label:    Vec::new(),
        }
    }

    /// `true` if there are no agent slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Append a new agent slot and return its id.
    pub fn push_agent(&mut self, name: Option<String>, position: Option<Vec2>) -> AgentId {
        let id = AgentId(self.count as u32);
        self.position.push(position);
        self.name.push(name);
        self.label.push(String::new());
        self.count += 1;
        id
    }

    /// Clear every record of `agent`.  The slot stays allocated.
    pub fn clear(&mut self, agent: AgentId) {
        let i = agent.index();
        if i >= self.count {
            return;
        }
        self.position[i] = None;
        self.name[i] = None;
        self.label[i].clear();
    }

    // ── Record access ─────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, agent: AgentId) -> Option<Vec2> {
        self.position.get(agent.index()).copied().flatten()
    }

    #[inline]
    pub fn position_mut(&mut self, agent: AgentId) -> Option<&mut Vec2> {
        self.position.get_mut(agent.index()).and_then(Option::as_mut)
    }

    /// The agent's name, or `"Unknown"` when it has none.
    pub fn display_name(&self, agent: AgentId) -> &str {
        self.name
            .get(agent.index())
            .and_then(Option::as_deref)
            .unwrap_or("Unknown")
    }

    pub fn label(&self, agent: AgentId) -> Option<&str> {
        self.label.get(agent.index()).map(String::as_str)
    }

    /// Overwrite the display label as `"<name>\n<text>"`.
    pub fn set_label(&mut self, agent: AgentId, text: &str) {
        let line = format!("{}\n{}", self.display_name(agent), text);
        if let Some(slot) = self.label.get_mut(agent.index()) {
            *slot = line;
        }
    }
}

impl Default for AgentStore {
    fn default() -> Self {
        Self::new()
    }
}
