//! The `MobilityStore`: per-agent movement records.

use nt_core::AgentId;

use crate::MovementState;

/// Movement state for every agent slot, indexed by `AgentId`.
///
/// A slot holds `None` when the agent has no movement record (never placed,
/// or despawned).  Such agents are skipped by every pass.
#[derive(Default)]
pub struct MobilityStore {
    pub states: Vec<Option<MovementState>>,
}

impl MobilityStore {
    /// A store with `agent_count` empty slots.
    pub fn new(agent_count: usize) -> Self {
        Self { states: vec![None; agent_count] }
    }

    /// Write `state` into `agent`'s slot, growing the store if needed.
    pub fn insert(&mut self, agent: AgentId, state: MovementState) {
        let i = agent.index();
        if i >= self.states.len() {
            self.states.resize(i + 1, None);
        }
        self.states[i] = Some(state);
    }

    /// Drop `agent`'s record, returning it.
    pub fn remove(&mut self, agent: AgentId) -> Option<MovementState> {
        self.states.get_mut(agent.index()).and_then(Option::take)
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&MovementState> {
        self.states.get(agent.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut MovementState> {
        self.states.get_mut(agent.index()).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
