//! The movement tracker: applies scheduler commands and integrates positions.

use tracing::{trace, warn};

use nt_agent::AgentStore;
use nt_behavior::MovementCommand;
use nt_core::{AgentId, SimConfig};

use crate::{MobilityError, MobilityResult, MobilityStore, MovementPhase, MovementState};

/// A phase transition produced by [`MobilityEngine::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub agent: AgentId,
    pub from:  MovementPhase,
    pub to:    MovementPhase,
}

/// `true` for a speed an agent can walk at: positive and finite.
#[inline]
pub fn is_valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed > 0.0
}

/// Owns every agent's [`MovementState`] and is the only code that advances
/// phase timers or moves agents.
pub struct MobilityEngine {
    /// All per-agent movement state.
    pub store: MobilityStore,

    /// Speed given to agents tracked without an explicit one.
    pub default_speed: f32,

    pub planning_duration: f32,
    pub arriving_duration: f32,
}

impl MobilityEngine {
    pub fn new(agent_count: usize, default_speed: f32, planning_duration: f32, arriving_duration: f32) -> Self {
        Self {
            store: MobilityStore::new(agent_count),
            default_speed,
            planning_duration,
            arriving_duration,
        }
    }

    /// An engine using the speed and phase durations from `config`.
    pub fn from_config(config: &SimConfig, agent_count: usize) -> Self {
        Self::new(
            agent_count,
            config.walk_speed,
            config.planning_duration_secs,
            config.arriving_duration_secs,
        )
    }

    /// Create an idle movement record for `agent`.
    ///
    /// A speed override that is not a positive finite number is replaced by
    /// the default speed; such an agent could never finish a step.
    pub fn track(&mut self, agent: AgentId, speed: Option<f32>) {
        let speed = match speed {
            Some(s) if is_valid_speed(s) => s,
            Some(s) => {
                warn!(%agent, speed = s, default = self.default_speed, "invalid speed override ignored");
                self.default_speed
            }
            None => self.default_speed,
        };
        let state = MovementState::new(
            speed,
            self.planning_duration,
            self.arriving_duration,
        );
        self.store.insert(agent, state);
    }

    pub fn untrack(&mut self, agent: AgentId) -> Option<MovementState> {
        self.store.remove(agent)
    }

    #[inline]
    pub fn state(&self, agent: AgentId) -> Option<&MovementState> {
        self.store.get(agent)
    }

    #[inline]
    pub fn phase(&self, agent: AgentId) -> Option<MovementPhase> {
        self.store.get(agent).map(|s| s.phase)
    }

    /// Apply a scheduler command, overriding whatever phase the agent is in.
    pub fn apply(&mut self, agent: AgentId, cmd: MovementCommand) -> MobilityResult<()> {
        let state = self.store.get_mut(agent).ok_or(MobilityError::NotTracked(agent))?;
        state.apply(cmd);
        Ok(())
    }

    /// Like [`apply`][Self::apply], but refuses a `MoveTo` while the agent is
    /// `Planning` or `Moving`.
    pub fn request(&mut self, agent: AgentId, cmd: MovementCommand) -> MobilityResult<()> {
        let state = self.store.get_mut(agent).ok_or(MobilityError::NotTracked(agent))?;
        if matches!(cmd, MovementCommand::MoveTo(_)) && !state.can_accept_new_target() {
            return Err(MobilityError::Busy { agent, phase: state.phase });
        }
        state.apply(cmd);
        Ok(())
    }

    /// One integration step of `dt` real seconds at movement `scale`.
    ///
    /// Agents without a movement record or without a position are skipped
    /// untouched.  Returns every phase change, in agent order.
    pub fn update(&mut self, agents: &mut AgentStore, dt: f32, scale: f32) -> Vec<PhaseChange> {
        let mut changes = Vec::new();
        for (i, slot) in self.store.states.iter_mut().enumerate() {
            let agent = AgentId(i as u32);
            let Some(state) = slot.as_mut() else { continue };
            let Some(position) = agents.position_mut(agent) else { continue };

            let from = state.phase;
            if let Some(to) = state.step(position, dt, scale) {
                trace!(%agent, ?from, ?to, "movement phase change");
                changes.push(PhaseChange { agent, from, to });
            }
        }
        changes
    }
}
