//! Scheduler events and the observer trait for progress reporting.

use nt_core::{AgentId, Calendar, Cell};
use nt_schedule::Activity;

/// Why an agent in the middle of an activity was sent back to planning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplanReason {
    /// The activity timer ran out.
    ActivityFinished,
    /// The clock now demands a different kind of place.
    Interrupted,
}

/// Something the behavior scheduler did to one agent.
///
/// Events are queued during a frame and handed to the [`SimObserver`] by
/// [`Sim::advance`][crate::Sim::advance] once every tick entry has run.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// A trip was chosen; the agent is now pausing to plan it.
    Planned { agent: AgentId, zone: String, activity: Activity },

    /// No target zone could be resolved; the agent stays put.
    Idled { agent: AgentId, activity: Activity },

    /// The agent was sent one cell further along its route.
    PathStep { agent: AgentId, next: Cell },

    /// The agent reached its target zone and started the activity.
    Arrived { agent: AgentId, zone: String, activity: Activity, duration: f32 },

    /// No route to the target zone exists.  The agent fell back to idle.
    NoPath { agent: AgentId, zone: String },

    /// The target zone disappeared from the map.  The agent fell back to idle.
    TargetVanished { agent: AgentId, zone: String },

    /// The current activity was abandoned for a new plan.
    Replanned { agent: AgentId, reason: ReplanReason },
}

impl SimEvent {
    pub fn agent(&self) -> AgentId {
        match *self {
            SimEvent::Planned { agent, .. }
            | SimEvent::Idled { agent, .. }
            | SimEvent::PathStep { agent, .. }
            | SimEvent::Arrived { agent, .. }
            | SimEvent::NoPath { agent, .. }
            | SimEvent::TargetVanished { agent, .. }
            | SimEvent::Replanned { agent, .. } => agent,
        }
    }
}

/// Callbacks invoked by [`Sim::advance`][crate::Sim::advance].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: arrival printer
///
/// ```rust,ignore
/// struct Arrivals;
///
/// impl SimObserver for Arrivals {
///     fn on_event(&mut self, event: &SimEvent) {
///         if let SimEvent::Arrived { agent, zone, .. } = event {
///             println!("{agent} reached {zone}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once per scheduler event, in the order the events happened.
    fn on_event(&mut self, _event: &SimEvent) {}

    /// Called at the end of every frame, after all events were delivered.
    fn on_frame_end(&mut self, _frame: u64, _calendar: &Calendar) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records every event it sees.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    /// Events concerning `agent`, oldest first.
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.agent() == agent)
    }
}

impl SimObserver for EventLog {
    fn on_event(&mut self, event: &SimEvent) {
        self.events.push(event.clone());
    }
}
