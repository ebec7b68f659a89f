//! The `BehaviorModel` trait: the planning policy extension point.

use nt_core::{AgentId, AgentRng};
use nt_schedule::Activity;

use crate::{AgentIntent, SimContext};

/// Outcome of one planning decision.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub activity: Activity,
    /// Zone to travel to.  `None` means stay put with only the label updated.
    pub target:   Option<String>,
}

impl Plan {
    pub fn go(zone: impl Into<String>, activity: Activity) -> Self {
        Self { activity, target: Some(zone.into()) }
    }

    pub fn stay(activity: Activity) -> Self {
        Self { activity, target: None }
    }
}

/// Pluggable planning policy.
///
/// The scheduler calls the policy; the policy never mutates simulation
/// state.  Per-agent randomness comes from the agent's own [`AgentRng`], so a
/// policy's choices for one agent do not depend on any other agent.
///
/// Only [`plan`][Self::plan] is required.  The remaining hooks have
/// conservative defaults: never interrupt, never rest in place, and label
/// arrivals with the planned activity.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysWork;
///
/// impl BehaviorModel for AlwaysWork {
///     fn plan(&self, _agent: AgentId, _ctx: &SimContext, _rng: &mut AgentRng) -> Plan {
///         Plan::go("Work", Activity::Working)
///     }
/// }
/// ```
pub trait BehaviorModel: Send + Sync + 'static {
    /// Choose the next activity and target zone for an agent.
    fn plan(&self, agent: AgentId, ctx: &SimContext<'_>, rng: &mut AgentRng) -> Plan;

    /// `true` if the clock now contradicts the agent's current target strongly
    /// enough to abandon the activity before its timer runs out.
    fn should_replan(&self, _agent: AgentId, _intent: &AgentIntent, _ctx: &SimContext<'_>) -> bool {
        false
    }

    /// `true` while the agent should stay in its current activity regardless
    /// of the timer or clock boundaries.
    fn keeps_resting(&self, _agent: AgentId, _intent: &AgentIntent, _ctx: &SimContext<'_>) -> bool {
        false
    }

    /// Activity shown when the agent reaches its target zone.
    fn arrival_activity(
        &self,
        _agent: AgentId,
        intent: &AgentIntent,
        _ctx:   &SimContext<'_>,
    ) -> Activity {
        intent.activity
    }
}
