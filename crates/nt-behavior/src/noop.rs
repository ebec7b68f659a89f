//! A no-op behavior model: agents never travel.

use nt_core::{AgentId, AgentRng};
use nt_schedule::suggested_activity;

use crate::{BehaviorModel, Plan, SimContext};

/// A [`BehaviorModel`] that never picks a target zone.
///
/// Agents keep the clock's suggested activity as their label and stay where
/// they are.  Useful for background populations and in tests.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {
    fn plan(&self, _agent: AgentId, ctx: &SimContext<'_>, _rng: &mut AgentRng) -> Plan {
        Plan::stay(suggested_activity(ctx.calendar.hour()))
    }
}
