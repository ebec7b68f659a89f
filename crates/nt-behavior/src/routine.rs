//! `DailyRoutine`: clock-driven town behavior.
//!
//! # Planning rules
//!
//! The first rule that matches the current hour decides the trip:
//!
//! | Clock            | Activity        | Target                                   |
//! |------------------|-----------------|------------------------------------------|
//! | sleep time       | Sleeping        | assigned home → any Home zone → any zone |
//! | work hours       | Working         | first Work zone                          |
//! | meal time        | Eating          | first Dining zone                        |
//! | Evening period   | Relaxing        | random Leisure zone → random non-home    |
//! | otherwise        | period default  | random non-home zone                     |
//!
//! "First" means first by zone name.  Random choices draw from the agent's
//! own RNG.
//!
//! # Interruptions
//!
//! Three rules are checked independently; any one of them abandons the
//! activity early:
//!
//! - sleep time and the target is not a Home zone;
//! - work hours and the target is not a Work zone;
//! - meal time and the target is not a Dining zone.
//!
//! Work hours and lunch overlap at 12:00, so a worker is pulled out of Work
//! there (and planning sends them straight back).  Leaving work at 17:00 is
//! not an interruption; the agent stays until its timer runs out.  Agents
//! asleep at home ignore the clock until sleep time ends.

use nt_core::{AgentId, AgentRng, DayPeriod, is_meal_time, is_sleep_time, is_work_hours};
use nt_schedule::{Activity, suggested_activity};
use nt_spatial::{Zone, ZoneCategory};

use crate::{AgentIntent, BehaviorModel, Plan, SimContext};

#[derive(Copy, Clone, Debug, Default)]
pub struct DailyRoutine;

impl DailyRoutine {
    /// Zone `agent` should sleep in.
    pub fn home_zone<'c>(&self, agent: AgentId, ctx: &SimContext<'c>) -> Option<&'c str> {
        let assigned = ctx
            .homes
            .and_then(|h| h.home_of(agent))
            .and_then(|home| ctx.zones.get(home));
        if let Some(zone) = assigned {
            return Some(zone.name.as_str());
        }
        ctx.zones
            .first_with_category(ZoneCategory::Home)
            .or_else(|| ctx.zones.iter().next())
            .map(|z| z.name.as_str())
    }

    /// A random leisure zone, or any non-home zone if the map has none.
    pub fn leisure_zone<'c>(&self, ctx: &SimContext<'c>, rng: &mut AgentRng) -> Option<&'c str> {
        let leisure: Vec<&Zone> = ctx
            .zones
            .with_category(ZoneCategory::Leisure)
            .filter(|z| !z.has(ZoneCategory::Home))
            .collect();
        match rng.choose(&leisure).copied() {
            Some(zone) => Some(zone.name.as_str()),
            None => self.any_non_home_zone(ctx, rng),
        }
    }

    /// A uniformly random zone that is not residential.
    pub fn any_non_home_zone<'c>(&self, ctx: &SimContext<'c>, rng: &mut AgentRng) -> Option<&'c str> {
        let candidates: Vec<&Zone> = ctx.zones.iter().filter(|z| !z.has(ZoneCategory::Home)).collect();
        rng.choose(&candidates).copied().map(|z| z.name.as_str())
    }
}

impl BehaviorModel for DailyRoutine {
    fn plan(&self, agent: AgentId, ctx: &SimContext<'_>, rng: &mut AgentRng) -> Plan {
        let hour = ctx.calendar.hour();
        let first = |c: ZoneCategory| ctx.zones.first_with_category(c).map(|z| z.name.as_str());

        let (activity, target) = if is_sleep_time(hour) {
            (Activity::Sleeping, self.home_zone(agent, ctx))
        } else if is_work_hours(hour) {
            (Activity::Working, first(ZoneCategory::Work))
        } else if is_meal_time(hour) {
            (Activity::Eating, first(ZoneCategory::Dining))
        } else if ctx.calendar.period() == DayPeriod::Evening {
            (Activity::Relaxing, self.leisure_zone(ctx, rng))
        } else {
            (suggested_activity(hour), self.any_non_home_zone(ctx, rng))
        };

        Plan { activity, target: target.map(str::to_string) }
    }

    fn should_replan(&self, _agent: AgentId, intent: &AgentIntent, ctx: &SimContext<'_>) -> bool {
        let hour = ctx.calendar.hour();
        let away_from = |c: ZoneCategory| !intent.target().is_some_and(|t| ctx.zones.is(t, c));

        (is_sleep_time(hour) && away_from(ZoneCategory::Home))
            || (is_work_hours(hour) && away_from(ZoneCategory::Work))
            || (is_meal_time(hour) && away_from(ZoneCategory::Dining))
    }

    fn keeps_resting(&self, _agent: AgentId, intent: &AgentIntent, ctx: &SimContext<'_>) -> bool {
        ctx.calendar.is_sleep_time()
            && intent.target().is_some_and(|t| ctx.zones.is(t, ZoneCategory::Home))
    }

    fn arrival_activity(&self, agent: AgentId, intent: &AgentIntent, ctx: &SimContext<'_>) -> Activity {
        if self.keeps_resting(agent, intent, ctx) {
            Activity::Sleeping
        } else {
            intent.activity
        }
    }
}
