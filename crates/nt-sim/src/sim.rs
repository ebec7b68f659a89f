//! The `Sim` struct, the behavior scheduler passes, and the frame loop.

use tracing::{debug, info, trace, warn};

use nt_agent::{AgentRngs, AgentStore};
use nt_behavior::{
    AgentIntent, BehaviorModel, HomeRegistry, IntentState, MovementCommand, Plan, SimContext,
    TextGenerator, arrival_prompt,
};
use nt_core::{AgentId, Calendar, CoreError, SimConfig, Vec2};
use nt_mobility::{MobilityEngine, MovementPhase};
use nt_schedule::{Activity, TickCoordinator};
use nt_spatial::{Grid, Router, ZoneMap};

use crate::{ReplanReason, SimEvent, SimObserver, SimResult};

/// Tick entry names, in execution order.
pub const CALENDAR_SYSTEM: &str = "calendar";
pub const PLANNING_SYSTEM: &str = "planning";
pub const MOVEMENT_SYSTEM: &str = "movement";
pub const RECONCILE_SYSTEM: &str = "reconcile";

/// Borrow the read-only half of a `SimState` as a `SimContext`.
///
/// Expands to explicit field borrows so the caller may hold `&mut` to other
/// fields (RNGs, intents) while the context is live.
macro_rules! context {
    ($s:expr) => {
        SimContext::new(
            &$s.calendar,
            &$s.grid,
            &$s.zones,
            $s.homes.as_ref(),
            &$s.agents,
            $s.config.cell_size,
        )
    };
}

enum Review {
    Continue,
    Rest,
    Replan(ReplanReason),
}

// ── SimState ──────────────────────────────────────────────────────────────────

/// Everything the tick entries operate on.
///
/// The behavior scheduler lives here as a set of passes.  Each pass walks the
/// agents in id order and runs to completion; agents lacking a position, a
/// movement record or an intent are skipped without touching their other
/// records.
pub struct SimState<B: BehaviorModel, R: Router> {
    pub config: SimConfig,

    /// Simulated time.  Advanced only by the calendar tick entry.
    pub calendar: Calendar,

    pub grid:  Grid,
    pub zones: ZoneMap,

    /// Home assignments; `None` runs without a registry.
    pub homes: Option<HomeRegistry>,

    pub agents: AgentStore,
    pub rngs:   AgentRngs,

    /// Movement phase tracker.  The scheduler only talks to it through
    /// `MovementCommand`s.
    pub mobility: MobilityEngine,

    /// Per-agent intent, indexed by `AgentId`.  Owned and written only by the
    /// scheduler passes below.
    pub intents: Vec<Option<AgentIntent>>,

    pub behavior: B,
    pub router:   R,

    pub(crate) text:   Option<Box<dyn TextGenerator>>,
    pub(crate) events: Vec<SimEvent>,
}

impl<B: BehaviorModel, R: Router> SimState<B, R> {
    #[inline]
    pub fn intent(&self, agent: AgentId) -> Option<&AgentIntent> {
        self.intents.get(agent.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn phase(&self, agent: AgentId) -> Option<MovementPhase> {
        self.mobility.phase(agent)
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Give every idle agent a new plan.
    ///
    /// Only agents whose intent is `Idle` and whose movement phase is `Idle`
    /// are considered.  Decisions are collected against a read-only context
    /// first and applied afterwards in agent order.
    pub fn planning_pass(&mut self) {
        let ctx = context!(self);
        let mut plans = Vec::new();
        for agent in self.agents.agent_ids() {
            let Some(intent) = self.intents.get(agent.index()).and_then(Option::as_ref) else {
                continue;
            };
            if !intent.is_idle() || self.mobility.phase(agent) != Some(MovementPhase::Idle) {
                continue;
            }
            if self.agents.position(agent).is_none() {
                continue;
            }
            let Some(rng) = self.rngs.get_mut(agent) else { continue };
            plans.push((agent, self.behavior.plan(agent, &ctx, rng)));
        }

        for (agent, plan) in plans {
            self.start_plan(agent, plan);
        }
    }

    /// Record `plan` in the agent's intent and ask the tracker to pause for
    /// planning.  A plan whose target is missing from the map leaves the agent
    /// idle with only its label updated.
    fn start_plan(&mut self, agent: AgentId, plan: Plan) {
        let Plan { activity, target } = plan;
        let target = target.filter(|zone| self.zones.get(zone).is_some());
        let Some(intent) = self.intents.get_mut(agent.index()).and_then(Option::as_mut) else {
            return;
        };

        match target {
            Some(zone) => {
                intent.head_to(zone.clone(), activity);
                self.agents.set_label(agent, &format!("Moving to {zone}"));
                self.command(agent, MovementCommand::BeginPlanning);
                debug!(%agent, %zone, %activity, "trip planned");
                self.events.push(SimEvent::Planned { agent, zone, activity });
            }
            None => {
                intent.go_idle();
                intent.activity = activity;
                self.agents.set_label(agent, activity.label());
                trace!(%agent, %activity, "no target zone");
                self.events.push(SimEvent::Idled { agent, activity });
            }
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Integrate positions and phase timers.  Frozen while the calendar is
    /// paused.
    pub fn movement_pass(&mut self, dt: f32) {
        if self.calendar.is_paused() {
            return;
        }
        let scale = self.config.movement_scale(self.calendar.time_scale());
        self.mobility.update(&mut self.agents, dt, scale);
    }

    // ── Reconciliation ────────────────────────────────────────────────────

    /// Arrival detection followed by the activity tick.  Runs every frame,
    /// after movement integration.
    pub fn reconcile_pass(&mut self) {
        self.arrival_pass();
        self.activity_pass();
    }

    /// Agents heading somewhere whose last step (or planning pause) has
    /// finished either start their activity or take the next step.
    fn arrival_pass(&mut self) {
        let cell_size = self.config.cell_size;
        for i in 0..self.agents.count {
            let agent = AgentId(i as u32);
            let Some(intent) = self.intent(agent) else { continue };
            if intent.state != IntentState::MovingToZone {
                continue;
            }
            let Some(target) = intent.target_zone.clone() else { continue };
            let Some(movement) = self.mobility.state(agent) else { continue };
            if movement.phase != MovementPhase::Idle || movement.is_moving {
                continue;
            }
            let Some(position) = self.agents.position(agent) else { continue };

            let cell = position.to_cell(cell_size);
            match self.zones.get(&target).map(|zone| zone.contains(cell)) {
                None => self.fall_back_to_idle(agent, SimEvent::TargetVanished { agent, zone: target }),
                Some(true) => self.arrive(agent, target),
                Some(false) => self.execute_movement_plan(agent),
            }
        }
    }

    /// Count down running activities and replan the ones that are over or
    /// contradicted by the clock.  Agents still heading somewhere are handed
    /// on by the arrival pass once their planning pause ends.
    fn activity_pass(&mut self) {
        let tick = self.config.activity_tick_secs;
        for i in 0..self.agents.count {
            let agent = AgentId(i as u32);
            if self.agents.position(agent).is_none() || self.mobility.state(agent).is_none() {
                continue;
            }
            let Some(intent) = self.intents.get_mut(i).and_then(Option::as_mut) else { continue };
            if intent.state != IntentState::PerformingActivity {
                continue;
            }
            intent.activity_timer -= tick;
            self.review_activity(agent);
        }
    }

    fn review_activity(&mut self, agent: AgentId) {
        let review = {
            let ctx = context!(self);
            let Some(intent) = self.intents.get(agent.index()).and_then(Option::as_ref) else {
                return;
            };
            if self.behavior.keeps_resting(agent, intent, &ctx) {
                Review::Rest
            } else if intent.activity_timer <= 0.0 {
                Review::Replan(ReplanReason::ActivityFinished)
            } else if self.behavior.should_replan(agent, intent, &ctx) {
                Review::Replan(ReplanReason::Interrupted)
            } else {
                Review::Continue
            }
        };

        match review {
            Review::Continue => {}
            Review::Rest => {
                let Some(intent) = self.intents.get_mut(agent.index()).and_then(Option::as_mut) else {
                    return;
                };
                if intent.activity != Activity::Sleeping {
                    intent.activity = Activity::Sleeping;
                    self.agents.set_label(agent, Activity::Sleeping.label());
                }
            }
            Review::Replan(reason) => self.replan(agent, reason),
        }
    }

    fn replan(&mut self, agent: AgentId, reason: ReplanReason) {
        let ctx = context!(self);
        let Some(rng) = self.rngs.get_mut(agent) else { return };
        let plan = self.behavior.plan(agent, &ctx, rng);
        debug!(%agent, ?reason, "replanning");
        self.events.push(SimEvent::Replanned { agent, reason });
        self.start_plan(agent, plan);
    }

    // ── Plan execution ────────────────────────────────────────────────────

    /// Hand an agent whose plan is ready to the movement tracker.
    ///
    /// Agents not heading to a zone are left alone.  Otherwise re-reads the
    /// agent's cell, then:
    ///
    /// - target zone gone: intent and phase drop to `Idle`;
    /// - already inside the zone: the activity starts at once;
    /// - otherwise the agent is sent one cell along the shortest route, or
    ///   drops to `Idle` when there is none.
    ///
    /// Only the next cell is committed; the route is searched again from
    /// wherever the agent stands after each step.
    pub fn execute_movement_plan(&mut self, agent: AgentId) {
        let cell_size = self.config.cell_size;
        let Some(target) = self
            .intent(agent)
            .filter(|i| i.state == IntentState::MovingToZone)
            .and_then(|i| i.target_zone.clone())
        else {
            return;
        };
        let Some(position) = self.agents.position(agent) else { return };
        if self.mobility.state(agent).is_none() {
            return;
        }

        let cell = position.to_cell(cell_size);
        match self.zones.get(&target).map(|zone| zone.contains(cell)) {
            None => self.fall_back_to_idle(agent, SimEvent::TargetVanished { agent, zone: target }),
            Some(true) => self.arrive(agent, target),
            Some(false) => {
                let path = self.router.find_path_to_zone(&self.grid, &self.zones, cell, &target);
                match path.get(1) {
                    Some(&next) => {
                        self.command(agent, MovementCommand::MoveTo(next.center(cell_size)));
                        debug!(%agent, %next, zone = %target, remaining = path.len() - 1, "path step");
                        self.events.push(SimEvent::PathStep { agent, next });
                    }
                    None => {
                        warn!(%agent, zone = %target, from = %cell, "no path to zone");
                        self.fall_back_to_idle(agent, SimEvent::NoPath { agent, zone: target });
                    }
                }
            }
        }
    }

    /// Start the planned activity at `zone`.
    fn arrive(&mut self, agent: AgentId, zone: String) {
        let activity = {
            let ctx = context!(self);
            let Some(intent) = self.intents.get(agent.index()).and_then(Option::as_ref) else {
                return;
            };
            self.behavior.arrival_activity(agent, intent, &ctx)
        };
        let (min, max) = (self.config.activity_min_secs, self.config.activity_max_secs);
        let Some(rng) = self.rngs.get_mut(agent) else { return };
        let duration = rng.gen_range(min..max);

        if let Some(intent) = self.intents.get_mut(agent.index()).and_then(Option::as_mut) {
            intent.activity = activity;
            intent.perform(duration);
        }
        self.command(agent, MovementCommand::Halt);

        let text = self.activity_text(agent, activity, &zone);
        self.agents.set_label(agent, &text);
        info!(%agent, %zone, %activity, duration, "arrived");
        self.events.push(SimEvent::Arrived { agent, zone, activity, duration });
    }

    fn fall_back_to_idle(&mut self, agent: AgentId, event: SimEvent) {
        if let Some(intent) = self.intents.get_mut(agent.index()).and_then(Option::as_mut) {
            intent.go_idle();
        }
        self.command(agent, MovementCommand::Halt);
        self.events.push(event);
    }

    fn command(&mut self, agent: AgentId, cmd: MovementCommand) {
        if let Err(e) = self.mobility.apply(agent, cmd) {
            debug!(%agent, error = %e, "movement command dropped");
        }
    }

    /// Label text for an arrival.  Uses the text generator when one is set
    /// and it answers with something non-empty.
    fn activity_text(&self, agent: AgentId, activity: Activity, zone: &str) -> String {
        let plain = activity.label();
        let Some(generator) = self.text.as_deref() else {
            return plain.to_string();
        };
        let prompt = arrival_prompt(self.agents.display_name(agent), plain, zone);
        match generator.generate(&prompt) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => plain.to_string(),
            Err(e) => {
                debug!(%agent, error = %e, "label generation failed");
                plain.to_string()
            }
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Add an agent with fresh intent and movement records, and give it a
    /// home if the registry has one left.  A `speed` that is not positive and
    /// finite is replaced by `config.walk_speed`.
    pub fn spawn_agent(
        &mut self,
        name:     impl Into<String>,
        position: Option<Vec2>,
        speed:    Option<f32>,
    ) -> AgentId {
        let agent = self.agents.push_agent(Some(name.into()), position);
        self.rngs.push(agent);
        self.mobility.track(agent, speed);
        if self.intents.len() <= agent.index() {
            self.intents.resize(agent.index() + 1, None);
        }
        self.intents[agent.index()] = Some(AgentIntent::new());

        if let Some(homes) = self.homes.as_mut() {
            // Exhaustion is logged by the registry; planning falls back to
            // any residential zone.
            let _ = homes.assign(agent);
        }
        info!(%agent, name = self.agents.display_name(agent), "agent spawned");
        agent
    }

    /// Clear every record of `agent` and release its home.
    pub fn despawn_agent(&mut self, agent: AgentId) -> SimResult<()> {
        if agent.index() >= self.agents.count {
            return Err(CoreError::AgentNotFound(agent).into());
        }
        self.agents.clear(agent);
        self.mobility.untrack(agent);
        if let Some(slot) = self.intents.get_mut(agent.index()) {
            *slot = None;
        }
        if let Some(homes) = self.homes.as_mut() {
            homes.unassign(agent);
        }
        info!(%agent, "agent despawned");
        Ok(())
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim<B, R>` owns the [`SimState`] and a [`TickCoordinator`] with four
/// entries, fired in this order within a frame:
///
/// | Entry       | Interval                        | Work                          |
/// |-------------|---------------------------------|-------------------------------|
/// | `calendar`  | every frame                     | advance simulated time        |
/// | `planning`  | `config.planning_interval_secs` | plan trips for idle agents    |
/// | `movement`  | `config.movement_interval_secs` | integrate phases and positions|
/// | `reconcile` | every frame                     | arrivals, activity timers     |
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorModel, R: Router + 'static> {
    pub state:   SimState<B, R>,
    coordinator: TickCoordinator<SimState<B, R>>,
    frame:       u64,
}

impl<B: BehaviorModel, R: Router + 'static> Sim<B, R> {
    pub(crate) fn new(state: SimState<B, R>) -> SimResult<Self> {
        let mut coordinator = TickCoordinator::new();
        let config = &state.config;

        coordinator.register(CALENDAR_SYSTEM, 0.0, 0, |s: &mut SimState<B, R>, dt| {
            s.calendar.advance(dt)
        })?;
        coordinator.register(PLANNING_SYSTEM, config.planning_interval_secs, 1, |s: &mut SimState<B, R>, _| {
            s.planning_pass()
        })?;
        coordinator.register(MOVEMENT_SYSTEM, config.movement_interval_secs, 2, |s: &mut SimState<B, R>, dt| {
            s.movement_pass(dt)
        })?;
        coordinator.register(RECONCILE_SYSTEM, 0.0, 3, |s: &mut SimState<B, R>, _| {
            s.reconcile_pass()
        })?;

        Ok(Self { state, coordinator, frame: 0 })
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run one frame of `dt` real seconds, then report its events.
    pub fn advance<O: SimObserver>(&mut self, dt: f32, observer: &mut O) {
        self.coordinator.advance(&mut self.state, dt);
        self.finish_frame(observer);
    }

    /// Like [`advance`][Self::advance] but fires every entry regardless of
    /// its interval.
    pub fn force_tick<O: SimObserver>(&mut self, dt: f32, observer: &mut O) {
        self.coordinator.force_tick(&mut self.state, dt);
        self.finish_frame(observer);
    }

    /// Run `frames` frames of `dt` real seconds each.
    pub fn run_frames<O: SimObserver>(&mut self, frames: u64, dt: f32, observer: &mut O) {
        for _ in 0..frames {
            self.advance(dt, observer);
        }
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Real seconds fed to the coordinator so far.
    pub fn elapsed_real_secs(&self) -> f64 {
        self.coordinator.total_time()
    }

    /// Tick entry names in execution order.
    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.coordinator.names()
    }

    /// Change how often one of the tick entries runs.
    pub fn set_system_interval(&mut self, system: &str, interval: f32) -> SimResult<bool> {
        Ok(self.coordinator.set_interval(system, interval)?)
    }

    pub fn set_text_generator(&mut self, generator: impl TextGenerator + 'static) {
        self.state.text = Some(Box::new(generator));
    }

    pub fn spawn_agent(
        &mut self,
        name:     impl Into<String>,
        position: Option<Vec2>,
        speed:    Option<f32>,
    ) -> AgentId {
        self.state.spawn_agent(name, position, speed)
    }

    pub fn despawn_agent(&mut self, agent: AgentId) -> SimResult<()> {
        self.state.despawn_agent(agent)
    }

    fn finish_frame<O: SimObserver>(&mut self, observer: &mut O) {
        for event in self.state.events.drain(..) {
            observer.on_event(&event);
        }
        observer.on_frame_end(self.frame, &self.state.calendar);
        self.frame += 1;
    }
}
