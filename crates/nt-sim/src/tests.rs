//! Scheduler and frame-loop tests for nt-sim.

use nt_agent::AgentStoreBuilder;
use nt_behavior::{
    AgentIntent, BehaviorError, BehaviorModel, BehaviorResult, DailyRoutine, HomeRegistry,
    IntentState, MovementCommand, NoopBehavior,
};
use nt_core::{AgentId, Calendar, Cell, CoreError, SimConfig};
use nt_mobility::MovementPhase;
use nt_schedule::Activity;
use nt_spatial::{AStarRouter, CategorySet, Grid, Router, SpatialError, Terrain, Zone, ZoneCategory, ZoneMap};

use crate::{
    EventLog, NoopObserver, ReplanReason, Scenario, Sim, SimBuilder, SimError, SimEvent,
    SimObserver, SimState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f32 = 1.0 / 60.0;
const CELL: f32 = 32.0;

fn config(start_hour: u32) -> SimConfig {
    SimConfig { start_hour, walk_speed: 200.0, ..SimConfig::default() }
}

/// 20×12 town:
///
/// ```text
///  Home (0,0) 3×3   Home_2 (4,0) 3×3   Work (12,0) 4×4
///  Park (0,8) 4×4   Cafe (12,8) 3×3
/// ```
fn town_zones() -> ZoneMap {
    ZoneMap::from_zones([
        Zone::new("Home", 0, 0, 3, 3),
        Zone::new("Home_2", 4, 0, 3, 3),
        Zone::new("Work", 12, 0, 4, 4),
        Zone::new("Cafe", 12, 8, 3, 3),
        Zone::with_categories("Park", 0, 8, 4, 4, [ZoneCategory::Leisure].into_iter().collect()),
    ])
    .unwrap()
}

fn town_sim(start_hour: u32, agents: &[(&str, Cell)]) -> Sim<DailyRoutine, AStarRouter> {
    town_builder(start_hour, agents).build().unwrap()
}

fn town_builder(start_hour: u32, agents: &[(&str, Cell)]) -> SimBuilder<DailyRoutine, AStarRouter> {
    let cfg = config(start_hour);
    let mut builder = AgentStoreBuilder::new(cfg.seed);
    for &(name, cell) in agents {
        builder = builder.agent(name, cell.center(CELL));
    }
    let (store, rngs) = builder.build();
    SimBuilder::new(cfg, store, rngs, DailyRoutine, AStarRouter)
        .grid(Grid::open(20, 12))
        .zones(town_zones())
}

const A: AgentId = AgentId(0);

fn cell_of<B: BehaviorModel, R: Router>(state: &SimState<B, R>, agent: AgentId) -> Cell {
    state.agents.position(agent).unwrap().to_cell(CELL)
}

/// Put `agent` mid-activity at `zone` without going through planning.
fn performing<B: BehaviorModel, R: Router>(
    state:    &mut SimState<B, R>,
    agent:    AgentId,
    zone:     &str,
    activity: Activity,
    timer:    f32,
) {
    let mut intent = AgentIntent::new();
    intent.head_to(zone, activity);
    intent.perform(timer);
    state.intents[agent.index()] = Some(intent);
}

/// Advance frames until `done` holds.  `false` if `limit` frames pass first.
fn run_until<B: BehaviorModel, R: Router + 'static>(
    sim:   &mut Sim<B, R>,
    log:   &mut EventLog,
    limit: u32,
    done:  impl Fn(&SimState<B, R>) -> bool,
) -> bool {
    for _ in 0..limit {
        sim.advance(DT, log);
        if done(&sim.state) {
            return true;
        }
    }
    false
}

fn replans(log: &EventLog) -> usize {
    log.events.iter().filter(|e| matches!(e, SimEvent::Replanned { .. })).count()
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn registers_systems_in_frame_order() {
        let sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let names: Vec<&str> = sim.systems().collect();
        assert_eq!(names, ["calendar", "planning", "movement", "reconcile"]);
    }

    #[test]
    fn every_agent_gets_records_and_a_home() {
        let sim = town_sim(10, &[("Alice", Cell::new(1, 1)), ("Bob", Cell::new(5, 1))]);
        for agent in [AgentId(0), AgentId(1)] {
            assert!(sim.state.intent(agent).unwrap().is_idle());
            assert_eq!(sim.state.phase(agent), Some(MovementPhase::Idle));
        }
        let homes = sim.state.homes.as_ref().unwrap();
        assert_eq!(homes.home_of(AgentId(0)), Some("Home"));
        assert_eq!(homes.home_of(AgentId(1)), Some("Home_2"));
        assert_eq!(sim.state.calendar.hour(), 10);
    }

    #[test]
    fn rng_count_mismatch_errors() {
        let (store, _) = AgentStoreBuilder::new(1)
            .agent("Alice", Cell::new(1, 1).center(CELL))
            .agent("Bob", Cell::new(2, 1).center(CELL))
            .build();
        let (_, rngs) = AgentStoreBuilder::new(1).unplaced("Solo").build();
        let result = SimBuilder::new(config(10), store, rngs, NoopBehavior, AStarRouter).build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { expected: 2, got: 1, .. })));
    }

    #[test]
    fn speed_count_mismatch_errors() {
        let result = town_builder(10, &[("Alice", Cell::new(1, 1))])
            .speeds(vec![None, None])
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { what: "agent speeds", .. })));
    }

    #[test]
    fn speeds_override_the_default() {
        let sim = town_builder(10, &[("Alice", Cell::new(1, 1)), ("Bob", Cell::new(5, 1))])
            .speeds(vec![Some(10.0), None])
            .build()
            .unwrap();
        assert_eq!(sim.state.mobility.state(AgentId(0)).unwrap().speed, 10.0);
        assert_eq!(sim.state.mobility.state(AgentId(1)).unwrap().speed, 200.0);
    }

    #[test]
    fn unusable_speed_overrides_are_rejected() {
        for bad in [0.0, -25.0, f32::NAN, f32::INFINITY] {
            let result = town_builder(10, &[("Alice", Cell::new(1, 1)), ("Bob", Cell::new(5, 1))])
                .speeds(vec![None, Some(bad)])
                .build();
            assert!(
                matches!(result, Err(SimError::InvalidSpeed { index: 1, .. })),
                "speed {bad} accepted"
            );
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let (store, rngs) = AgentStoreBuilder::new(1).build();
        let cfg = SimConfig { cell_size: 0.0, ..SimConfig::default() };
        let result = SimBuilder::new(cfg, store, rngs, NoopBehavior, AStarRouter).build();
        assert!(matches!(result, Err(SimError::Core(CoreError::Config(_)))));
    }

    #[test]
    fn without_homes_has_no_registry() {
        let sim = town_builder(10, &[("Alice", Cell::new(1, 1))]).without_homes().build().unwrap();
        assert!(sim.state.homes.is_none());
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planning {
    use super::*;

    #[test]
    fn work_hours_send_idle_agent_to_work() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        sim.state.planning_pass();

        let intent = sim.state.intent(A).unwrap();
        assert_eq!(intent.state, IntentState::MovingToZone);
        assert_eq!(intent.target(), Some("Work"));
        assert_eq!(intent.activity, Activity::Working);
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Planning));
        assert_eq!(sim.state.agents.label(A), Some("Alice\nMoving to Work"));
    }

    #[test]
    fn planning_entry_fires_on_its_interval() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut log = EventLog::default();
        sim.run_frames(10, DT, &mut log);
        assert!(sim.state.intent(A).unwrap().is_idle());

        sim.run_frames(21, DT, &mut log);
        assert_eq!(log.events[0], SimEvent::Planned {
            agent:    A,
            zone:     "Work".into(),
            activity: Activity::Working,
        });
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Planning));
    }

    #[test]
    fn breakfast_goes_to_the_cafe() {
        let mut sim = town_sim(7, &[("Alice", Cell::new(1, 1))]);
        sim.state.planning_pass();
        assert_eq!(sim.state.intent(A).unwrap().target(), Some("Cafe"));
        assert_eq!(sim.state.intent(A).unwrap().activity, Activity::Eating);
    }

    #[test]
    fn sleep_time_goes_to_assigned_home() {
        let mut sim = town_sim(23, &[("Alice", Cell::new(13, 1)), ("Bob", Cell::new(13, 2))]);
        sim.state.planning_pass();
        assert_eq!(sim.state.intent(AgentId(0)).unwrap().target(), Some("Home"));
        assert_eq!(sim.state.intent(AgentId(1)).unwrap().target(), Some("Home_2"));
        assert_eq!(sim.state.intent(AgentId(1)).unwrap().activity, Activity::Sleeping);
    }

    #[test]
    fn agents_mid_activity_are_left_alone() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(13, 1))]);
        performing(&mut sim.state, A, "Work", Activity::Working, 500.0);
        sim.state.planning_pass();
        assert_eq!(sim.state.intent(A).unwrap().state, IntentState::PerformingActivity);
        assert!(sim.state.events.is_empty());
    }

    #[test]
    fn busy_movement_phase_blocks_planning() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        sim.state.mobility.apply(A, MovementCommand::MoveTo(Cell::new(2, 1).center(CELL))).unwrap();
        sim.state.planning_pass();
        assert!(sim.state.intent(A).unwrap().is_idle());
        assert!(sim.state.events.is_empty());
    }

    #[test]
    fn unresolvable_target_stays_idle_with_label() {
        let mut sim = town_builder(10, &[("Alice", Cell::new(1, 1))])
            .zones(ZoneMap::from_zones([Zone::new("Home", 0, 0, 3, 3)]).unwrap())
            .build()
            .unwrap();
        let mut log = EventLog::default();
        sim.force_tick(0.0, &mut log);

        assert_eq!(log.events, vec![SimEvent::Idled { agent: A, activity: Activity::Working }]);
        assert!(sim.state.intent(A).unwrap().is_idle());
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Idle));
        assert_eq!(sim.state.agents.label(A), Some("Alice\nWorking"));
    }

    #[test]
    fn unplaced_agents_are_skipped() {
        let cfg = config(10);
        let (store, rngs) = AgentStoreBuilder::new(cfg.seed).unplaced("Ghost").build();
        let mut sim = SimBuilder::new(cfg, store, rngs, DailyRoutine, AStarRouter)
            .grid(Grid::open(20, 12))
            .zones(town_zones())
            .build()
            .unwrap();
        let mut log = EventLog::default();
        sim.run_frames(120, DT, &mut log);
        assert!(log.events.is_empty());
        assert!(sim.state.intent(A).unwrap().is_idle());
    }

    #[test]
    fn force_tick_plans_immediately() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut log = EventLog::default();
        sim.force_tick(0.0, &mut log);
        assert!(matches!(log.events.as_slice(), [SimEvent::Planned { .. }]));
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Planning));
    }
}

// ── Plan execution ────────────────────────────────────────────────────────────

#[cfg(test)]
mod execution {
    use super::*;

    #[test]
    fn already_inside_target_starts_activity() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(13, 1))]);
        sim.state.planning_pass();
        sim.state.execute_movement_plan(A);

        let intent = sim.state.intent(A).unwrap();
        assert_eq!(intent.state, IntentState::PerformingActivity);
        assert!((300.0..900.0).contains(&intent.activity_timer), "timer {}", intent.activity_timer);
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Idle));
        assert_eq!(sim.state.agents.label(A), Some("Alice\nWorking"));
    }

    #[test]
    fn sends_agent_one_cell_toward_zone() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        sim.state.planning_pass();
        sim.state.events.clear();
        sim.state.execute_movement_plan(A);

        let movement = sim.state.mobility.state(A).unwrap();
        assert_eq!(movement.phase, MovementPhase::Moving);
        assert_eq!(movement.target.to_cell(CELL).manhattan(Cell::new(1, 1)), 1);
        assert_eq!(movement.target, movement.target.to_cell(CELL).center(CELL));
        assert!(matches!(sim.state.events.as_slice(), [SimEvent::PathStep { .. }]));
        assert_eq!(sim.state.intent(A).unwrap().state, IntentState::MovingToZone);
    }

    #[test]
    fn unreachable_zone_falls_back_to_idle() {
        let mut grid = Grid::open(20, 12);
        for cell in Zone::new("Work", 12, 0, 4, 4).cells() {
            grid.set_terrain(cell, Terrain::Wall).unwrap();
        }
        let mut sim = town_builder(10, &[("Alice", Cell::new(1, 1))]).grid(grid).build().unwrap();
        sim.state.planning_pass();
        sim.state.execute_movement_plan(A);

        assert!(sim.state.intent(A).unwrap().is_idle());
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Idle));
        assert_eq!(
            sim.state.events.last(),
            Some(&SimEvent::NoPath { agent: A, zone: "Work".into() })
        );
    }

    #[test]
    fn vanished_zone_falls_back_to_idle() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        sim.state.planning_pass();
        sim.state.zones.remove("Work");
        sim.state.execute_movement_plan(A);

        assert!(sim.state.intent(A).unwrap().is_idle());
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Idle));
        assert_eq!(
            sim.state.events.last(),
            Some(&SimEvent::TargetVanished { agent: A, zone: "Work".into() })
        );
    }

    #[test]
    fn walks_to_work_one_step_at_a_time() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut log = EventLog::default();
        let arrived = run_until(&mut sim, &mut log, 3_000, |s| {
            s.intent(A).unwrap().state == IntentState::PerformingActivity
        });
        assert!(arrived, "agent never arrived");

        let work = sim.state.zones.get("Work").unwrap();
        assert!(work.contains(cell_of(&sim.state, A)));
        let steps = log.events.iter().filter(|e| matches!(e, SimEvent::PathStep { .. })).count();
        // Nearest Work cell is (12, 1), eleven cells east.
        assert_eq!(steps, 11);
        assert!(matches!(
            log.events.last(),
            Some(SimEvent::Arrived { zone, activity: Activity::Working, .. }) if zone == "Work"
        ));
        assert_eq!(sim.state.agents.label(A), Some("Alice\nWorking"));
    }

    #[test]
    fn idle_agent_with_stale_target_is_not_moved() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut intent = AgentIntent::new();
        intent.head_to("Work", Activity::Working);
        intent.go_idle();
        sim.state.intents[A.index()] = Some(intent);

        sim.state.execute_movement_plan(A);
        assert!(sim.state.intent(A).unwrap().is_idle());
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Idle));
        assert!(sim.state.events.is_empty());

        // Nor does an agent already performing get a fresh start.
        performing(&mut sim.state, A, "Work", Activity::Working, 42.0);
        sim.state.execute_movement_plan(A);
        assert_eq!(sim.state.intent(A).unwrap().activity_timer, 42.0);
        assert!(sim.state.events.is_empty());
    }

    #[test]
    fn planning_pause_hands_off_to_the_first_step() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut log = EventLog::default();
        let stepped = run_until(&mut sim, &mut log, 120, |s| s.phase(A) == Some(MovementPhase::Moving));
        assert!(stepped, "first step never issued");
        assert!(matches!(log.events.as_slice(), [SimEvent::Planned { .. }, SimEvent::PathStep { .. }]));
        assert_eq!(sim.state.intent(A).unwrap().state, IntentState::MovingToZone);
    }

    #[test]
    fn paused_calendar_freezes_movement() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        sim.state.planning_pass();
        sim.state.execute_movement_plan(A);
        sim.state.calendar.pause();
        let before = sim.state.agents.position(A);
        let clock = sim.state.calendar.total_secs();

        sim.run_frames(60, DT, &mut NoopObserver);
        assert_eq!(sim.state.agents.position(A), before);
        assert_eq!(sim.state.calendar.total_secs(), clock);
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Moving));
    }
}

// ── Reconciliation ────────────────────────────────────────────────────────────

#[cfg(test)]
mod reconcile {
    use super::*;

    #[test]
    fn end_of_work_hours_does_not_force_departure() {
        let mut sim = town_sim(16, &[("Alice", Cell::new(13, 1))]);
        performing(&mut sim.state, A, "Work", Activity::Working, 1.0e6);
        sim.state.calendar.advance(59.0); // 16:59
        let mut log = EventLog::default();

        sim.run_frames(120, DT, &mut log);
        assert_eq!(sim.state.calendar.hour(), 17);
        let intent = sim.state.intent(A).unwrap();
        assert_eq!(intent.state, IntentState::PerformingActivity);
        assert_eq!(intent.target(), Some("Work"));
        assert_eq!(replans(&log), 0);
    }

    #[test]
    fn start_of_work_interrupts_breakfast() {
        let mut sim = town_sim(8, &[("Alice", Cell::new(13, 9))]);
        performing(&mut sim.state, A, "Cafe", Activity::Eating, 1.0e6);
        sim.state.calendar.advance(59.5); // 08:59:30
        let mut log = EventLog::default();

        sim.run_frames(10, DT, &mut log);
        assert_eq!(replans(&log), 0, "still breakfast time");

        sim.run_frames(40, DT, &mut log);
        assert!(log.events.contains(&SimEvent::Replanned { agent: A, reason: ReplanReason::Interrupted }));
        let intent = sim.state.intent(A).unwrap();
        assert_eq!(intent.target(), Some("Work"));
        assert_eq!(intent.state, IntentState::MovingToZone);
    }

    #[test]
    fn lunch_interrupts_work() {
        let mut sim = town_sim(11, &[("Alice", Cell::new(13, 1))]);
        performing(&mut sim.state, A, "Work", Activity::Working, 1.0e6);
        sim.state.calendar.advance(59.5); // 11:59:30
        let mut log = EventLog::default();

        sim.run_frames(10, DT, &mut log);
        assert_eq!(replans(&log), 0, "still morning work");

        sim.run_frames(40, DT, &mut log);
        assert_eq!(sim.state.calendar.hour(), 12);
        assert!(log.events.contains(&SimEvent::Replanned { agent: A, reason: ReplanReason::Interrupted }));
        // Work still outranks lunch when planning.
        let intent = sim.state.intent(A).unwrap();
        assert_eq!(intent.target(), Some("Work"));
        assert_eq!(intent.activity, Activity::Working);
    }

    #[test]
    fn expired_timer_replans() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(13, 1))]);
        performing(&mut sim.state, A, "Work", Activity::Working, 10.0);
        let mut log = EventLog::default();

        sim.advance(DT, &mut log);
        assert_eq!(
            log.events[0],
            SimEvent::Replanned { agent: A, reason: ReplanReason::ActivityFinished }
        );
        assert_eq!(sim.state.intent(A).unwrap().state, IntentState::MovingToZone);
        assert_eq!(sim.state.phase(A), Some(MovementPhase::Planning));
    }

    #[test]
    fn timer_counts_down_each_frame() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(13, 1))]);
        performing(&mut sim.state, A, "Work", Activity::Working, 500.0);
        sim.run_frames(3, DT, &mut NoopObserver);
        let expected = 500.0 - 3.0 * sim.state.config.activity_tick_secs;
        assert!((sim.state.intent(A).unwrap().activity_timer - expected).abs() < 1e-3);
    }

    #[test]
    fn sleepers_at_home_ignore_the_timer() {
        let mut sim = town_sim(23, &[("Alice", Cell::new(1, 1))]);
        performing(&mut sim.state, A, "Home", Activity::Relaxing, 1.0);
        let mut log = EventLog::default();

        sim.run_frames(60, DT, &mut log);
        let intent = sim.state.intent(A).unwrap();
        assert_eq!(intent.state, IntentState::PerformingActivity);
        assert_eq!(intent.activity, Activity::Sleeping);
        assert!(intent.activity_timer < 0.0);
        assert_eq!(sim.state.agents.label(A), Some("Alice\nSleeping"));
        assert_eq!(replans(&log), 0);
    }

    #[test]
    fn sleeper_replans_when_the_night_ends() {
        let mut sim = town_sim(5, &[("Alice", Cell::new(1, 1))]);
        performing(&mut sim.state, A, "Home", Activity::Sleeping, 1.0);
        sim.state.calendar.advance(59.5); // 05:59:30
        let mut log = EventLog::default();

        sim.run_frames(10, DT, &mut log);
        assert_eq!(replans(&log), 0);
        sim.run_frames(40, DT, &mut log);
        assert!(log.events.contains(&SimEvent::Replanned {
            agent:  A,
            reason: ReplanReason::ActivityFinished,
        }));
    }
}

// ── Display labels ────────────────────────────────────────────────────────────

#[cfg(test)]
mod labels {
    use super::*;

    fn arrive_at_work<G>(generator: G) -> Sim<DailyRoutine, AStarRouter>
    where
        G: Fn(&str) -> BehaviorResult<String> + 'static,
    {
        let mut sim = town_builder(10, &[("Alice", Cell::new(13, 1))])
            .text_generator(generator)
            .build()
            .unwrap();
        sim.state.planning_pass();
        sim.state.execute_movement_plan(A);
        sim
    }

    #[test]
    fn generator_text_replaces_activity() {
        let sim = arrive_at_work(|prompt: &str| {
            assert!(prompt.contains("Alice") && prompt.contains("Work"));
            Ok("  Typing reports ".to_string())
        });
        assert_eq!(sim.state.agents.label(A), Some("Alice\nTyping reports"));
    }

    #[test]
    fn failing_generator_keeps_plain_label() {
        let sim = arrive_at_work(|_: &str| Err(BehaviorError::TextGeneration("offline".into())));
        assert_eq!(sim.state.agents.label(A), Some("Alice\nWorking"));
        assert_eq!(sim.state.intent(A).unwrap().state, IntentState::PerformingActivity);
    }

    #[test]
    fn blank_generator_output_keeps_plain_label() {
        let sim = arrive_at_work(|_: &str| Ok("   ".to_string()));
        assert_eq!(sim.state.agents.label(A), Some("Alice\nWorking"));
    }
}

// ── Agent lifecycle ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn spawn_creates_records_and_assigns_home() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let cara = sim.spawn_agent("Cara", Some(Cell::new(5, 5).center(CELL)), Some(90.0));

        assert_eq!(cara, AgentId(1));
        assert_eq!(sim.state.rngs.len(), 2);
        assert!(sim.state.intent(cara).unwrap().is_idle());
        assert_eq!(sim.state.mobility.state(cara).unwrap().speed, 90.0);
        assert_eq!(sim.state.homes.as_ref().unwrap().home_of(cara), Some("Home_2"));

        sim.state.planning_pass();
        assert_eq!(sim.state.intent(cara).unwrap().target(), Some("Work"));
    }

    #[test]
    fn spawn_with_unusable_speed_walks_at_default() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let cara = sim.spawn_agent("Cara", Some(Cell::new(1, 2).center(CELL)), Some(0.0));
        assert_eq!(sim.state.mobility.state(cara).unwrap().speed, 200.0);

        let mut log = EventLog::default();
        let arrived = run_until(&mut sim, &mut log, 3_000, |s| {
            s.intent(cara).unwrap().state == IntentState::PerformingActivity
        });
        assert!(arrived, "spawned agent never reached work");
    }

    #[test]
    fn spawning_past_the_pool_is_tolerated() {
        let mut sim = town_builder(23, &[("Alice", Cell::new(13, 1))])
            .homes(HomeRegistry::new(["Home"]))
            .build()
            .unwrap();
        let bob = sim.spawn_agent("Bob", Some(Cell::new(13, 2).center(CELL)), None);
        assert_eq!(sim.state.homes.as_ref().unwrap().home_of(bob), None);

        sim.state.planning_pass();
        // Falls back to the first residential zone.
        assert_eq!(sim.state.intent(bob).unwrap().target(), Some("Home"));
    }

    #[test]
    fn despawn_clears_records_and_releases_home() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        sim.despawn_agent(A).unwrap();

        assert!(sim.state.intent(A).is_none());
        assert!(sim.state.phase(A).is_none());
        assert!(sim.state.agents.position(A).is_none());
        assert_eq!(sim.state.homes.as_ref().unwrap().resident("Home"), None);

        let mut log = EventLog::default();
        sim.run_frames(120, DT, &mut log);
        assert!(log.events.is_empty());
    }

    #[test]
    fn despawn_unknown_agent_errors() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        assert!(matches!(
            sim.despawn_agent(AgentId(9)),
            Err(SimError::Core(CoreError::AgentNotFound(AgentId(9))))
        ));
    }
}

// ── Observation and determinism ───────────────────────────────────────────────

#[cfg(test)]
mod observation {
    use super::*;

    #[derive(Default)]
    struct FrameCounter {
        frames: u64,
        last:   Option<u64>,
        hour:   u32,
    }

    impl SimObserver for FrameCounter {
        fn on_frame_end(&mut self, frame: u64, calendar: &Calendar) {
            self.frames += 1;
            self.last = Some(frame);
            self.hour = calendar.hour();
        }
    }

    #[test]
    fn frame_end_is_reported_every_frame() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut counter = FrameCounter::default();
        sim.run_frames(10, DT, &mut counter);
        assert_eq!(counter.frames, 10);
        assert_eq!(counter.last, Some(9));
        assert_eq!(counter.hour, 10);
        assert_eq!(sim.frame(), 10);
        assert!((sim.elapsed_real_secs() - 10.0 * DT as f64).abs() < 1e-6);
    }

    #[test]
    fn events_are_delivered_once() {
        let mut sim = town_sim(10, &[("Alice", Cell::new(1, 1))]);
        let mut log = EventLog::default();
        sim.force_tick(0.0, &mut log);
        sim.advance(DT, &mut log);
        assert_eq!(log.for_agent(A).filter(|e| matches!(e, SimEvent::Planned { .. })).count(), 1);
        assert!(sim.state.events.is_empty());
    }

    #[test]
    fn same_seed_same_story() {
        let agents = [
            ("Alice", Cell::new(1, 1)),
            ("Bob", Cell::new(5, 1)),
            ("Cara", Cell::new(8, 6)),
        ];
        let run = || {
            let mut sim = town_sim(17, &agents);
            let mut log = EventLog::default();
            sim.run_frames(900, DT, &mut log);
            log.events
        };
        let first = run();
        assert!(!first.is_empty());
        assert_eq!(first, run());
    }

    #[test]
    fn evening_trips_go_to_leisure_zones() {
        let mut sim = town_sim(17, &[("Alice", Cell::new(1, 1)), ("Bob", Cell::new(5, 1))]);
        sim.state.planning_pass();
        for agent in [AgentId(0), AgentId(1)] {
            let intent = sim.state.intent(agent).unwrap();
            assert_eq!(intent.activity, Activity::Relaxing);
            let target = intent.target().unwrap();
            assert!(sim.state.zones.is(target, ZoneCategory::Leisure), "{target}");
            assert!(!sim.state.zones.is(target, ZoneCategory::Home));
        }
    }
}

// ── Scenario files ────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use super::*;

    const TOWN: &str = r#"
grid = [
    "..........",
    "..........",
    "...##.....",
    "...~~.....",
    "..........",
]
homes = ["Home_2", "Home"]

[sim]
seed       = 7
start_hour = 9

[[zones]]
name   = "Home"
x      = 0
y      = 0
width  = 2
height = 2

[[zones]]
name   = "Home_2"
x      = 0
y      = 3
width  = 2
height = 2

[[zones]]
name       = "Office"
x          = 6
y          = 0
width      = 3
height     = 2
categories = ["work"]

[[agents]]
name  = "Alice"
cell  = [1, 1]
speed = 80.0

[[agents]]
name = "Drifter"
"#;

    #[test]
    fn parses_a_full_scenario() {
        let scenario = Scenario::from_toml_str(TOWN).unwrap();
        assert_eq!(scenario.sim.seed, 7);
        assert_eq!(scenario.sim.cell_size, 32.0);

        let grid = scenario.grid().unwrap();
        assert_eq!((grid.width(), grid.height()), (10, 5));
        assert!(!grid.is_passable(Cell::new(3, 2)));

        let zones = scenario.zone_map().unwrap();
        assert_eq!(zones.get("Office").unwrap().categories, [ZoneCategory::Work].into_iter().collect::<CategorySet>());
        assert!(zones.is("Home_2", ZoneCategory::Home));

        let sim = scenario.build(DailyRoutine, AStarRouter).unwrap();
        assert_eq!(sim.state.agents.count, 2);
        assert_eq!(sim.state.mobility.state(AgentId(0)).unwrap().speed, 80.0);
        assert!(sim.state.agents.position(AgentId(1)).is_none());
        assert_eq!(sim.state.homes.as_ref().unwrap().home_of(AgentId(0)), Some("Home_2"));
        assert_eq!(cell_of(&sim.state, AgentId(0)), Cell::new(1, 1));
    }

    #[test]
    fn scenario_agents_follow_explicit_categories() {
        let mut sim = Scenario::from_toml_str(TOWN).unwrap().build(DailyRoutine, AStarRouter).unwrap();
        sim.state.planning_pass();
        assert_eq!(sim.state.intent(AgentId(0)).unwrap().target(), Some("Office"));
        assert!(sim.state.intent(AgentId(1)).unwrap().is_idle());
    }

    #[test]
    fn defaults_apply_without_sim_table() {
        let scenario = Scenario::from_toml_str(r#"grid = ["..", ".."]"#).unwrap();
        assert_eq!(scenario.sim, SimConfig::default());
        assert!(scenario.zones.is_empty() && scenario.agents.is_empty());
        assert_eq!(scenario.home_registry().pool().len(), 6);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let text = r#"
grid = ["...."]
[[zones]]
name = "Mall"
x = 0
y = 0
width = 2
height = 1
categories = ["shopping"]
"#;
        let result = Scenario::from_toml_str(text).unwrap().zone_map();
        assert!(matches!(
            result,
            Err(SimError::Spatial(SpatialError::UnknownCategory(ref c))) if c == "shopping"
        ));
    }

    #[test]
    fn bad_glyph_is_rejected() {
        let result = Scenario::from_toml_str(r#"grid = ["..?"]"#).unwrap().grid();
        assert!(matches!(result, Err(SimError::Spatial(SpatialError::UnknownGlyph { glyph: '?', .. }))));
    }

    #[test]
    fn agent_outside_grid_is_rejected() {
        let text = r#"
grid = ["...."]
[[agents]]
name = "Lost"
cell = [9, 9]
"#;
        let result = Scenario::from_toml_str(text).unwrap().build(NoopBehavior, AStarRouter);
        assert!(matches!(result, Err(SimError::Spatial(SpatialError::OutOfBounds(_)))));
    }

    #[test]
    fn non_positive_agent_speed_is_rejected() {
        let text = r#"
grid = ["...."]
[[agents]]
name = "Fast"
cell = [0, 0]
speed = 60.0

[[agents]]
name  = "Statue"
cell  = [1, 0]
speed = 0.0
"#;
        assert!(matches!(
            Scenario::from_toml_str(text),
            Err(SimError::InvalidSpeed { index: 1, speed }) if speed == 0.0
        ));
    }

    #[test]
    fn malformed_or_unknown_keys_fail_to_parse() {
        assert!(matches!(Scenario::from_toml_str("grid = ["), Err(SimError::Toml(_))));
        assert!(matches!(
            Scenario::from_toml_str("grid = [\".\"]\nweather = \"rain\""),
            Err(SimError::Toml(_))
        ));
    }
}
