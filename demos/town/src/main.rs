//! town: runs an npc_town scenario headless and reports where everyone is.
//!
//! Without `--scenario` the embedded `town.toml` is used: four residents, a
//! few houses, an office, a cafe and some outdoor spots.  Logging goes
//! through `RUST_LOG` (default `info`), so `RUST_LOG=nt_sim=debug` shows
//! every failed movement command.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nt_behavior::DailyRoutine;
use nt_core::{AgentId, Calendar};
use nt_sim::{Scenario, Sim, SimEvent, SimObserver};
use nt_spatial::AStarRouter;

const DEFAULT_SCENARIO: &str = include_str!("../town.toml");

#[derive(Parser, Debug)]
#[command(name = "town", about = "Headless npc_town run")]
struct Args {
    /// Scenario file (TOML).  Defaults to the built-in town.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Real seconds to simulate.
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Frames per real second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Override the scenario seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario time scale (simulated seconds per real second).
    #[arg(long)]
    time_scale: Option<f32>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Tallies events and logs the clock once per simulated hour.
#[derive(Default)]
struct TownObserver {
    planned:   usize,
    arrived:   usize,
    replanned: usize,
    failures:  usize,
    last_hour: Option<u32>,
}

impl SimObserver for TownObserver {
    fn on_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Planned { .. } => self.planned += 1,
            SimEvent::Arrived { .. } => self.arrived += 1,
            SimEvent::Replanned { .. } => self.replanned += 1,
            SimEvent::NoPath { .. } | SimEvent::TargetVanished { .. } => self.failures += 1,
            SimEvent::Idled { .. } | SimEvent::PathStep { .. } => {}
        }
    }

    fn on_frame_end(&mut self, frame: u64, calendar: &Calendar) {
        if self.last_hour != Some(calendar.hour()) {
            self.last_hour = Some(calendar.hour());
            info!(
                frame,
                day = calendar.day(),
                "{:02}:{:02} ({})",
                calendar.hour(),
                calendar.minute(),
                calendar.period(),
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let text = match &args.scenario {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => DEFAULT_SCENARIO.to_owned(),
    };
    let mut scenario = Scenario::from_toml_str(&text).context("parsing scenario")?;
    if let Some(seed) = args.seed {
        scenario.sim.seed = seed;
    }
    if let Some(scale) = args.time_scale {
        scenario.sim.time_scale = scale;
    }

    let mut sim = scenario
        .build(DailyRoutine, AStarRouter)
        .context("building simulation")?;

    println!("=== town: npc_town ===");
    println!(
        "Agents: {}  |  Zones: {}  |  Seed: {}  |  Time scale: {}x",
        sim.state.agents.count,
        scenario.zones.len(),
        scenario.sim.seed,
        scenario.sim.time_scale,
    );
    println!();

    let fps = args.fps.max(1);
    let frames = (args.seconds.max(0.0) * fps as f32).round() as u64;
    let dt = 1.0 / fps as f32;

    let mut observer = TownObserver::default();
    let started = Instant::now();
    sim.run_frames(frames, dt, &mut observer);
    let wall = started.elapsed();

    let cal = &sim.state.calendar;
    println!(
        "Ran {} frames ({:.1} s simulated real time) in {:.2?}; clock is day {} {:02}:{:02}",
        sim.frame(),
        sim.elapsed_real_secs(),
        wall,
        cal.day(),
        cal.hour(),
        cal.minute(),
    );
    println!(
        "Plans: {}  |  Arrivals: {}  |  Replans: {}  |  Failed moves: {}",
        observer.planned, observer.arrived, observer.replanned, observer.failures,
    );
    println!();

    print_agents(&sim);
    Ok(())
}

fn print_agents(sim: &Sim<DailyRoutine, AStarRouter>) {
    let state = &sim.state;
    println!(
        "{:<10} {:>9}  {:<20} {:<10} {}",
        "agent", "cell", "intent", "phase", "label"
    );
    for agent in state.agents.agent_ids() {
        let cell = match state.agents.position(agent) {
            Some(pos) => {
                let c = pos.to_cell(state.config.cell_size);
                format!("({},{})", c.x, c.y)
            }
            None => "-".to_owned(),
        };
        let intent = describe_intent(sim, agent);
        let phase = state
            .phase(agent)
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "-".to_owned());
        let label = state
            .agents
            .label(agent)
            .and_then(|l| l.split_once('\n').map(|(_, text)| text))
            .unwrap_or("");
        println!(
            "{:<10} {:>9}  {:<20} {:<10} {}",
            state.agents.display_name(agent),
            cell,
            intent,
            phase,
            label
        );
    }
}

fn describe_intent(sim: &Sim<DailyRoutine, AStarRouter>, agent: AgentId) -> String {
    match sim.state.intent(agent) {
        Some(intent) => match intent.target() {
            Some(zone) => format!("{:?} {}", intent.state, zone),
            None => format!("{:?}", intent.state),
        },
        None => "-".to_owned(),
    }
}
