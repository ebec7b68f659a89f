//! Per-agent movement state.

use nt_behavior::MovementCommand;
use nt_core::Vec2;

/// Low-level locomotion phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MovementPhase {
    /// Not moving; may be given a new target.
    #[default]
    Idle,
    /// Deciding; a fixed pause before the first step.
    Planning,
    /// Walking toward `target`.
    Moving,
    /// Just reached `target`; a short pause before `Idle`.
    Arriving,
}

/// Movement state for a single agent.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    pub phase: MovementPhase,

    /// Scaled seconds spent in the current phase.
    pub phase_timer: f32,

    /// Pixel-space destination of the current step.
    pub target: Vec2,

    /// Pixels per second at nominal movement scale.
    pub speed: f32,

    /// `true` between `MoveTo` and reaching the target.
    pub is_moving: bool,

    pub planning_duration: f32,
    pub arriving_duration: f32,
}

impl MovementState {
    /// An idle agent with the given speed and phase pauses.
    pub fn new(speed: f32, planning_duration: f32, arriving_duration: f32) -> Self {
        Self {
            phase: MovementPhase::Idle,
            phase_timer: 0.0,
            target: Vec2::ZERO,
            speed,
            is_moving: false,
            planning_duration,
            arriving_duration,
        }
    }

    /// Only `Idle` and `Arriving` agents take a new target without override.
    #[inline]
    pub fn can_accept_new_target(&self) -> bool {
        matches!(self.phase, MovementPhase::Idle | MovementPhase::Arriving)
    }

    pub fn start_planning(&mut self) {
        self.phase = MovementPhase::Planning;
        self.phase_timer = 0.0;
        self.is_moving = false;
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
        self.is_moving = true;
        self.phase = MovementPhase::Moving;
        self.phase_timer = 0.0;
    }

    pub fn halt(&mut self) {
        self.phase = MovementPhase::Idle;
        self.phase_timer = 0.0;
        self.is_moving = false;
    }

    /// Apply a scheduler command unconditionally.
    pub fn apply(&mut self, cmd: MovementCommand) {
        match cmd {
            MovementCommand::BeginPlanning => self.start_planning(),
            MovementCommand::MoveTo(target) => self.set_target(target),
            MovementCommand::Halt => self.halt(),
        }
    }

    /// Advance one integration step of `dt` real seconds at movement `scale`,
    /// moving `position` if walking.
    ///
    /// Returns the new phase if the step changed it.
    pub fn step(&mut self, position: &mut Vec2, dt: f32, scale: f32) -> Option<MovementPhase> {
        self.phase_timer += dt * scale;

        match self.phase {
            MovementPhase::Planning if self.phase_timer >= self.planning_duration => {
                self.phase = MovementPhase::Idle;
                self.phase_timer = 0.0;
                Some(MovementPhase::Idle)
            }
            MovementPhase::Arriving if self.phase_timer >= self.arriving_duration => {
                self.phase = MovementPhase::Idle;
                self.phase_timer = 0.0;
                Some(MovementPhase::Idle)
            }
            MovementPhase::Moving => self.walk(position, dt, scale),
            _ => None,
        }
    }

    fn walk(&mut self, position: &mut Vec2, dt: f32, scale: f32) -> Option<MovementPhase> {
        let delta = self.target - *position;
        let distance = delta.length();
        let travel = self.speed * dt * scale;

        if distance <= travel {
            *position = self.target;
            self.is_moving = false;
            self.phase = MovementPhase::Arriving;
            self.phase_timer = 0.0;
            return Some(MovementPhase::Arriving);
        }

        // Never normalise a zero vector.
        if distance > 0.0 {
            *position = *position + delta * (travel / distance);
        }
        None
    }
}
