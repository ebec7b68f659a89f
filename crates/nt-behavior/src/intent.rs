//! Per-agent goal state.

use nt_schedule::Activity;

/// Coarse goal state of an agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum IntentState {
    #[default]
    Idle,
    MovingToZone,
    PerformingActivity,
}

/// What an agent is trying to do and where.
///
/// Transitions:
///
/// ```text
/// Idle ──plan──▶ MovingToZone ──arrive──▶ PerformingActivity
///  ▲                 │                          │
///  └──fail-soft──────┘◀─────────replan──────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AgentIntent {
    pub state:          IntentState,
    pub target_zone:    Option<String>,
    pub activity:       Activity,
    /// Simulated seconds of activity left.  Only meaningful while
    /// `PerformingActivity`.
    pub activity_timer: f32,
}

impl Default for AgentIntent {
    fn default() -> Self {
        Self {
            state:          IntentState::Idle,
            target_zone:    None,
            activity:       Activity::Resting,
            activity_timer: 0.0,
        }
    }
}

impl AgentIntent {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == IntentState::Idle
    }

    #[inline]
    pub fn target(&self) -> Option<&str> {
        self.target_zone.as_deref()
    }

    /// Start heading to `zone` for `activity`.
    pub fn head_to(&mut self, zone: impl Into<String>, activity: Activity) {
        self.state = IntentState::MovingToZone;
        self.target_zone = Some(zone.into());
        self.activity = activity;
    }

    /// Begin the activity at the target with `duration` simulated seconds.
    pub fn perform(&mut self, duration: f32) {
        self.state = IntentState::PerformingActivity;
        self.activity_timer = duration;
    }

    /// Drop back to `Idle`.  The last target is kept for display.
    pub fn go_idle(&mut self) {
        self.state = IntentState::Idle;
        self.activity_timer = 0.0;
    }
}
