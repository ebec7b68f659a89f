//! Movement commands: the scheduler's only way to change movement phase.

use nt_core::Vec2;

/// A request from the scheduler to an agent's movement tracker.
///
/// Commands are applied in the order issued, before the tracker's next
/// integration step observes the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementCommand {
    /// Enter the `Planning` phase: reset the phase timer and stop moving.
    BeginPlanning,

    /// Enter the `Moving` phase toward a pixel-space target.
    MoveTo(Vec2),

    /// Drop to `Idle` immediately, abandoning any pending step.
    Halt,
}
