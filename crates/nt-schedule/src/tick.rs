//! `TickCoordinator`: runs subsystems at independent rates within one frame.
//!
//! # Model
//!
//! The coordinator is single-threaded and cooperative.  Entries are closures
//! over a caller-supplied context `C` (typically the whole simulation state),
//! each with a name, an interval in real seconds, and a priority.  One
//! [`TickCoordinator::advance`] call per frame fires every due entry exactly
//! once, lowest priority value first.  A slow entry delays every entry after
//! it in the same call; nothing is preempted.
//!
//! Entries with equal priority keep registration order (stable sort on every
//! registration).
//!
//! # Time bookkeeping
//!
//! Totals are kept in `f64` so long runs of small frame deltas do not drift.
//! Intervals are compared against `total - last_fired`, and a fired entry is
//! handed that same elapsed value.

use tracing::debug;

use crate::{ScheduleError, ScheduleResult};

/// Callback invoked with the context and the real seconds since the entry
/// last fired.
pub type TickCallback<C> = Box<dyn FnMut(&mut C, f32)>;

struct TickEntry<C> {
    name:       String,
    interval:   f64,
    priority:   i32,
    last_fired: f64,
    callback:   TickCallback<C>,
}

/// Multi-rate cooperative scheduler over a context `C`.
pub struct TickCoordinator<C> {
    entries:    Vec<TickEntry<C>>,
    total_time: f64,
}

impl<C> Default for TickCoordinator<C> {
    fn default() -> Self {
        Self { entries: Vec::new(), total_time: 0.0 }
    }
}

impl<C> TickCoordinator<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`.
    ///
    /// `interval` is in real seconds; `0.0` means "every frame".  Negative or
    /// non-finite intervals and duplicate names are rejected.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        interval: f32,
        priority: i32,
        callback: F,
    ) -> ScheduleResult<()>
    where
        F: FnMut(&mut C, f32) + 'static,
    {
        let name = name.into();
        if !interval.is_finite() || interval < 0.0 {
            return Err(ScheduleError::InvalidInterval { name, interval });
        }
        if self.entries.iter().any(|e| e.name == name) {
            return Err(ScheduleError::DuplicateEntry(name));
        }

        debug!(entry = %name, interval, priority, "tick entry registered");
        self.entries.push(TickEntry {
            name,
            interval: interval as f64,
            priority,
            last_fired: self.total_time,
            callback: Box::new(callback),
        });
        self.entries.sort_by_key(|e| e.priority);
        Ok(())
    }

    /// Remove the entry named `name`.  Returns `false` if there was none.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    /// Change the interval of an existing entry.
    pub fn set_interval(&mut self, name: &str, interval: f32) -> ScheduleResult<bool> {
        if !interval.is_finite() || interval < 0.0 {
            return Err(ScheduleError::InvalidInterval { name: name.to_string(), interval });
        }
        Ok(match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => {
                e.interval = interval as f64;
                true
            }
            None => false,
        })
    }

    /// Advance global time by `dt` real seconds and fire every due entry.
    pub fn advance(&mut self, ctx: &mut C, dt: f32) {
        self.total_time += dt.max(0.0) as f64;
        let now = self.total_time;
        for entry in &mut self.entries {
            let elapsed = now - entry.last_fired;
            if elapsed >= entry.interval {
                (entry.callback)(ctx, elapsed as f32);
                entry.last_fired = now;
            }
        }
    }

    /// Advance by `dt` and fire every entry regardless of its interval.
    ///
    /// Each entry receives `dt`, not its accumulated elapsed time.
    pub fn force_tick(&mut self, ctx: &mut C, dt: f32) {
        self.total_time += dt.max(0.0) as f64;
        let now = self.total_time;
        for entry in &mut self.entries {
            (entry.callback)(ctx, dt);
            entry.last_fired = now;
        }
    }

    /// Restart every entry's interval from the current time.
    pub fn reset_timers(&mut self) {
        let now = self.total_time;
        for entry in &mut self.entries {
            entry.last_fired = now;
        }
    }

    /// Real seconds accumulated across all `advance` / `force_tick` calls.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Entry names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
