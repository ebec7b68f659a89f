//! `nt-schedule`: what agents do at a given hour, and when each subsystem runs.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`activity`]  | `Activity` labels, `suggested_activity`                   |
//! | [`tick`]      | `TickCoordinator<C>` (multi-rate cooperative scheduler)   |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Frame model (summary)
//!
//! Every real frame the host calls `TickCoordinator::advance(ctx, dt)` once.
//! Each registered entry fires when the time since its own last firing
//! reaches its interval, in ascending priority order:
//!
//! ```text
//! total     += dt
//! elapsed_i  = total - last_fired_i
//! fire_i     = elapsed_i >= interval_i      (interval 0 ⇒ every frame)
//! ```
//!
//! A fired entry receives `elapsed_i`, not the frame `dt`, so a 0.5 s entry
//! that fires after frames of 0.3 s and 0.3 s sees 0.6 s.

pub mod activity;
pub mod error;
pub mod tick;


pub use activity::{Activity, suggested_activity};
pub use error::{ScheduleError, ScheduleResult};
pub use tick::{TickCallback, TickCoordinator};
