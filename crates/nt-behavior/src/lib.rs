//! `nt-behavior`: what agents intend to do, and the policy that decides it.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`intent`]   | `AgentIntent`, `IntentState` (per-agent goal state machine)     |
//! | [`command`]  | `MovementCommand` (scheduler → movement tracker messages)       |
//! | [`home`]     | `HomeRegistry` (agent ↔ home zone assignment)                   |
//! | [`context`]  | `SimContext<'a>` (read-only snapshot handed to the policy)      |
//! | [`model`]    | `BehaviorModel` trait, `Plan`                                   |
//! | [`routine`]  | `DailyRoutine` (the clock-driven town policy)                   |
//! | [`noop`]     | `NoopBehavior` (agents that never travel)                       |
//! | [`text`]     | `TextGenerator` (optional label enrichment)                     |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Design notes
//!
//! The scheduler in nt-sim owns every `AgentIntent` and is the only writer.
//! It asks a `BehaviorModel` for decisions (where to go, whether to abandon
//! the current activity) through `&SimContext`, so policies never mutate
//! simulation state.  Movement is requested by emitting `MovementCommand`s;
//! the movement tracker applies them, so the two state machines only meet at
//! that message boundary.

pub mod command;
pub mod context;
pub mod error;
pub mod home;
pub mod intent;
pub mod model;
pub mod noop;
pub mod routine;
pub mod text;


pub use command::MovementCommand;
pub use context::SimContext;
pub use error::{BehaviorError, BehaviorResult};
pub use home::{DEFAULT_HOME_POOL, HomeRegistry};
pub use intent::{AgentIntent, IntentState};
pub use model::{BehaviorModel, Plan};
pub use noop::NoopBehavior;
pub use routine::DailyRoutine;
pub use text::{TextGenerator, arrival_prompt};
