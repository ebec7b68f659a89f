//! `nt-spatial`: tile grid, named zones, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`grid`]    | `Grid`, `Tile`, `Terrain`                                   |
//! | [`zone`]    | `Zone`, `ZoneCategory`, `CategorySet`, `ZoneMap` (R-tree)   |
//! | [`router`]  | `Router` trait, `AStarRouter`                               |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Terrain` and `ZoneCategory`. |
//!
//! Loading grids from map files and editing them interactively happen outside
//! this crate; it only offers the read queries routing and planning need plus
//! a few mutators for callers that own the map.

pub mod error;
pub mod grid;
pub mod router;
pub mod zone;


pub use error::{SpatialError, SpatialResult};
pub use grid::{Grid, Terrain, Tile};
pub use router::{AStarRouter, Router};
pub use zone::{CategorySet, Zone, ZoneCategory, ZoneMap};
