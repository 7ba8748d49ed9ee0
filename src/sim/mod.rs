//! Deterministic simulation module
//!
//! Everything that moves blocks lives here. This module must stay pure and
//! deterministic:
//! - Caller-supplied timestep only
//! - Stable sweep order (rows bottom-to-top, columns left-to-right)
//! - No rendering or platform dependencies

pub mod block;
pub mod collision;
pub mod engine;
pub mod forces;
pub mod grid;
pub mod scene;

pub use block::{Block, SAND_COLOR, STONE_COLOR};
pub use collision::{CollisionPass, Outcome, Resolution, resolve_block};
pub use engine::Engine;
pub use grid::Grid;
pub use scene::Scene;
