//! Snaps - tile-locked rigid block simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (blocks, grid, forces, collision resolution)
//! - `config`: Tunable simulation constants

pub mod config;
pub mod sim;

pub use config::Config;
pub use sim::{Block, CollisionPass, Engine, Grid, Scene};

use glam::{IVec2, Vec2};

/// Simulation constants
pub mod consts {
    /// Edge length of one grid tile in pixels
    pub const TILE_SIZE: f32 = 16.0;
    /// Default fixed timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Velocity components below this magnitude (px/s) snap to zero after integration
    pub const VELOCITY_EPSILON: f32 = 0.01;

    /// Config defaults
    pub const DEFAULT_GRAVITY: f32 = 200.0;
    pub const DEFAULT_DRAG: f32 = 0.0;
    pub const DEFAULT_SMOOTH_SNAPPING_MIN_VELOCITY: f32 = 20.0;

    /// Block defaults
    pub const DEFAULT_INV_MASS: f32 = 0.5;
    pub const DEFAULT_FRICTION: f32 = 1.0;
    pub const DEFAULT_GRAVITY_SCALE: f32 = 1.0;
}

/// World position of a cell's top-left corner
#[inline]
pub fn cell_origin(cell: IVec2) -> Vec2 {
    cell.as_vec2() * consts::TILE_SIZE
}

/// Cell containing a world position (floor division, so negative positions map left/up)
#[inline]
pub fn world_to_cell(pos: Vec2) -> IVec2 {
    (pos / consts::TILE_SIZE).floor().as_ivec2()
}
