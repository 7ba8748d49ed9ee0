//! Block - one occupant of a grid cell
//!
//! Blocks are plain values. Moving a block between cells copies it into the
//! destination and clears the source; nothing holds a reference across cells.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::cell_origin;
use crate::consts::*;

/// Default fill for dynamic blocks (sand)
pub const SAND_COLOR: [u8; 4] = [194, 178, 128, 255];
/// Default fill for static blocks (stone)
pub const STONE_COLOR: [u8; 4] = [128, 128, 128, 255];

/// Physical and visual state of a grid occupant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Top-left corner in pixels; equals `cell * TILE_SIZE` at rest
    pub world_position: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    /// RGBA fill (not used by physics)
    pub color: [u8; 4],
    /// Static blocks are immovable obstacles regardless of other fields
    pub is_dynamic: bool,
    /// Inverse mass; `<= 0` means infinite mass (never integrated)
    pub inv_mass: f32,
    /// Forces queued for the next step; zero between completed steps
    pub force_accum: Vec2,
    /// Friction coefficient (>= 0). A touching pair uses the geometric mean.
    pub friction: f32,
    /// Multiplier on global gravity
    pub gravity_scale: f32,

    // Derived by the engine, read-only for hosts
    #[serde(default)]
    pub(crate) acceleration: Vec2,
    #[serde(default)]
    pub(crate) needs_collision_resolution: bool,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            world_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: [255, 109, 194, 255],
            is_dynamic: false,
            inv_mass: DEFAULT_INV_MASS,
            force_accum: Vec2::ZERO,
            friction: DEFAULT_FRICTION,
            gravity_scale: DEFAULT_GRAVITY_SCALE,
            acceleration: Vec2::ZERO,
            needs_collision_resolution: false,
        }
    }
}

impl Block {
    /// A dynamic (sand) block aligned to `cell`
    pub fn dynamic_at(cell: IVec2) -> Self {
        Self {
            world_position: cell_origin(cell),
            color: SAND_COLOR,
            is_dynamic: true,
            ..Self::default()
        }
    }

    /// A static (stone) block aligned to `cell`
    pub fn static_at(cell: IVec2) -> Self {
        Self {
            world_position: cell_origin(cell),
            color: STONE_COLOR,
            is_dynamic: false,
            ..Self::default()
        }
    }

    /// Queue a force for the next step. Constant forces must be re-added every step.
    #[inline]
    pub fn add_force(&mut self, force: Vec2) {
        self.force_accum += force;
    }

    /// Change velocity immediately. Heavier blocks need a stronger impulse.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inv_mass;
    }

    /// Acceleration computed during the last step (`force_accum * inv_mass`)
    #[inline]
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// True between integration and the end of this block's collision resolution
    #[inline]
    pub fn needs_collision_resolution(&self) -> bool {
        self.needs_collision_resolution
    }

    /// Mass, or infinity for `inv_mass <= 0`
    #[inline]
    pub fn mass(&self) -> f32 {
        if self.inv_mass > 0.0 {
            1.0 / self.inv_mass
        } else {
            f32::INFINITY
        }
    }

    /// Dynamic and integrable (finite mass)
    #[inline]
    pub fn is_simulated(&self) -> bool {
        self.is_dynamic && self.inv_mass > 0.0
    }

    /// World position is exactly the origin of `cell`
    pub fn is_aligned_at(&self, cell: IVec2) -> bool {
        self.world_position == cell_origin(cell)
    }

    /// No velocity and no acceleration
    pub fn is_resting(&self) -> bool {
        self.velocity == Vec2::ZERO && self.acceleration == Vec2::ZERO
    }
}
