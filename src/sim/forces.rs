//! Force accumulation and integration
//!
//! Runs in two sweeps. The accumulation sweep reads neighbours and computes
//! each block's net force, the integration sweep applies them. No block ever
//! sees a neighbour that has already been integrated this step, so the result
//! does not depend on iteration order.

use glam::{IVec2, Vec2};

use super::block::Block;
use super::grid::Grid;
use crate::cell_origin;
use crate::config::Config;
use crate::consts::*;

/// Net force and (possibly adjusted) velocity for one block, ready to integrate
#[derive(Debug, Clone, Copy)]
struct ForceUpdate {
    cell: IVec2,
    force: Vec2,
    velocity: Vec2,
}

/// Accumulate forces for every dynamic block, then integrate them
pub fn apply_forces(grid: &mut Grid, config: &Config, dt: f32) {
    let updates: Vec<ForceUpdate> = grid
        .blocks()
        .filter(|(_, block)| block.is_dynamic)
        .map(|(cell, block)| accumulate(grid, cell, block, config, dt))
        .collect();

    for update in updates {
        let Some(block) = grid.get_mut(update.cell) else {
            continue;
        };
        if block.inv_mass <= 0.0 {
            block.force_accum = Vec2::ZERO;
            continue;
        }
        block.force_accum = update.force;
        block.velocity = update.velocity;
        integrate(block, dt);
    }
}

fn accumulate(grid: &Grid, cell: IVec2, block: &Block, config: &Config, dt: f32) -> ForceUpdate {
    if block.inv_mass <= 0.0 {
        return ForceUpdate {
            cell,
            force: Vec2::ZERO,
            velocity: block.velocity,
        };
    }

    let driving = block.force_accum + gravity_force(block, config);
    let mut resistance = Vec2::ZERO;

    if let Some((surface, perp)) = sliding_surface(grid, cell, block, driving) {
        let along = 1 - perp;
        let v = block.velocity[along];
        if v != 0.0 {
            let mu = (block.friction * surface.friction).max(0.0).sqrt();
            let mut normal = driving[perp].abs();
            if perp == 1 && driving.y > 0.0 {
                normal += stacked_load(grid, cell, block, config);
            }
            resistance[along] = -v.signum() * mu * block.mass() * normal;
        }
    }

    if config.drag > 0.0 {
        resistance += drag_force(block.velocity, config.drag, dt);
    }

    // Resistance may stop a block but never push it backwards
    let mass = block.mass();
    for axis in 0..2 {
        let limit = mass * block.velocity[axis].abs() / dt;
        if resistance[axis].abs() >= limit && resistance[axis] != 0.0 {
            log::trace!("Resistance stops block at {cell} on axis {axis}");
            resistance[axis] = resistance[axis].signum() * limit;
        }
    }

    let (force, velocity) = smooth_snap(
        cell,
        block,
        driving + resistance,
        config.smooth_snapping_min_velocity,
        dt,
    );

    ForceUpdate {
        cell,
        force,
        velocity,
    }
}

/// Gravity as a force, so heavier blocks fall at the same rate
#[inline]
pub fn gravity_force(block: &Block, config: &Config) -> Vec2 {
    Vec2::new(0.0, config.gravity * block.gravity_scale * block.mass())
}

/// Weight of the dynamic column resting on a block.
///
/// Walks up while each block touches the one beneath it and shares its column.
fn stacked_load(grid: &Grid, cell: IVec2, block: &Block, config: &Config) -> f32 {
    let mut load = 0.0;
    let mut below = block;
    let mut above = cell - IVec2::Y;
    while let Some(stacked) = grid.in_bounds(above).then(|| grid.get(above)).flatten() {
        if !stacked.is_dynamic || stacked.inv_mass <= 0.0 {
            break;
        }
        let gap = below.world_position - stacked.world_position;
        if gap.y > TILE_SIZE || gap.x.abs() >= TILE_SIZE {
            break;
        }
        load += gravity_force(stacked, config).y;
        below = stacked;
        above -= IVec2::Y;
    }
    load
}

/// The neighbour a block is pressed against and slides along, if any.
///
/// The surface sits on the dominant axis of the net force. Returns the
/// surface block and the index of the axis perpendicular to it.
fn sliding_surface<'a>(
    grid: &'a Grid,
    cell: IVec2,
    block: &Block,
    force: Vec2,
) -> Option<(&'a Block, usize)> {
    if force == Vec2::ZERO {
        return None;
    }
    let perp = if force.y.abs() >= force.x.abs() { 1 } else { 0 };
    let along = 1 - perp;

    let mut offset = IVec2::ZERO;
    offset[perp] = force[perp].signum() as i32;
    let surface_cell = cell + offset;
    if !grid.in_bounds(surface_cell) {
        return None;
    }
    let surface = grid.get(surface_cell)?;

    let gap = (surface.world_position - block.world_position).abs();
    let touching = gap.x <= TILE_SIZE && gap.y <= TILE_SIZE;
    let surface_still = surface.velocity[along] == 0.0;
    let pressing = block.velocity[perp] * force[perp].signum() >= 0.0;

    (touching && surface_still && pressing).then_some((surface, perp))
}

/// Linear drag opposing each velocity component.
///
/// Components slower than one pixel per step are left alone.
pub fn drag_force(velocity: Vec2, drag: f32, dt: f32) -> Vec2 {
    if velocity.length() <= VELOCITY_EPSILON {
        return Vec2::ZERO;
    }
    let min_speed = 1.0 / dt;
    let mut force = Vec2::ZERO;
    for axis in 0..2 {
        if velocity[axis].abs() >= min_speed {
            force[axis] = -velocity[axis] * drag;
        }
    }
    force
}

/// Let a slowing block glide onto the tile origin ahead of it instead of
/// stopping a few pixels short.
///
/// Applies per axis when the origin is still ahead, won't be reached this
/// step, and the decelerating force would stop the block before it.
fn smooth_snap(
    cell: IVec2,
    block: &Block,
    mut force: Vec2,
    min_speed: f32,
    dt: f32,
) -> (Vec2, Vec2) {
    let mut velocity = block.velocity;
    let origin = cell_origin(cell);

    for axis in 0..2 {
        let v = velocity[axis];
        if v == 0.0 {
            continue;
        }
        let dir = v.signum();
        let remaining = dir * (origin[axis] - block.world_position[axis]);
        if remaining <= 0.0 {
            continue;
        }
        let speed = v.abs().max(min_speed);
        if remaining - speed * dt <= 0.0 {
            continue;
        }
        let decel = -dir * force[axis] * block.inv_mass;
        if decel <= 0.0 {
            continue;
        }
        if v * v / (2.0 * decel) < remaining {
            force[axis] = 0.0;
            velocity[axis] = dir * speed;
        }
    }

    (force, velocity)
}

/// Semi-implicit Euler step. Marks the block for collision resolution.
pub fn integrate(block: &mut Block, dt: f32) {
    block.acceleration = block.force_accum * block.inv_mass;
    block.velocity += block.acceleration * dt;
    if block.velocity.x.abs() < VELOCITY_EPSILON {
        block.velocity.x = 0.0;
    }
    if block.velocity.y.abs() < VELOCITY_EPSILON {
        block.velocity.y = 0.0;
    }
    block.world_position += block.velocity * dt;
    block.force_accum = Vec2::ZERO;
    block.needs_collision_resolution = true;
}
