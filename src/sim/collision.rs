//! Tile-by-tile collision resolution
//!
//! A block only ever moves between adjacent cells. When its position passes
//! its own cell origin in the direction of travel it wants the next cell, and
//! the resolvers here decide whether it claims that cell, stops against it, or
//! waits for the occupant to move first (a deferred contact).

use glam::{IVec2, Vec2};

use super::block::Block;
use super::grid::Grid;
use crate::cell_origin;
use crate::config::Config;
use crate::consts::TILE_SIZE;

const X: usize = 0;
const Y: usize = 1;

/// Which sweep a resolution belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPass {
    /// Main bottom-to-top sweep. The only pass allowed to defer.
    First,
    /// Draining a row's right-facing deferred contacts
    SecondHorizontal,
    /// Draining the upward deferred contacts; horizontal is already done
    SecondVertical,
}

impl CollisionPass {
    #[inline]
    pub fn may_defer(self) -> bool {
        self == CollisionPass::First
    }
}

/// Result of resolving one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Cell the block occupies afterwards
    pub cell: IVec2,
    /// Block is waiting on a moving neighbour and must be revisited
    pub deferred: bool,
}

impl Resolution {
    fn settled(cell: IVec2) -> Self {
        Self {
            cell,
            deferred: false,
        }
    }

    fn deferred(cell: IVec2) -> Self {
        Self {
            cell,
            deferred: true,
        }
    }
}

/// What happened to a block when the sweep visited its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Empty, static, or already resolved this step
    Skipped,
    /// Fully resolved; the block now lives at this cell
    Resolved(IVec2),
    /// Waiting on the block to its right
    DeferredHorizontal(IVec2),
    /// Waiting on the block above
    DeferredVertical(IVec2),
}

/// Resolve the block at `cell` for the given pass.
///
/// The block is taken out as a copy, resolved, and written back to whatever
/// cell it ends in.
pub fn resolve_block(
    grid: &mut Grid,
    cell: IVec2,
    pass: CollisionPass,
    config: &Config,
) -> Outcome {
    let Some(mut block) = *grid.at(cell) else {
        return Outcome::Skipped;
    };
    if !block.is_dynamic || !block.needs_collision_resolution {
        return Outcome::Skipped;
    }

    let mut current = cell;
    if pass != CollisionPass::SecondVertical {
        let horizontal = resolve_horizontal(grid, current, &mut block, pass);
        current = horizontal.cell;
        if horizontal.deferred {
            grid.insert(current, block);
            return Outcome::DeferredHorizontal(current);
        }
    }

    let vertical = resolve_vertical(grid, current, &mut block, pass, config);
    current = vertical.cell;
    if !vertical.deferred {
        block.needs_collision_resolution = false;
    }
    grid.insert(current, block);

    if vertical.deferred {
        Outcome::DeferredVertical(current)
    } else {
        Outcome::Resolved(current)
    }
}

/// Dynamic and not yet resolved this step
#[inline]
fn is_moving(block: &Block) -> bool {
    block.is_dynamic && block.needs_collision_resolution
}

/// Zero velocity and acceleration on one axis and snap onto the cell origin
fn stop(block: &mut Block, cell: IVec2, axis: usize) {
    block.velocity[axis] = 0.0;
    block.acceleration[axis] = 0.0;
    block.world_position[axis] = cell_origin(cell)[axis];
}

/// Index of the tile containing the block's centre along `axis`
#[inline]
fn center_tile(position: Vec2, axis: usize) -> i32 {
    ((position[axis] + TILE_SIZE * 0.5) / TILE_SIZE).floor() as i32
}

/// Blocks straddling two rows (or columns) also collide with what sits in the
/// one their centre is in.
fn blocked_by_overlap(grid: &Grid, cell: IVec2, target: IVec2, block: &Block, axis: usize) -> bool {
    let cross = 1 - axis;
    let center = center_tile(block.world_position, cross);
    if center == cell[cross] {
        return false;
    }
    let mut spill = target;
    spill[cross] = center;
    grid.is_occupied(spill)
}

/// Speed needed to cross a whole tile against the current deceleration
#[inline]
fn crossing_speed(block: &Block, axis: usize, dir: f32) -> f32 {
    let decel = (-dir * block.acceleration[axis]).max(0.0);
    (2.0 * decel * TILE_SIZE).sqrt()
}

/// Stationary, unforced, yet off-grid on this axis: snap it back
fn align_stationary(block: &mut Block, cell: IVec2, axis: usize) {
    if block.velocity[axis] != 0.0 || block.acceleration[axis] != 0.0 {
        return;
    }
    let origin = cell_origin(cell)[axis];
    if block.world_position[axis] != origin {
        log::debug!(
            "Snapping stationary block at {cell} from {} to {origin} on axis {axis}",
            block.world_position[axis]
        );
        block.world_position[axis] = origin;
    }
}

/// Shared claim logic for sideways and upward moves.
///
/// Only moves toward cells the sweep has not reached yet (`defers_toward`)
/// may wait on a moving occupant.
fn resolve_toward(
    grid: &mut Grid,
    cell: IVec2,
    block: &mut Block,
    pass: CollisionPass,
    axis: usize,
    defers_toward: bool,
) -> Resolution {
    let v = block.velocity[axis];
    if v == 0.0 {
        align_stationary(block, cell, axis);
        return Resolution::settled(cell);
    }

    let dir = v.signum();
    let origin = cell_origin(cell)[axis];
    if dir * (block.world_position[axis] - origin) <= 0.0 {
        return Resolution::settled(cell);
    }

    let mut target = cell;
    target[axis] += dir as i32;

    if !grid.in_bounds(target) {
        stop(block, cell, axis);
        return Resolution::settled(cell);
    }

    if let Some(occupant) = grid.get(target) {
        if defers_toward && pass.may_defer() && is_moving(occupant) {
            log::trace!("Deferring block at {cell} behind moving block at {target}");
            return Resolution::deferred(cell);
        }
        stop(block, cell, axis);
        return Resolution::settled(cell);
    }

    // Held at the origin with its speed intact, so it moves on once it clears
    if blocked_by_overlap(grid, cell, target, block, axis) {
        block.world_position[axis] = cell_origin(cell)[axis];
        return Resolution::settled(cell);
    }

    if v.abs() < crossing_speed(block, axis, dir) {
        stop(block, cell, axis);
        return Resolution::settled(cell);
    }

    grid.relocate(cell, target);
    Resolution::settled(target)
}

/// Resolve movement along x. Only rightward contacts can be deferred.
pub fn resolve_horizontal(
    grid: &mut Grid,
    cell: IVec2,
    block: &mut Block,
    pass: CollisionPass,
) -> Resolution {
    let rightward = block.velocity.x > 0.0;
    resolve_toward(grid, cell, block, pass, X, rightward)
}

/// Resolve movement along y. Upward contacts can be deferred, falling never is.
pub fn resolve_vertical(
    grid: &mut Grid,
    cell: IVec2,
    block: &mut Block,
    pass: CollisionPass,
    config: &Config,
) -> Resolution {
    if block.velocity.y < 0.0 {
        resolve_toward(grid, cell, block, pass, Y, true)
    } else {
        resolve_down(grid, cell, block, config.smooth_snapping_min_velocity)
    }
}

/// Falling. A block hanging over a ledge drops off it when it is slower than
/// `edge_speed` sideways, otherwise it keeps gliding along the ledge.
fn resolve_down(grid: &mut Grid, cell: IVec2, block: &mut Block, edge_speed: f32) -> Resolution {
    let below = cell + IVec2::Y;
    let origin = cell_origin(cell).y;

    if block.velocity.y > 0.0 && block.world_position.y > origin {
        if !grid.in_bounds(below) || grid.at(below).is_some() {
            stop(block, cell, Y);
            return Resolution::settled(cell);
        }
        if blocked_by_overlap(grid, cell, below, block, Y) {
            if block.velocity.x.abs() >= edge_speed {
                stop(block, cell, Y);
                return Resolution::settled(cell);
            }
            log::debug!("Block at {cell} tips off the ledge into {below}");
            stop(block, cell, X);
        }
        grid.relocate(cell, below);
        return Resolution::settled(below);
    }

    // Resting on, or trailing, whatever is below
    if let Some(support) = grid.in_bounds(below).then(|| grid.get(below)).flatten() {
        if block.world_position.y + TILE_SIZE >= support.world_position.y {
            if support.is_dynamic && support.velocity.y > 0.0 {
                block.velocity.y = block.velocity.y.min(support.velocity.y);
                block.world_position.y = block
                    .world_position
                    .y
                    .min(support.world_position.y - TILE_SIZE);
            } else {
                block.velocity.y = 0.0;
            }
        }
    }

    align_stationary(block, cell, Y);
    Resolution::settled(cell)
}
