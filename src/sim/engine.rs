//! Engine - owns the grid and advances it one fixed step at a time

use glam::IVec2;

use super::collision::{CollisionPass, Outcome, resolve_block};
use super::forces::apply_forces;
use super::grid::Grid;
use crate::config::Config;

/// Simulation engine
///
/// `step` takes `&mut self`, so a step is atomic from the caller's side.
/// Sweep order and queue draining order are part of the observable behaviour:
/// rows bottom-to-top, columns left-to-right, deferred contacts last-in-first-out.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    config: Config,
    /// Blocks waiting on the block to their right (drained after each row)
    right_contacts: Vec<IVec2>,
    /// Blocks waiting on the block above (drained after the whole sweep)
    up_contacts: Vec<IVec2>,
}

impl Engine {
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, Config::default())
    }

    pub fn with_config(grid: Grid, config: Config) -> Self {
        Self {
            grid,
            config,
            right_contacts: Vec::new(),
            up_contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Config may be edited between steps
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        debug_assert!(dt > 0.0, "step requires a positive dt, got {dt}");
        self.right_contacts.clear();
        self.up_contacts.clear();

        apply_forces(&mut self.grid, &self.config, dt);
        self.resolve_collisions();
    }

    fn resolve_collisions(&mut self) {
        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;

        for y in (0..height).rev() {
            for x in 0..width {
                let cell = IVec2::new(x, y);
                // Moved right into this cell and then deferred upward
                if self.up_contacts.contains(&cell) {
                    continue;
                }
                self.resolve(cell, CollisionPass::First);
            }
            while let Some(cell) = self.right_contacts.pop() {
                self.drain(cell, CollisionPass::SecondHorizontal);
            }
        }

        while let Some(cell) = self.up_contacts.pop() {
            self.drain(cell, CollisionPass::SecondVertical);
        }
    }

    fn drain(&mut self, cell: IVec2, pass: CollisionPass) {
        debug_assert!(
            self.grid
                .get(cell)
                .is_some_and(|block| block.needs_collision_resolution()),
            "deferred contact at {cell} is no longer pending"
        );
        self.resolve(cell, pass);
    }

    fn resolve(&mut self, cell: IVec2, pass: CollisionPass) {
        match resolve_block(&mut self.grid, cell, pass, &self.config) {
            Outcome::DeferredHorizontal(cell) => self.right_contacts.push(cell),
            Outcome::DeferredVertical(cell) => self.up_contacts.push(cell),
            Outcome::Resolved(_) | Outcome::Skipped => {}
        }
    }
}
