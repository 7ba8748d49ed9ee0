//! Scene recorder
//!
//! Small harness around an [`Engine`]: places blocks, ticks at a fixed dt and
//! keeps a snapshot of the grid before every step so a viewer can scrub
//! through the run afterwards.

use glam::IVec2;

use super::block::Block;
use super::engine::Engine;
use super::grid::Grid;
use crate::consts::SIM_DT;

#[derive(Debug, Clone)]
pub struct Scene {
    engine: Engine,
    dt: f32,
    history: Vec<Grid>,
}

impl Scene {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            dt: SIM_DT,
            history: Vec::new(),
        }
    }

    /// Empty grid walled in by static blocks
    pub fn bordered(width: u32, height: u32) -> Self {
        Self::new(Engine::new(Grid::with_border(width, height)))
    }

    /// Place a dynamic block, replacing any occupant
    pub fn add_sand(&mut self, cell: IVec2) -> &mut Block {
        self.engine
            .grid_mut()
            .at_mut(cell)
            .insert(Block::dynamic_at(cell))
    }

    /// Place a static block, replacing any occupant
    pub fn add_wall(&mut self, cell: IVec2) -> &mut Block {
        self.engine
            .grid_mut()
            .at_mut(cell)
            .insert(Block::static_at(cell))
    }

    pub fn block(&self, cell: IVec2) -> Option<&Block> {
        self.engine.grid().get(cell)
    }

    pub fn block_mut(&mut self, cell: IVec2) -> Option<&mut Block> {
        self.engine.grid_mut().get_mut(cell)
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn set_dt(&mut self, dt: f32) {
        assert!(dt > 0.0, "dt must be positive");
        self.dt = dt;
    }

    pub fn tick(&mut self) {
        self.history.push(self.engine.grid().clone());
        self.engine.step(self.dt);
    }

    pub fn tick_n(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Run for `seconds` of simulated time, rounded to whole ticks. Returns the tick count.
    pub fn tick_time(&mut self, seconds: f32) -> u32 {
        let ticks = (seconds / self.dt).round().max(0.0) as u32;
        self.tick_n(ticks);
        ticks
    }

    /// Grid snapshots, one taken before each step
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    pub fn history_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.history)
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}
