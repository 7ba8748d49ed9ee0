//! Grid - fixed-size store with at most one block per cell
//!
//! Pure bounds-checked storage. No resolution logic lives here.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::block::Block;

/// Row-major 2D grid of optional blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<Block>>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; cell_count(width, height)],
        }
    }

    /// Grid whose outermost ring is filled with static blocks
    pub fn with_border(width: u32, height: u32) -> Self {
        let mut grid = Self::new(width, height);
        let (w, h) = (width as i32, height as i32);
        for x in 0..w {
            grid.insert(IVec2::new(x, 0), Block::static_at(IVec2::new(x, 0)));
            grid.insert(IVec2::new(x, h - 1), Block::static_at(IVec2::new(x, h - 1)));
        }
        for y in 0..h {
            grid.insert(IVec2::new(0, y), Block::static_at(IVec2::new(0, y)));
            grid.insert(IVec2::new(w - 1, y), Block::static_at(IVec2::new(w - 1, y)));
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Flat index of an in-bounds cell
    #[inline]
    pub fn index(&self, cell: IVec2) -> usize {
        assert!(self.in_bounds(cell), "cell {cell} outside {}x{} grid", self.width, self.height);
        cell.y as usize * self.width as usize + cell.x as usize
    }

    #[inline]
    pub fn at(&self, cell: IVec2) -> &Option<Block> {
        &self.cells[self.index(cell)]
    }

    #[inline]
    pub fn at_mut(&mut self, cell: IVec2) -> &mut Option<Block> {
        let idx = self.index(cell);
        &mut self.cells[idx]
    }

    #[inline]
    pub fn get(&self, cell: IVec2) -> Option<&Block> {
        self.at(cell).as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, cell: IVec2) -> Option<&mut Block> {
        self.at_mut(cell).as_mut()
    }

    /// In bounds and holding a block
    #[inline]
    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.in_bounds(cell) && self.at(cell).is_some()
    }

    /// Write a block into a cell, replacing any previous occupant
    pub fn insert(&mut self, cell: IVec2, block: Block) {
        *self.at_mut(cell) = Some(block);
    }

    pub fn remove(&mut self, cell: IVec2) {
        *self.at_mut(cell) = None;
    }

    /// Claim: write the block at `from` into the empty cell `to`, then clear `from`
    pub fn relocate(&mut self, from: IVec2, to: IVec2) {
        debug_assert!(self.at(to).is_none(), "claiming occupied cell {to}");
        let block = self.at_mut(from).take();
        debug_assert!(block.is_some(), "relocating empty cell {from}");
        *self.at_mut(to) = block;
    }

    /// Occupied cells in row-major order
    pub fn blocks(&self) -> impl Iterator<Item = (IVec2, &Block)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|block| (IVec2::new((i % width) as i32, (i / width) as i32), block))
        })
    }

    pub fn block_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Number of cells, widened before multiplying so large grids cannot wrap
#[inline]
fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
