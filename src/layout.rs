//! Which board positions can be picked right now.
//!
//! The solver only ever sees this through `SelectablePositions`. `Layout` is the stacked
//! tile geometry levels ship with; any pure closure over the board works too.
use crate::engine::Board;
use serde::{Deserialize, Serialize};

/// Source of the positions that are legal to pick on a given board.
///
/// Implementations must be pure functions of the board for results to be reproducible.
pub trait SelectablePositions {
    fn selectable(&self, board: &Board) -> Vec<usize>;
}

impl<F> SelectablePositions for F
where
    F: Fn(&Board) -> Vec<usize>,
{
    fn selectable(&self, board: &Board) -> Vec<usize> {
        self(board)
    }
}

/// Placement of one tile, in half-tile units. A tile spans two units on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub layer: u8,
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(layer: u8, col: i32, row: i32) -> Self {
        Cell { layer, col, row }
    }

    /// `true` when `self` sits on a higher layer than `other` and their footprints overlap.
    pub fn covers(&self, other: &Cell) -> bool {
        self.layer > other.layer
            && (self.col - other.col).abs() < 2
            && (self.row - other.row).abs() < 2
    }
}

/// Stacked tile geometry. Board position `i` is `cells[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    cells: Vec<Cell>,
    // covered_by[i] lists every cell that sits on top of cell i.
    covered_by: Vec<Vec<usize>>,
}

impl Layout {
    pub fn new(cells: Vec<Cell>) -> Self {
        let covered_by = cells
            .iter()
            .map(|below| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, above)| above.covers(below))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        Layout { cells, covered_by }
    }

    /// `n` tiles side by side on one layer. Every non-empty position is always selectable.
    pub fn flat(n: usize) -> Self {
        let cells = (0..n).map(|i| Cell::new(0, i as i32 * 2, 0)).collect();
        Layout::new(cells)
    }

    /// A pyramid: layer `l` is a `(cols - l) x (rows - l)` grid shifted by half a tile.
    ///
    /// Cells are ordered bottom layer first, then row-major.
    pub fn pyramid(cols: usize, rows: usize, layers: usize) -> Self {
        let mut cells = Vec::new();
        for l in 0..layers.min(cols).min(rows) {
            for r in 0..rows - l {
                for c in 0..cols - l {
                    cells.push(Cell::new(
                        l as u8,
                        (c * 2 + l) as i32,
                        (r * 2 + l) as i32,
                    ));
                }
            }
        }
        Layout::new(cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `true` when `pos` still holds a piece and nothing non-empty sits on top of it.
    pub fn is_selectable(&self, board: &Board, pos: usize) -> bool {
        board.get(pos).is_some()
            && self
                .covered_by
                .get(pos)
                .map_or(false, |above| above.iter().all(|&j| board.get(j).is_none()))
    }
}

impl SelectablePositions for Layout {
    fn selectable(&self, board: &Board) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&pos| self.is_selectable(board, pos))
            .collect()
    }
}
