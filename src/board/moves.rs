//! Knight move generation and Warnsdorff ordering

use super::geometry::{Board, Cell};

/// The eight knight displacements as `(d_row, d_col)`.
///
/// Candidate order follows this table, so it decides which tour plain
/// backtracking finds first.
pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
];

/// Membership test for cells already placed on the tour
pub trait Visited {
    fn is_visited(&self, cell: Cell) -> bool;
}

impl Visited for [Cell] {
    fn is_visited(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

impl Visited for Vec<Cell> {
    fn is_visited(&self, cell: Cell) -> bool {
        self.as_slice().is_visited(cell)
    }
}

/// Constant-time visited set backed by one flag per board index
#[derive(Debug, Clone)]
pub struct Occupancy {
    board: Board,
    flags: Vec<bool>,
}

impl Occupancy {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            flags: vec![false; board.total_cells()],
        }
    }

    /// Build from a tour prefix; returns the first off-board or repeated
    /// cell if any
    pub fn from_cells(board: Board, cells: &[Cell]) -> Result<Self, Cell> {
        let mut occupancy = Self::new(board);
        for &cell in cells {
            if !board.in_bounds(cell) || !occupancy.insert(cell) {
                return Err(cell);
            }
        }
        Ok(occupancy)
    }

    /// Mark a cell, `false` if it was already marked
    pub fn insert(&mut self, cell: Cell) -> bool {
        let index = self.board.to_index(cell);
        !std::mem::replace(&mut self.flags[index], true)
    }

    pub fn remove(&mut self, cell: Cell) {
        let index = self.board.to_index(cell);
        self.flags[index] = false;
    }
}

impl Visited for Occupancy {
    fn is_visited(&self, cell: Cell) -> bool {
        self.flags[self.board.to_index(cell)]
    }
}

/// True when `a` and `b` are one knight move apart
pub fn is_knight_move(a: Cell, b: Cell) -> bool {
    let d_row = a.row.abs_diff(b.row);
    let d_col = a.col.abs_diff(b.col);
    (d_row == 1 && d_col == 2) || (d_row == 2 && d_col == 1)
}

impl Board {
    /// Unvisited on-board knight destinations from `cell`, in offset order
    pub fn legal_moves<V: Visited + ?Sized>(&self, cell: Cell, visited: &V) -> Vec<Cell> {
        KNIGHT_OFFSETS
            .iter()
            .filter_map(|&(d_row, d_col)| cell.offset(d_row, d_col))
            .filter(|&next| self.in_bounds(next) && !visited.is_visited(next))
            .collect()
    }

    /// Number of moves still available after stepping onto `cell`.
    ///
    /// `cell` itself can never be a knight move away from itself, so it does
    /// not need to be added to the visited set first.
    pub fn onward_degree<V: Visited + ?Sized>(&self, cell: Cell, visited: &V) -> usize {
        self.legal_moves(cell, visited).len()
    }

    /// Legal moves sorted by ascending onward degree (Warnsdorff's rule).
    /// The sort is stable, so ties keep the offset order.
    pub fn ordered_moves<V: Visited + ?Sized>(&self, cell: Cell, visited: &V) -> Vec<Cell> {
        let mut moves = self.legal_moves(cell, visited);
        moves.sort_by_cached_key(|&next| self.onward_degree(next, visited));
        moves
    }

    /// Adjacency lists of the full move graph, indexed by linear index
    pub fn move_graph(&self) -> Vec<Vec<usize>> {
        let empty: &[Cell] = &[];
        self.cells()
            .map(|cell| {
                self.legal_moves(cell, empty)
                    .into_iter()
                    .map(|next| self.to_index(next))
                    .collect()
            })
            .collect()
    }
}
