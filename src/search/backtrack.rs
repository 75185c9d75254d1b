//! Depth-first backtracking tour search

use crate::board::{Board, Cell, Occupancy};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// How candidate moves are ordered at each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrder {
    /// Fixed knight offset order
    Offset,
    /// Fewest onward moves first, ties in offset order
    Warnsdorff,
}

/// Depth-first search over knight moves.
///
/// Uses an explicit stack of candidate frames instead of recursion, so deep
/// boards cannot exhaust the call stack. Candidates are explored in exactly
/// the order a recursive search would use, and the first complete tour wins.
pub struct Backtracker {
    board: Board,
    order: MoveOrder,
    node_limit: Option<u64>,
    stats: SearchStatistics,
}

/// Counters collected during one search
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    pub nodes_expanded: u64,
    pub backtracks: u64,
    pub max_depth: usize,
    pub search_time: Duration,
    /// Set when the node limit stopped the search
    pub exhausted: bool,
}

impl Backtracker {
    pub fn new(board: Board, order: MoveOrder) -> Self {
        Self {
            board,
            order,
            node_limit: None,
            stats: SearchStatistics::default(),
        }
    }

    /// Give up with `None` after expanding `limit` nodes
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Extend `tour` to a full tour.
    ///
    /// Returns `None` when no extension exists, the prefix is empty, longer
    /// than the board, leaves the board or repeats a cell, or the node limit
    /// runs out.
    pub fn search(&mut self, mut tour: Vec<Cell>) -> Option<Vec<Cell>> {
        let start_time = Instant::now();
        self.stats = SearchStatistics::default();
        let total = self.board.total_cells();

        let result = if tour.len() == total {
            Some(tour)
        } else if tour.len() > total || tour.is_empty() {
            None
        } else {
            let mut occupied = Occupancy::from_cells(self.board, &tour).ok()?;
            let prefix_len = tour.len();
            let last = *tour.last()?;
            let mut frames = vec![self.candidates(last, &occupied).into_iter()];
            self.stats.max_depth = prefix_len;

            loop {
                let Some(frame) = frames.last_mut() else {
                    break None;
                };
                match frame.next() {
                    Some(_) if self.node_limit.is_some_and(|limit| self.stats.nodes_expanded >= limit) => {
                        self.stats.exhausted = true;
                        break None;
                    }
                    Some(next) => {
                        self.stats.nodes_expanded += 1;
                        tour.push(next);
                        occupied.insert(next);
                        self.stats.max_depth = self.stats.max_depth.max(tour.len());
                        if tour.len() == total {
                            break Some(tour);
                        }
                        frames.push(self.candidates(next, &occupied).into_iter());
                    }
                    None => {
                        frames.pop();
                        // the bottom frame belongs to the caller's prefix
                        if tour.len() > prefix_len {
                            if let Some(cell) = tour.pop() {
                                occupied.remove(cell);
                            }
                            self.stats.backtracks += 1;
                        }
                    }
                }
            }
        };

        self.stats.search_time = start_time.elapsed();
        debug!(
            order = ?self.order,
            nodes = self.stats.nodes_expanded,
            backtracks = self.stats.backtracks,
            exhausted = self.stats.exhausted,
            found = result.is_some(),
            "backtracking search finished"
        );
        result
    }

    fn candidates(&self, cell: Cell, occupied: &Occupancy) -> Vec<Cell> {
        match self.order {
            MoveOrder::Offset => self.board.legal_moves(cell, occupied),
            MoveOrder::Warnsdorff => self.board.ordered_moves(cell, occupied),
        }
    }

    /// Statistics of the most recent search
    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backtracking Statistics:")?;
        writeln!(f, "  Nodes expanded: {}", self.nodes_expanded)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        if self.exhausted {
            writeln!(f, "  Stopped at node limit")?;
        }
        writeln!(f, "  Search time: {:.3}s", self.search_time.as_secs_f64())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::is_knight_move;
    use itertools::Itertools;
    use std::collections::HashSet;

    fn assert_valid_tour(board: Board, start: Cell, tour: &[Cell]) {
        assert_eq!(tour.len(), board.total_cells());
        assert_eq!(tour[0], start);
        let distinct: HashSet<_> = tour.iter().collect();
        assert_eq!(distinct.len(), tour.len());
        for (a, b) in tour.iter().tuple_windows() {
            assert!(is_knight_move(*a, *b), "{} -> {} is not a knight move", a, b);
        }
    }

    fn run(width: usize, height: usize, start: Cell, order: MoveOrder) -> Option<Vec<Cell>> {
        let board = Board::new(width, height).unwrap();
        Backtracker::new(board, order).search(vec![start])
    }

    #[test]
    fn test_plain_5x5_from_corner() {
        let board = Board::new(5, 5).unwrap();
        let tour = run(5, 5, Cell::new(0, 0), MoveOrder::Offset).unwrap();
        assert_valid_tour(board, Cell::new(0, 0), &tour);
    }

    #[test]
    fn test_plain_6x6_from_center() {
        let board = Board::new(6, 6).unwrap();
        let tour = run(6, 6, Cell::new(3, 3), MoveOrder::Offset).unwrap();
        assert_valid_tour(board, Cell::new(3, 3), &tour);
    }

    #[test]
    fn test_plain_rectangle() {
        let board = Board::new(4, 6).unwrap();
        let tour = run(4, 6, Cell::new(3, 3), MoveOrder::Offset).unwrap();
        assert_valid_tour(board, Cell::new(3, 3), &tour);
    }

    #[test]
    fn test_warnsdorff_8x8() {
        let board = Board::new(8, 8).unwrap();
        let tour = run(8, 8, Cell::new(0, 0), MoveOrder::Warnsdorff).unwrap();
        assert_valid_tour(board, Cell::new(0, 0), &tour);
    }

    #[test]
    fn test_3x3_has_no_tour() {
        let board = Board::new(3, 3).unwrap();
        for start in board.cells() {
            assert!(run(3, 3, start, MoveOrder::Offset).is_none());
            assert!(run(3, 3, start, MoveOrder::Warnsdorff).is_none());
        }
    }

    #[test]
    fn test_single_cell_board() {
        let tour = run(1, 1, Cell::new(0, 0), MoveOrder::Offset).unwrap();
        assert_eq!(tour, vec![Cell::new(0, 0)]);
    }

    #[test]
    fn test_resume_from_partial_tour() {
        let board = Board::new(5, 5).unwrap();
        let full = run(5, 5, Cell::new(0, 0), MoveOrder::Warnsdorff).unwrap();
        let prefix = full[..3].to_vec();
        let tour = Backtracker::new(board, MoveOrder::Warnsdorff)
            .search(prefix.clone())
            .unwrap();
        assert_valid_tour(board, Cell::new(0, 0), &tour);
        assert_eq!(&tour[..3], prefix.as_slice());
    }

    #[test]
    fn test_overrun_prefix_fails() {
        let board = Board::new(1, 2).unwrap();
        let prefix = vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 0)];
        assert!(Backtracker::new(board, MoveOrder::Offset).search(prefix).is_none());
    }

    #[test]
    fn test_off_board_prefix_fails() {
        let board = Board::new(5, 5).unwrap();
        let mut searcher = Backtracker::new(board, MoveOrder::Offset);
        assert!(searcher.search(vec![Cell::new(9, 9)]).is_none());
        assert!(searcher.search(vec![Cell::new(0, 0), Cell::new(2, 5)]).is_none());
    }

    #[test]
    fn test_repeated_prefix_fails() {
        let board = Board::new(5, 5).unwrap();
        let prefix = vec![Cell::new(0, 0), Cell::new(2, 1), Cell::new(0, 0)];
        assert!(Backtracker::new(board, MoveOrder::Warnsdorff).search(prefix).is_none());
    }

    #[test]
    fn test_node_limit_stops_search() {
        let board = Board::new(5, 5).unwrap();
        let mut searcher = Backtracker::new(board, MoveOrder::Offset).with_node_limit(10);
        assert!(searcher.search(vec![Cell::new(0, 0)]).is_none());
        assert!(searcher.statistics().exhausted);
        assert_eq!(searcher.statistics().nodes_expanded, 10);

        let mut searcher = Backtracker::new(board, MoveOrder::Warnsdorff).with_node_limit(10_000);
        assert!(searcher.search(vec![Cell::new(0, 0)]).is_some());
        assert!(!searcher.statistics().exhausted);
    }

    #[test]
    fn test_statistics_display() {
        let board = Board::new(5, 5).unwrap();
        let mut searcher = Backtracker::new(board, MoveOrder::Warnsdorff);
        searcher.search(vec![Cell::new(0, 0)]).unwrap();
        let text = searcher.statistics().to_string();
        assert!(text.contains("Max depth: 25"));
        assert!(!text.contains("node limit"));
    }

    #[test]
    fn test_statistics_recorded() {
        let board = Board::new(5, 5).unwrap();
        let mut searcher = Backtracker::new(board, MoveOrder::Offset);
        searcher.search(vec![Cell::new(0, 0)]).unwrap();
        let stats = searcher.statistics();
        assert!(stats.nodes_expanded >= 24);
        assert_eq!(stats.max_depth, 25);
    }
}
