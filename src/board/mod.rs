//! Board geometry and knight move generation

pub mod geometry;
pub mod moves;

pub use geometry::{Board, Cell};
pub use moves::{is_knight_move, Occupancy, Visited, KNIGHT_OFFSETS};
