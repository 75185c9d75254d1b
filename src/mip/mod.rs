//! Integer programming formulation of the tour search

pub mod encoder;

pub use encoder::{MipEncoder, ModelStatistics};
