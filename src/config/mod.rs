//! Configuration management for the knight's tour solver

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, OutputConfig, OutputFormat, SearchConfig, Settings, Strategy,
};
