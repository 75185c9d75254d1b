//! Configuration settings for the knight's tour solver

use crate::board::{Board, Cell};
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub start_row: usize,
    pub start_col: usize,
}

/// Search strategy, fixed for the lifetime of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Depth-first backtracking in fixed offset order
    PlainBacktrack,
    /// Depth-first backtracking in Warnsdorff order
    HeuristicBacktrack,
    /// SAT encoding solved by CaDiCaL
    BooleanConstraint,
    /// Integer program solved by a MIP solver
    IntegerProgram,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::PlainBacktrack,
        Strategy::HeuristicBacktrack,
        Strategy::BooleanConstraint,
        Strategy::IntegerProgram,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::PlainBacktrack => "plain_backtrack",
            Strategy::HeuristicBacktrack => "heuristic_backtrack",
            Strategy::BooleanConstraint => "boolean_constraint",
            Strategy::IntegerProgram => "integer_program",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_board: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                width: 5,
                height: 5,
            },
            search: SearchConfig {
                strategy: Strategy::PlainBacktrack,
                start_row: 0,
                start_col: 0,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                show_board: true,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let board = self.board()?;
        board.check_start(self.start())?;
        Ok(())
    }

    pub fn board(&self) -> Result<Board> {
        Board::new(self.board.width, self.board.height).context("Invalid board configuration")
    }

    pub fn start(&self) -> Cell {
        Cell::new(self.search.start_row, self.search.start_col)
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.board.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.board.height = height;
        }
        if let Some(row) = cli_overrides.start_row {
            self.search.start_row = row;
        }
        if let Some(col) = cli_overrides.start_col {
            self.search.start_col = col;
        }
        if let Some(strategy) = cli_overrides.strategy {
            self.search.strategy = strategy;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub start_row: Option<usize>,
    pub start_col: Option<usize>,
    pub strategy: Option<Strategy>,
    pub format: Option<OutputFormat>,
}
