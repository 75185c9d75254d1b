//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::tour::TourSolution;
use anyhow::Result;
use itertools::Itertools;

/// Format tour solutions for display
pub struct TourFormatter;

impl TourFormatter {
    /// Format a solution for console output in the requested format
    pub fn format(solution: &TourSolution, format: OutputFormat, show_board: bool) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(solution.to_json()?),
            OutputFormat::Text => Ok(Self::format_solution(solution, show_board)),
        }
    }

    /// Summary, path and (optionally) the numbered board
    pub fn format_solution(solution: &TourSolution, show_board: bool) -> String {
        let mut output = Self::format_summary(solution);

        if solution.is_found() {
            output.push('\n');
            output.push_str("Path:\n");
            output.push_str(&Self::format_path(solution));
            output.push('\n');

            if show_board {
                output.push('\n');
                output.push_str(&Self::format_board(solution));
            }
        }

        output
    }

    pub fn format_summary(solution: &TourSolution) -> String {
        let mut output = String::new();
        output.push_str(&format!("=== {} on {}x{} ===\n", solution.strategy, solution.width, solution.height));
        output.push_str(&format!("Start: {}\n", solution.start));
        output.push_str(&format!("Reported cell: {}\n", solution.end));
        if solution.is_found() {
            output.push_str(&format!("Tour length: {}\n", solution.tour.len()));
        } else {
            output.push_str("No tour exists from this start\n");
            output.push_str("Tour: []\n");
        }
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output
    }

    /// Cells in visiting order, eight per line
    pub fn format_path(solution: &TourSolution) -> String {
        solution
            .tour
            .chunks(8)
            .map(|chunk| chunk.iter().map(ToString::to_string).join(" -> "))
            .join("\n")
    }

    /// Board grid with the step number at which each cell is visited
    pub fn format_board(solution: &TourSolution) -> String {
        let width = solution.tour.len().saturating_sub(1).to_string().len().max(2);
        let mut output = String::new();

        output.push_str(&" ".repeat(4));
        for col in 0..solution.width {
            output.push_str(&format!("{:>w$} ", col, w = width));
        }
        output.push('\n');

        for (row, cells) in solution.step_grid().iter().enumerate() {
            output.push_str(&format!("{:2}: ", row));
            for step in cells {
                match step {
                    Some(step) => output.push_str(&format!("{:>w$} ", step, w = width)),
                    None => output.push_str(&format!("{:>w$} ", "·", w = width)),
                }
            }
            output.push('\n');
        }

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell};
    use crate::config::Strategy;
    use std::time::Duration;

    fn solution(tour: Vec<Cell>) -> TourSolution {
        let board = Board::new(3, 4).unwrap();
        let start = Cell::new(0, 0);
        let end = tour.last().copied().unwrap_or(start);
        TourSolution::new(Strategy::HeuristicBacktrack, board, start, (end, tour), Duration::ZERO)
    }

    fn tour_3x4() -> Vec<Cell> {
        [
            (0, 0), (2, 1), (0, 2), (1, 0), (3, 1), (1, 2),
            (2, 0), (3, 2), (1, 1), (3, 0), (2, 2), (0, 1),
        ]
        .into_iter()
        .map(Cell::from)
        .collect()
    }

    #[test]
    fn test_board_formatting() {
        let board = TourFormatter::format_board(&solution(tour_3x4()));
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains(" 0  1  2"));
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), vec!["0:", "0", "11", "2"]);
    }

    #[test]
    fn test_path_formatting() {
        let path = TourFormatter::format_path(&solution(tour_3x4()));
        assert_eq!(path.lines().count(), 2);
        assert!(path.starts_with("(0, 0) -> (2, 1)"));
    }

    #[test]
    fn test_not_found_formatting() {
        let text = TourFormatter::format_solution(&solution(Vec::new()), true);
        assert!(text.contains("No tour exists"));
        assert!(!text.contains("Path:"));
    }

    #[test]
    fn test_json_format() {
        let json = TourFormatter::format(&solution(tour_3x4()), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tour"].as_array().unwrap().len(), 12);
        assert_eq!(value["strategy"], "heuristic_backtrack");
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));
        assert!(ColorOutput::success("OK").contains("OK"));
        assert!(ColorOutput::error("No tour found").contains("No tour found"));
    }
}
