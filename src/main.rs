//! Main CLI application for the knight's tour solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use knights_tour::{
    board::Board,
    config::{CliOverrides, OutputFormat, Settings, Strategy},
    mip::MipEncoder,
    sat::SatEncoder,
    tour::{KnightsTour, TourSolution},
    utils::{ColorOutput, TourFormatter},
};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "knights_tour")]
#[command(about = "Knight's Tour Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a knight's tour
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Board height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Start row (overrides config)
        #[arg(short, long)]
        row: Option<usize>,

        /// Start column (overrides config)
        #[arg(long)]
        col: Option<usize>,

        /// Search strategy (overrides config)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Report move-graph and encoding sizes for a board
    Analyze {
        #[arg(long, default_value_t = 8)]
        width: usize,

        #[arg(long, default_value_t = 8)]
        height: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            width,
            height,
            row,
            col,
            strategy,
            format,
            verbose,
        } => {
            init_logging(verbose)?;
            let overrides = CliOverrides {
                width,
                height,
                start_row: row,
                start_col: col,
                strategy,
                format,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Analyze { width, height } => analyze_command(width, height),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to initialize logging")?;
    Ok(())
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        if verbose {
            eprintln!(
                "{}",
                ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
            );
        }
        Settings::default()
    };

    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let text = settings.output.format == OutputFormat::Text;
    if text {
        println!(
            "{}",
            ColorOutput::info(&format!(
                "Searching {}x{} from ({}, {}) with {}",
                settings.board.width,
                settings.board.height,
                settings.search.start_row,
                settings.search.start_col,
                settings.search.strategy
            ))
        );
    }

    let problem = KnightsTour::from_settings(&settings).context("Failed to create tour problem")?;
    let solution = problem.solve().context("Tour search failed")?;

    if text {
        if solution.is_found() {
            println!("{}", ColorOutput::success("Tour found"));
        } else {
            println!("{}", ColorOutput::error("No tour found"));
        }
    }

    let rendered = TourFormatter::format(&solution, settings.output.format, settings.output.show_board)?;
    println!("{}", rendered);

    // Show strategy statistics if verbose, off stdout when it carries JSON
    if verbose {
        let report = statistics_report(&solution);
        if text {
            println!("\n{}", report);
        } else {
            eprintln!("{}", report);
        }
    }

    Ok(())
}

fn statistics_report(solution: &TourSolution) -> String {
    let mut report = format!("{}\n", solution.summary());
    if let Some(statistics) = &solution.statistics {
        report.push_str(&statistics.to_string());
    }
    report
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration files..."));

    let config_dir = directory.join("config");
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)
        .with_context(|| format!("Failed to create directory {}", examples_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    for strategy in Strategy::ALL {
        let path = examples_dir.join(format!("{}.yaml", strategy));
        if path.exists() && !force {
            println!("Skipped: {} (already exists)", path.display());
            continue;
        }
        example_settings(strategy).to_file(&path)?;
        println!("Created: {}", path.display());
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

/// A board each strategy handles in reasonable time
fn example_settings(strategy: Strategy) -> Settings {
    let mut settings = Settings::default();
    settings.search.strategy = strategy;
    let (width, height) = match strategy {
        Strategy::PlainBacktrack => (6, 6),
        Strategy::HeuristicBacktrack => (8, 8),
        Strategy::BooleanConstraint => (5, 5),
        Strategy::IntegerProgram => (3, 4),
    };
    settings.board.width = width;
    settings.board.height = height;
    settings
}

fn analyze_command(width: usize, height: usize) -> Result<()> {
    let board = Board::new(width, height).context("Invalid board")?;
    println!("{}", ColorOutput::info(&format!("Analyzing {} board...", board)));

    let graph = board.move_graph();
    let moves: usize = graph.iter().map(Vec::len).sum();
    let histogram = graph.iter().map(Vec::len).counts();

    println!("Move Graph:");
    println!("  Cells: {}", board.total_cells());
    println!("  Directed moves: {}", moves);
    for (degree, count) in histogram.into_iter().sorted() {
        println!("  Degree {}: {} cell(s)", degree, count);
    }

    let isolated = graph.iter().filter(|targets| targets.is_empty()).count();
    if isolated > 0 && board.total_cells() > 1 {
        println!(
            "{}",
            ColorOutput::warning(&format!("{} cell(s) have no moves, no tour exists", isolated))
        );
    }

    println!("\n{}", SatEncoder::estimate_complexity(&board));
    println!("{}", MipEncoder::new(board).statistics());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "knights_tour",
            "solve",
            "--config",
            "test.yaml",
            "--width",
            "6",
            "--strategy",
            "heuristic-backtrack",
            "--format",
            "json",
        ]);

        let Ok(Cli {
            command: Commands::Solve { width, strategy, format, .. },
        }) = cli
        else {
            panic!("solve arguments should parse");
        };
        assert_eq!(width, Some(6));
        assert_eq!(strategy, Some(Strategy::HeuristicBacktrack));
        assert_eq!(format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let cli = Cli::try_parse_from(["knights_tour", "solve", "--strategy", "greedy"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        for strategy in Strategy::ALL {
            let path = temp_dir.path().join(format!("config/examples/{}.yaml", strategy));
            let settings = Settings::from_file(&path).unwrap();
            assert_eq!(settings.search.strategy, strategy);
        }
    }

    #[test]
    fn test_solve_command_with_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tour.yaml");
        example_settings(Strategy::HeuristicBacktrack).to_file(&path).unwrap();

        let result = solve_command(path, CliOverrides::default(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_verbose_solve_reports_statistics() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tour.yaml");
        example_settings(Strategy::BooleanConstraint).to_file(&path).unwrap();
        assert!(solve_command(path, CliOverrides::default(), true).is_ok());

        for strategy in Strategy::ALL {
            let solution = KnightsTour::from_settings(&example_settings(strategy))
                .unwrap()
                .solve()
                .unwrap();
            let report = statistics_report(&solution);
            assert!(report.starts_with(strategy.name()), "{}", report);
            let expected = match strategy {
                Strategy::PlainBacktrack | Strategy::HeuristicBacktrack => "Backtracking Statistics:",
                Strategy::BooleanConstraint => "SAT Encoding Statistics:",
                Strategy::IntegerProgram => "Integer Program Statistics:",
            };
            assert!(report.contains(expected), "{}", report);
        }
    }

    #[test]
    fn test_solve_rejects_bad_start() {
        let overrides = CliOverrides {
            start_row: Some(9),
            ..CliOverrides::default()
        };
        let result = solve_command(PathBuf::from("missing.yaml"), overrides, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_command() {
        assert!(analyze_command(8, 8).is_ok());
        assert!(analyze_command(0, 8).is_err());
    }
}
