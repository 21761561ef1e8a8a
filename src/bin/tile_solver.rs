use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::Level;
use trio_solver::engine::{Board, TrayRule};
use trio_solver::layout::Layout;
use trio_solver::solver::{is_solvable, SolveOutcome, SolverConfig};
use trio_solver::utils::{board_from_str, LevelFile};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a level file (JSON with `cells` and `board`)
    #[clap(required_unless_present = "board")]
    level_file: Option<PathBuf>,

    /// Flat board given inline, e.g. "0 0 1 . 1 1"; every piece is selectable
    #[clap(short, long, conflicts_with = "level_file")]
    board: Option<String>,

    /// States kept per depth
    #[clap(long, default_value_t = 100)]
    beam_width: usize,

    /// Total picks the search may simulate
    #[clap(long, default_value_t = 5000)]
    max_expansions: usize,

    /// Longest pick sequence considered
    #[clap(long, default_value_t = 200)]
    max_depth: usize,

    /// Use the clustered tray rule the player sees instead of the append rule
    #[clap(long)]
    clustered: bool,

    /// Write the outcome as JSON to this path
    #[clap(long)]
    json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn load(args: &Args) -> Result<(Layout, Board), Box<dyn Error>> {
    if let Some(inline) = &args.board {
        let board = board_from_str(inline)?;
        return Ok((Layout::flat(board.len()), board));
    }
    match &args.level_file {
        Some(path) => Ok(LevelFile::read(path)?.into_parts()),
        None => Err("either a level file or --board is required".into()),
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let (layout, board) = load(&args)?;
    let config = SolverConfig {
        beam_width: args.beam_width,
        max_expansions: args.max_expansions,
        max_depth: args.max_depth,
        tray_rule: if args.clustered {
            TrayRule::Clustered
        } else {
            TrayRule::Append
        },
        ..SolverConfig::default()
    };

    println!("Board ({} slots, {} pieces):", board.len(), board.remaining());
    println!("  {}\n", board);
    println!(
        "Searching with beam width {}, {} expansions, depth {}...\n",
        config.beam_width, config.max_expansions, config.max_depth
    );

    let outcome = is_solvable(&board, &layout, &config);
    match &outcome {
        SolveOutcome::Solvable {
            winning_moves,
            stats,
        } => {
            println!("Solvable in {} picks:", winning_moves.len());
            for (i, pos) in winning_moves.iter().enumerate() {
                let piece = board.get(*pos).map_or(-1, i64::from);
                println!("  Pick {}: position {} (type {})", i + 1, pos, piece);
            }
            println!(
                "\nExpansions: {}, best score: {}, time: {} ms",
                stats.expansions_used, stats.best_score, stats.time_ms
            );
        }
        SolveOutcome::Unsolvable { stats } => {
            println!("No solution found within budget ({:?}).", stats.termination);
            println!(
                "Expansions: {}, best score: {}, time: {} ms",
                stats.expansions_used, stats.best_score, stats.time_ms
            );
        }
    }

    if let Some(path) = &args.json {
        outcome.to_json_file(path)?;
        println!("Outcome written to {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(log_level(args.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
