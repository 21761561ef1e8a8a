use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::Level;
use trio_solver::layout::Layout;
use trio_solver::level::{build_solvable_level, LevelOptions, DEFAULT_ATTEMPTS};
use trio_solver::solver::SolverConfig;
use trio_solver::utils::LevelFile;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Deal random pieces onto a pyramid until the solver can clear it", long_about = None)]
struct Args {
    /// Columns of the bottom layer
    #[clap(long, default_value_t = 4)]
    cols: usize,

    /// Rows of the bottom layer
    #[clap(long, default_value_t = 3)]
    rows: usize,

    /// Number of stacked layers
    #[clap(long, default_value_t = 2)]
    layers: usize,

    /// Number of distinct piece types
    #[clap(short, long, default_value_t = 4)]
    types: u16,

    /// Seed for the piece shuffle
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Assignments to try before giving up
    #[clap(long, default_value_t = DEFAULT_ATTEMPTS)]
    attempts: usize,

    /// States kept per depth while checking each assignment
    #[clap(long, default_value_t = 100)]
    beam_width: usize,

    /// Write the level as JSON to this path
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let layout = Layout::pyramid(args.cols, args.rows, args.layers);
    let options = LevelOptions {
        seed: args.seed,
        attempts: args.attempts,
        solver: SolverConfig {
            beam_width: args.beam_width,
            ..SolverConfig::default()
        },
    };

    println!(
        "Building a {}-tile pyramid with {} piece types (seed {})...",
        layout.len(),
        args.types,
        args.seed
    );
    let level = build_solvable_level(&layout, args.types, &options)?;

    println!("Solvable assignment found on attempt {}:", level.attempt);
    println!("  {}", level.board);
    println!("Winning picks: {:?}", level.winning_moves);

    if let Some(path) = &args.output {
        let json = LevelFile::new(&layout, &level.board).to_json()?;
        fs::write(path, json)?;
        println!("Level written to {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
