use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use rand::{rngs::StdRng, thread_rng, SeedableRng};

use npuzzle::{Board, Priority, Solver};

use std::{
    io::{stdin, IsTerminal, Read},
    path::PathBuf,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Solve a random N-by-N board instead of reading one
    #[arg(short, long, value_name = "N")]
    random: Option<usize>,
    /// Seed for --random
    #[arg(long, value_name = "SEED", requires = "random")]
    seed: Option<u64>,
    /// With --random, also allow boards that cannot be solved
    #[arg(long, requires = "random")]
    any_parity: bool,
    /// Rank search nodes by Hamming distance instead of Manhattan
    #[arg(long)]
    hamming: bool,
    /// Log search progress
    #[arg(short, long)]
    verbose: bool,
    /// Puzzle file: N followed by N*N tiles, 0 for the blank
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli {
        random,
        seed,
        any_parity,
        hamming,
        verbose,
        file,
    } = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let board = if let Some(size) = random {
        if size < 2 {
            bail!("Board dimension must be at least 2.");
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(thread_rng())?,
        };
        let board = if any_parity {
            Board::random(size, &mut rng)
        } else {
            Board::random_solvable(size, &mut rng)
        };
        println!("Initial board:\n{}", board);
        board
    } else if let Some(file) = file {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        content.parse::<Board>().context("Failed to parse board")?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        content.parse::<Board>().context("Failed to parse board")?
    } else {
        bail!("No puzzle `file` or `--random` size provided.");
    };

    let priority = if hamming {
        Priority::Hamming
    } else {
        Priority::Manhattan
    };
    let solver = Solver::with_priority(board, priority);

    match solver.solution() {
        None => println!("No solution possible"),
        Some(path) => {
            println!("Minimum number of moves = {}", solver.moves());
            for board in path {
                println!("{}", board);
            }
        }
    }

    Ok(())
}
