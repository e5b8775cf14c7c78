#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    carver::Carver,
    maze::{Maze, Mode},
    solver::Solver,
};

mod carver;
mod maze;
mod solver;

/// Generates a random perfect maze and solves it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells; prompted for when omitted
    #[arg(long)]
    width: Option<i32>,

    /// Maze height in cells; prompted for when omitted
    #[arg(long)]
    height: Option<i32>,

    /// Random seed, for reproducible mazes
    #[arg(long)]
    seed: Option<u64>,
}

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<i32> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("unexpected end of input");
    }
    line.trim()
        .parse()
        .with_context(|| format!("not a whole number: {:?}", line.trim()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut stdin = io::stdin().lock();
    let width = match args.width {
        Some(width) => width,
        None => prompt(&mut stdin, "Elige el ancho del laberinto: ")?,
    };
    let height = match args.height {
        Some(height) => height,
        None => prompt(&mut stdin, "Elige la altura del laberinto: ")?,
    };

    let mut maze = Maze::new(width, height)?;
    info!(width, height, seed = ?args.seed, "generating maze");

    match args.seed {
        Some(seed) => Carver::from_seed(seed).carve(&mut maze),
        None => Carver::from_entropy().carve(&mut maze),
    }
    print!("{maze}");

    if Solver::solve(&mut maze) {
        info!(steps = Solver::path(&maze).len(), "solution found");
        println!("\nSolución:");
        print!("{}", maze.render(Mode::Solution));
    } else {
        println!("\nNo se encontró solución.");
    }

    Ok(())
}
