use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prune::{selfplay, uci, Engine, EngineConfig, Game};

#[derive(Parser)]
#[command(name = "prune", version, about = "Fixed-depth minimax chess engine")]
struct Cli {
    /// TOML file with engine settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search depth, overrides the config file (clamped to 1-10)
    #[arg(long, global = true)]
    depth: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Speak UCI on stdin/stdout (default)
    Uci,
    /// Print the engine's move for one position
    Bestmove {
        /// Position to analyse; the starting position when omitted
        #[arg(long)]
        fen: Option<String>,
    },
    /// Let the engine play itself
    Selfplay {
        #[arg(long)]
        white_depth: Option<u32>,
        #[arg(long)]
        black_depth: Option<u32>,
        #[arg(long)]
        max_plies: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = cli.depth {
        config.depth = depth;
        config.difficulty = None;
    }

    init_logging(&config);

    match cli.command.unwrap_or(Command::Uci) {
        Command::Uci => {
            let stdin = io::stdin();
            uci::run(stdin.lock(), io::stdout(), config.engine()).context("UCI session failed")?;
        }
        Command::Bestmove { fen } => bestmove(&config, fen.as_deref())?,
        Command::Selfplay {
            white_depth,
            black_depth,
            max_plies,
        } => {
            let depth = config.effective_depth();
            let mut white = Engine::new(white_depth.unwrap_or(depth));
            let mut black = Engine::new(black_depth.unwrap_or(depth));
            let mut game = Game::new();
            let record = selfplay::play_game(
                &mut white,
                &mut black,
                &mut game,
                max_plies.unwrap_or(config.max_plies),
            );

            for (i, pair) in record.moves.chunks(2).enumerate() {
                println!("{}. {}", i + 1, pair.join(" "));
            }
            match record.result {
                Some(result) => println!("Result: {result}"),
                None => println!("Result: unfinished"),
            }
            println!("Final position: {}", record.final_fen);
        }
    }

    Ok(())
}

fn bestmove(config: &EngineConfig, fen: Option<&str>) -> Result<()> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    let mut engine = config.engine();

    match engine.get_best_move(&mut game) {
        Some(mv) => println!("Best move: {} ({})", game.san(&mv), game.uci(&mv)),
        None => println!("No legal move: {}", game.result().map_or_else(|| "game over".to_string(), |r| r.to_string())),
    }

    if let Some(result) = engine.last_result() {
        println!("Score: {:.1}", result.score);
        println!("Nodes evaluated: {}", result.nodes);
        println!("Branches pruned: {}", result.pruned);
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for UCI.
fn init_logging(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_deref().unwrap_or("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
