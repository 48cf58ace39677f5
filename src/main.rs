use anyhow::Result;
use clap::Parser;
use mimicbot::board::Position;
use mimicbot::config::Config;
use mimicbot::engine::Engine;
use mimicbot::humanize;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick human-like moves from multi-PV engine analysis", long_about = None)]
struct Args {
    /// Path to a JSON config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the UCI engine binary (overrides config)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Analyze a single FEN and exit; otherwise read FEN lines from stdin
    #[arg(long)]
    fen: Option<String>,

    /// Per-move analysis budget in milliseconds (overrides config)
    #[arg(long)]
    movetime_ms: Option<u64>,

    /// Number of principal variations to request (overrides config)
    #[arg(long)]
    max_lines: Option<usize>,

    /// Seed the move selection rng for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Sleep the sampled thinking delay before printing the move
    #[arg(long)]
    think: bool,

    /// Debug-level logging (RUST_LOG still takes precedence when set)
    #[arg(long)]
    verbose: bool,
}

fn decide(
    engine: &mut Engine,
    cfg: &Config,
    rng: &mut SmallRng,
    fen: &str,
    think: bool,
) -> Result<()> {
    let pos = Position::from_fen(fen).map_err(|e| anyhow::anyhow!(e))?;
    let cands = engine.evaluate(&pos, cfg.engine.max_lines)?;
    let choice = humanize::select(&cands, &cfg.humanize, rng)?;
    if think {
        std::thread::sleep(choice.delay);
    }
    println!(
        "move {} delay_ms {}{}",
        choice.uci,
        choice.delay.as_millis(),
        if choice.obvious { " obvious" } else { "" }
    );
    io::stdout().flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(path) = args.engine {
        cfg.engine.path = path;
    }
    if let Some(ms) = args.movetime_ms {
        cfg.engine.movetime_ms = ms;
    }
    if let Some(n) = args.max_lines {
        cfg.engine.max_lines = n;
    }
    cfg.validate()?;

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut engine = Engine::spawn(&cfg.engine)?;

    if let Some(fen) = &args.fen {
        return decide(&mut engine, &cfg, &mut rng, fen, args.think);
    }

    // Position-supplier boundary: one FEN per stdin line; the chosen move
    // and delay go to stdout for the external executor.
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let fen = line.trim();
        if fen.is_empty() {
            continue;
        }
        if fen == "quit" {
            break;
        }
        if let Err(e) = decide(&mut engine, &cfg, &mut rng, fen, args.think) {
            // Fail-fast per move: surface the error and let the operator
            // decide; do not fabricate a move.
            eprintln!("error: {e}");
        }
    }
    Ok(())
}
