//! LUKU CLI
//!
//! Usage:
//!   luku --serve                        # HTTP API server
//!   luku --interactive                  # Play in the terminal
//!   luku --interactive --category رياضة # Pick a category
//!
//! GEMINI_API_KEY enables generated riddles; without it the static bank is used.

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use luku::core::{run_server, TurnOrchestrator, TurnRequest};
use luku::types::{EngineConfig, GenerationConfig, ScoringRules, TurnOutcome};
use luku::{BASE_POINTS, DEFAULT_CATEGORY, DEFAULT_LEVEL, DEFAULT_MODEL, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "luku",
    version = VERSION,
    about = "LUKU AI - riddle game backend with personas, scores and streaks",
    long_about = "LUKU AI deals riddles, judges answers and keeps score.\n\n\
                  Modes:\n  \
                  --serve        HTTP API server\n  \
                  --interactive  Play in the terminal (default)\n\n\
                  Commands while playing:\n  \
                  'لغز' / 'riddle'   new riddle\n  \
                  'تلميح' / 'hint'   hint for the current riddle\n  \
                  'quit'             exit"
)]
struct Args {
    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Play in the terminal
    #[arg(short, long)]
    interactive: bool,

    /// Server address
    #[arg(long, env = "LUKU_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,

    /// Gemini API key; generation is disabled without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "LUKU_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Timeout for a single generation call (milliseconds)
    #[arg(long, env = "LUKU_GEN_TIMEOUT_MS", default_value_t = luku::GENERATION_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Streak length that triggers a bonus (every multiple)
    #[arg(long, env = "LUKU_STREAK_THRESHOLD", default_value_t = luku::DEFAULT_STREAK_THRESHOLD)]
    streak_threshold: u32,

    /// Bonus = streak × multiplier
    #[arg(long, env = "LUKU_STREAK_MULTIPLIER", default_value_t = luku::DEFAULT_STREAK_MULTIPLIER)]
    streak_multiplier: u32,

    /// Category for interactive play
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    category: String,

    /// Level for interactive play
    #[arg(long, default_value = DEFAULT_LEVEL)]
    level: String,

    /// Output turns as JSON (interactive)
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            scoring: ScoringRules {
                base_points: BASE_POINTS,
                streak_threshold: self.streak_threshold,
                streak_multiplier: self.streak_multiplier,
            },
            generation: GenerationConfig {
                api_key: self.api_key.clone(),
                model: self.model.clone(),
                timeout: Duration::from_millis(self.timeout_ms),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = args.engine_config();
    let engine = match TurnOrchestrator::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            warn!(error = %e, "generative client unavailable, falling back to the static bank");
            TurnOrchestrator::bank_only(config.scoring)
        }
    };
    info!(
        version = VERSION,
        generation = engine.generation_enabled(),
        threshold = config.scoring.streak_threshold,
        multiplier = config.scoring.streak_multiplier,
        "engine ready"
    );

    if args.serve {
        run_serve(&args, engine).await;
    } else {
        run_interactive(&args, engine).await;
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args, engine: TurnOrchestrator) {
    println!();
    println!("{}", "🧩 LUKU AI - مساعد الألغاز المضحك".bold());
    println!("   Version: {}", VERSION);
    println!();

    if let Err(e) = run_server(&args.addr, engine).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Play in the terminal as a single local user
async fn run_interactive(args: &Args, engine: TurnOrchestrator) {
    print_header();
    let first = engine
        .start_session(USER, Some(args.category.clone()), Some(args.level.clone()), None)
        .await;
    print_outcome(&first, args.json);

    let turns = play(&engine, BufReader::new(tokio::io::stdin()), args.json).await;

    if let Some(profile) = engine.store().profile(USER).await {
        println!(
            "\n{} turns={} | points={} | correct={}/{} | accuracy={}%",
            "Session ended.".bold(),
            turns,
            profile.points,
            profile.correct_answers,
            profile.total_answers,
            profile.accuracy()
        );
    }
}

const USER: &str = "local";

/// Feed lines to the engine until quit/exit or end of input. Returns turns played.
async fn play<R: AsyncBufRead + Unpin>(engine: &TurnOrchestrator, input: R, json: bool) -> usize {
    let mut lines = input.lines();
    let mut stdout = io::stdout();
    let mut turns = 0;

    loop {
        print!("{} ", "›".cyan().bold());
        let _ = stdout.flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        };

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let outcome = engine.handle_turn(TurnRequest::new(USER, line)).await;
        print_outcome(&outcome, json);
        turns += 1;
    }
    turns
}

fn print_header() {
    println!("{}", "========================================".dimmed());
    println!("  {} v{}", "LUKU AI".bold(), VERSION);
    println!("{}", "========================================".dimmed());
    println!("Answer the riddle, or type 'hint', 'riddle', 'quit'.");
    println!();
}

fn print_outcome(outcome: &TurnOutcome, json: bool) {
    if json {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("failed to encode turn: {}", e),
        }
        return;
    }

    println!();
    println!("{}", outcome.reply);
    println!();

    let status = outcome.to_status_line();
    let status = match outcome.score {
        Some(score) if score.correct => status.green(),
        Some(_) => status.red(),
        None if outcome.faulted => status.yellow(),
        None => status.dimmed(),
    };
    println!("{}", status);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_play_stops_at_quit() {
        let engine = TurnOrchestrator::bank_only(ScoringRules::default());
        engine.start_session(USER, None, None, None).await;

        let input: &[u8] = "riddle\n\n  hint \nquit\nnever read\n".as_bytes();
        let turns = play(&engine, input, true).await;

        assert_eq!(turns, 2);
        let profile = engine.store().profile(USER).await.unwrap();
        assert_eq!(profile.total_answers, 0);
    }

    #[tokio::test]
    async fn test_play_ends_with_input() {
        let engine = TurnOrchestrator::bank_only(ScoringRules::default());
        let input: &[u8] = "riddle\nشيء ما".as_bytes();

        assert_eq!(play(&engine, input, true).await, 2);
        let profile = engine.store().profile(USER).await.unwrap();
        assert_eq!(profile.total_answers, 1);
    }
}
