use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod ai;
mod engine;
mod error;

use ai::expectimax::Expectimax;
use ai::random::RandomPolicy;
use ai::{DepthPolicy, Policy};
use engine::session::{Driver, GameOver, Phase, Session};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// uniform random directions, no lookahead
    Random,
    /// expectimax search against the tile spawner
    Expectimax,
}

#[derive(Parser)]
#[command(name = "plus48", about = "2048 with a search-based computer opponent")]
struct Cli {
    /// decision engine driving the games
    #[arg(long, value_enum, default_value = "expectimax")]
    ai: Mode,

    /// fixed search depth for expectimax
    #[arg(long, default_value_t = 3, conflicts_with = "adaptive")]
    depth: u8,

    /// recompute search depth per decision from score and board fullness
    #[arg(long)]
    adaptive: bool,

    /// seed for reproducible runs; entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn setup_logging(cli: &Cli) -> error::Result<()> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(cli.verbosity.log_level_filter());
    match &cli.log_file {
        Some(path) => dispatch.chain(fern::log_file(path)?).apply()?,
        None => dispatch.chain(std::io::stderr()).apply()?,
    }
    Ok(())
}

fn make_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

fn make_policy(cli: &Cli, rng: StdRng) -> Box<dyn Policy> {
    match cli.ai {
        Mode::Random => Box::new(RandomPolicy::new(rng)),
        Mode::Expectimax => {
            let depth = if cli.adaptive {
                DepthPolicy::Adaptive
            } else {
                DepthPolicy::Fixed(cli.depth)
            };
            Box::new(Expectimax::new(depth))
        }
    }
}

/// Drives one session to its terminal state: ask the policy for a direction,
/// feed it in, and burn down the animation budget before the next decision.
fn run_game(session: &mut Session, policy: &mut dyn Policy) {
    while !session.is_terminal() {
        debug_assert!(session.awaiting_input());
        let grid = session.grid();
        let Some(direction) = policy.pick_move(&grid, session.score()) else {
            log::warn!("policy found no legal move; abandoning game");
            break;
        };
        if session.apply(direction) {
            while let Some((tick, budget)) = session.animation_progress() {
                log::trace!("animation tick {}/{}", tick, budget);
                session.tick();
            }
            log::debug!(
                "turn {}: {:?}, score {}",
                session.turns(),
                direction,
                session.score()
            );
            log::trace!("tiles: {:?}", session.tiles());
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let mut total_score = 0u64;
    let mut best_score = 0;
    let mut best_value = 0;
    for game in 0..cli.games {
        let mut session = Session::new(Driver::Ai, make_rng(cli.seed, u64::from(game)));
        let mut policy = make_policy(&cli, make_rng(cli.seed, u64::from(game) ^ 0x5eed));
        run_game(&mut session, policy.as_mut());

        let outcome = match session.phase() {
            Phase::Terminal(GameOver::Won) => "won",
            Phase::Terminal(GameOver::Lost) => "lost",
            _ => "abandoned",
        };
        log::info!(
            "game {}: {} with score {} (max tile {}, {} turns)",
            game + 1,
            outcome,
            session.score(),
            session.max_value(),
            session.turns()
        );
        log::debug!("final board:\n{}", session.grid());

        total_score += u64::from(session.score());
        best_score = best_score.max(session.score());
        best_value = best_value.max(session.max_value());
    }

    println!(
        "{} game(s): average score {:.1}, best score {}, best tile {}",
        cli.games,
        total_score as f64 / f64::from(cli.games.max(1)),
        best_score,
        best_value
    );
    Ok(())
}
