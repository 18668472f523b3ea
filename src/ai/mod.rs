pub(crate) mod expectimax;
pub(crate) mod heuristic;
pub(crate) mod random;

use crate::engine::grid::{Direction, Grid};
use crate::engine::session::Score;

/// A decision engine: given the resolved board and the running score, pick
/// the next direction to feed into a session. `None` means no legal move
/// exists; only search reports this, the random policy never checks.
pub(crate) trait Policy {
    fn pick_move(&mut self, grid: &Grid, score: Score) -> Option<Direction>;
}

/// Search depth selection, recomputed before every decision. Deeper search
/// is only worth its latency once the board is filling up and the game has
/// already proven non-trivial.
#[derive(Clone, Copy, Debug)]
pub(crate) enum DepthPolicy {
    Fixed(u8),
    Adaptive,
}

impl DepthPolicy {
    const BASE_DEPTH: u8 = 4;
    const DEEP_SCORE: Score = 30_000;

    pub(crate) fn depth_for(&self, score: Score, occupied: usize) -> u8 {
        match self {
            DepthPolicy::Fixed(depth) => *depth,
            DepthPolicy::Adaptive if score < Self::DEEP_SCORE => Self::BASE_DEPTH,
            DepthPolicy::Adaptive => match occupied {
                8..=12 => 5,
                o if o > 12 => 6,
                _ => Self::BASE_DEPTH,
            },
        }
    }
}
