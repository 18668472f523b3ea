use rand::seq::SliceRandom;
use rand::RngCore;

use crate::engine::grid::{Direction, Grid};
use crate::engine::session::Score;

use super::Policy;

/// The weakest opponent: a uniformly random direction with no legality
/// check. The session's no-op handling absorbs illegal picks, which cost no
/// turn and spawn nothing.
pub(crate) struct RandomPolicy {
    rng: Box<dyn RngCore>,
}

impl RandomPolicy {
    pub(crate) fn new(rng: impl RngCore + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }
}

impl Policy for RandomPolicy {
    fn pick_move(&mut self, _grid: &Grid, _score: Score) -> Option<Direction> {
        Direction::ALL.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn picks_every_direction_eventually() {
        let mut policy = RandomPolicy::new(SmallRng::seed_from_u64(42));
        let grid = Grid::default();
        let mut seen = [false; 4];
        for _ in 0..200 {
            let direction = policy
                .pick_move(&grid, 0)
                .expect("random policy always has a pick");
            let slot = Direction::ALL
                .iter()
                .position(|d| *d == direction)
                .expect("pick comes from the direction set");
            seen[slot] = true;
        }
        assert!(seen.iter().all(|&s| s), "directions seen: {:?}", seen);
    }
}
