use rand::distributions::Distribution;
use rand::distributions::WeightedIndex;
use rand::seq::IteratorRandom;
use rand::Rng;

use super::grid::{Grid, Idx};
use super::tile::Value;

const SPAWN_VALUES: [Value; 2] = [2, 4];
const SPAWN_WEIGHTS: [u8; 2] = [9, 1];

/// Picks the cell and value for a freshly spawned tile: a uniformly random
/// empty cell, holding 2 with probability 0.9 or 4 with probability 0.1.
#[derive(Clone, Debug)]
pub(crate) struct Spawner {
    weighted_index: WeightedIndex<u8>,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            weighted_index: WeightedIndex::new(SPAWN_WEIGHTS)
                .expect("SPAWN_WEIGHTS should never be empty"),
        }
    }
}

impl Spawner {
    /// Callers must ensure at least one empty cell exists; asking for a spawn
    /// on a full board is a state machine bug upstream and fails loudly.
    pub(crate) fn spawn<T: Rng>(&self, mut rng: T, grid: &Grid) -> (Idx, Value) {
        let idx = grid
            .empty_cells()
            .into_iter()
            .choose(&mut rng)
            .expect("spawn requires at least one empty cell");
        let value = SPAWN_VALUES[self.weighted_index.sample(&mut rng)];
        (idx, value)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn spawns_only_into_empty_cells() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut grid = Grid::from_exponents([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 0],
            [2, 1, 0, 0],
        ]);
        let spawner = Spawner::default();
        for _ in 0..100 {
            let (idx, value) = spawner.spawn(&mut rng, &grid);
            assert_eq!(grid.get(&idx), 0, "spawned onto occupied cell {}", idx);
            assert!(value == 2 || value == 4);
        }
        // shrink to a single empty cell: the choice must be forced
        grid.set(&Idx(3, 2), 3);
        grid.set(&Idx(2, 3), 3);
        let (idx, _) = spawner.spawn(&mut rng, &grid);
        assert_eq!(idx, Idx(3, 3));
    }

    #[test]
    fn spawn_values_converge_to_nine_to_one() {
        let mut rng = SmallRng::seed_from_u64(42);
        let grid = Grid::default();
        let spawner = Spawner::default();
        let trials = 20_000;
        let twos = (0..trials)
            .filter(|_| spawner.spawn(&mut rng, &grid).1 == 2)
            .count();
        let ratio = twos as f64 / trials as f64;
        assert!(
            (ratio - 0.9).abs() < 0.01,
            "expected ~0.9 probability of spawning a 2, got {}",
            ratio
        );
    }

    #[test]
    #[should_panic(expected = "spawn requires at least one empty cell")]
    fn spawn_on_full_board_panics() {
        let mut rng = SmallRng::seed_from_u64(42);
        let grid = Grid::from_exponents([[1; 4]; 4]);
        Spawner::default().spawn(&mut rng, &grid);
    }
}
