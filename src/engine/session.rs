use rand::RngCore;

use super::grid::{lane_indices, Direction, Grid, Idx, SIZE};
use super::spawn::Spawner;
use super::tile::{Tile, TileState, Value};

pub(crate) type Score = u32;

/// Animation-tick budget for one move; advisory to the presentation layer.
/// The logical board is final as soon as a move resolves.
pub(crate) const MAX_TICKS: u8 = 8;

const HUMAN_WIN_VALUE: Value = 2048;
const FINAL_WIN_VALUE: Value = 32768;

/// Who feeds directions into the session. The win rule depends on it: a
/// human-driven session wins at 2048, any session wins at 32768.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Driver {
    Human,
    Ai,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameOver {
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// Accepting exactly one direction from the driver.
    AwaitingInput,
    /// Countdown during which the presentation layer interpolates tiles from
    /// origin toward target. Input is locked until it runs out.
    Animating { ticks: u8 },
    /// Absorbing; a new session must be created to play again.
    Terminal(GameOver),
}

/// One live game: a set of identity-bearing tiles plus score, turn count and
/// the turn state machine. Mutated only through the resolver/spawner
/// pipeline; at most one move is in flight at a time.
pub(crate) struct Session {
    tiles: Vec<Tile>,
    score: Score,
    turns: u32,
    phase: Phase,
    driver: Driver,
    rng: Box<dyn RngCore>,
    spawner: Spawner,
}

impl Session {
    /// Starts a fresh game with two spawned tiles.
    pub(crate) fn new(driver: Driver, rng: impl RngCore + 'static) -> Self {
        let mut session = Self {
            tiles: Vec::with_capacity(SIZE * SIZE),
            score: 0,
            turns: 0,
            phase: Phase::AwaitingInput,
            driver,
            rng: Box::new(rng),
            spawner: Spawner::default(),
        };
        session.spawn_tile();
        session.spawn_tile();
        session
    }

    /// Builds a session from a preset board. Terminal checks run immediately,
    /// so a dead full board is `Lost` from the start without any spawn.
    #[cfg(test)]
    pub(crate) fn from_tiles(
        driver: Driver,
        rng: impl RngCore + 'static,
        tiles: Vec<Tile>,
    ) -> Self {
        let mut session = Self {
            tiles,
            score: 0,
            turns: 0,
            phase: Phase::AwaitingInput,
            driver,
            rng: Box::new(rng),
            spawner: Spawner::default(),
        };
        session.check_win();
        if !session.is_terminal() {
            let grid = session.grid();
            if grid.is_full() {
                session.check_loss(&grid);
            }
        }
        session
    }

    pub(crate) fn score(&self) -> Score {
        self.score
    }

    pub(crate) fn turns(&self) -> u32 {
        self.turns
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Terminal(_))
    }

    pub(crate) fn awaiting_input(&self) -> bool {
        self.phase == Phase::AwaitingInput
    }

    /// Tiles with their value, state, origin and target, for the presentation
    /// layer to interpolate and draw.
    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// `(current tick, budget)` while a move is animating.
    pub(crate) fn animation_progress(&self) -> Option<(u8, u8)> {
        match self.phase {
            Phase::Animating { ticks } => Some((ticks, MAX_TICKS)),
            _ => None,
        }
    }

    pub(crate) fn max_value(&self) -> Value {
        self.tiles.iter().map(|t| t.value).max().unwrap_or(0)
    }

    /// Snapshot of the resolved board as an exponent grid, the form the
    /// search layer consumes. Merges already in flight are folded in.
    pub(crate) fn grid(&self) -> Grid {
        let mut grid = Grid::default();
        for tile in &self.tiles {
            match tile.state {
                TileState::Removed => {}
                TileState::Merging => grid.set(&tile.target, tile.exponent() + 1),
                TileState::Normal => grid.set(&tile.target, tile.exponent()),
            }
        }
        grid
    }

    /// Feeds one direction into the session. Returns `false` without touching
    /// any state when input is locked or the move changes nothing; a no-op
    /// move never spawns a tile, never counts a turn.
    pub(crate) fn apply(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::AwaitingInput {
            return false;
        }
        if resolve(&mut self.tiles, direction) {
            self.phase = Phase::Animating { ticks: 0 };
            true
        } else {
            false
        }
    }

    /// Advances the animation countdown one step; settles the move once the
    /// budget is spent. No-op in every other phase.
    pub(crate) fn tick(&mut self) {
        if let Phase::Animating { ticks } = &mut self.phase {
            *ticks += 1;
            if *ticks >= MAX_TICKS {
                self.settle();
            }
        }
    }

    /// End of a move: discard merged-away tiles, fold merges into doubled
    /// values and score them, then run the win/loss checks and spawn.
    fn settle(&mut self) {
        self.turns += 1;
        self.tiles.retain(|t| t.state != TileState::Removed);
        for tile in self.tiles.iter_mut() {
            if tile.state == TileState::Merging {
                tile.value <<= 1;
                self.score += Score::from(tile.value);
                tile.state = TileState::Normal;
            }
            tile.origin = tile.target.clone();
        }
        self.phase = Phase::AwaitingInput;

        self.check_win();
        if self.is_terminal() {
            return;
        }
        let grid = self.grid();
        if grid.is_full() {
            // full board is spawn-ineligible whether or not it is lost
            self.check_loss(&grid);
            return;
        }
        self.spawn_tile();
        let grid = self.grid();
        if grid.is_full() {
            self.check_loss(&grid);
        }
    }

    fn check_win(&mut self) {
        let human_win = self.driver == Driver::Human
            && self.tiles.iter().any(|t| t.value == HUMAN_WIN_VALUE);
        if human_win || self.tiles.iter().any(|t| t.value == FINAL_WIN_VALUE) {
            self.phase = Phase::Terminal(GameOver::Won);
        }
    }

    /// Only meaningful on a full board: lost when no adjacent equal pair can
    /// ever merge again.
    fn check_loss(&mut self, grid: &Grid) {
        if !grid.has_mergeable_pair() {
            self.phase = Phase::Terminal(GameOver::Lost);
        }
    }

    fn spawn_tile(&mut self) {
        let grid = self.grid();
        let (idx, value) = self.spawner.spawn(&mut self.rng, &grid);
        self.tiles.push(Tile::new(value, idx));
    }
}

/// Identity-preserving variant of the move resolver: reassigns every tile's
/// `target`, marks merged-away tiles `Removed` and merge destinations
/// `Merging`. Returns whether anything changed; a `false` result leaves all
/// tiles exactly where they were.
fn resolve(tiles: &mut [Tile], direction: Direction) -> bool {
    // the previous move has settled, so target is the current cell
    for tile in tiles.iter_mut() {
        tile.origin = tile.target.clone();
    }
    let mut cells: [[Option<usize>; SIZE]; SIZE] = Default::default();
    for (i, tile) in tiles.iter().enumerate() {
        cells[tile.origin.y()][tile.origin.x()] = Some(i);
    }

    let idxs = lane_indices(direction).collect::<Vec<Idx>>();
    let mut changed = false;
    for lane in idxs.chunks(SIZE) {
        let occupants = lane
            .iter()
            .filter_map(|idx| cells[idx.y()][idx.x()])
            .collect::<Vec<usize>>();
        let mut cursor = 0;
        let mut prev: Option<usize> = None;
        for ti in occupants {
            if let Some(pi) = prev {
                if tiles[pi].mergeable_with(&tiles[ti]) {
                    tiles[ti].target = tiles[pi].target.clone();
                    tiles[ti].state = TileState::Removed;
                    tiles[pi].state = TileState::Merging;
                    // the merged cell may not merge again this move
                    prev = None;
                    changed = true;
                    continue;
                }
            }
            let dest = lane[cursor].clone();
            cursor += 1;
            if tiles[ti].target != dest {
                changed = true;
            }
            tiles[ti].target = dest;
            prev = Some(ti);
        }
    }
    changed
}
