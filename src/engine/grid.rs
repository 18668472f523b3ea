/// Width and height of the board. The whole engine assumes a square 4x4 grid.
pub(crate) const SIZE: usize = 4;

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Idx(pub(crate) usize, pub(crate) usize);

impl std::fmt::Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "idx({0},{1})", self.0, self.1)
    }
}

impl Idx {
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    pub(crate) fn y(&self) -> usize {
        self.1
    }
}

/// Direction represents the direction indicated by the player or a policy.
/// The declaration order doubles as the tie-break order used by search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// Grid is the identity-free board representation: a 4x4 array of exponents
/// where 0 marks an empty cell and a nonzero `e` stands for the value `2^e`.
///
/// It is `Copy` on purpose: search branches clone it freely and never share
/// mutable state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Grid([[u8; SIZE]; SIZE]);

impl Grid {
    pub(crate) fn from_exponents(cells: [[u8; SIZE]; SIZE]) -> Self {
        Self(cells)
    }

    pub(crate) fn get(&self, idx: &Idx) -> u8 {
        self.0[idx.y()][idx.x()]
    }

    pub(crate) fn set(&mut self, idx: &Idx, exponent: u8) {
        self.0[idx.y()][idx.x()] = exponent;
    }

    /// Rows in row-major order, the scan order used by the heuristic.
    pub(crate) fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.0
    }

    pub(crate) fn empty_cells(&self) -> Vec<Idx> {
        let mut empty = Vec::with_capacity(SIZE * SIZE);
        for y in 0..SIZE {
            for x in 0..SIZE {
                if self.0[y][x] == 0 {
                    empty.push(Idx(x, y));
                }
            }
        }
        empty
    }

    pub(crate) fn occupied(&self) -> usize {
        self.0.iter().flatten().filter(|&&e| e != 0).count()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.0.iter().flatten().all(|&e| e != 0)
    }

    /// Whether any two horizontally or vertically adjacent cells hold equal
    /// nonzero values. On a full board this decides loss: no pair, no future
    /// merge, game over.
    pub(crate) fn has_mergeable_pair(&self) -> bool {
        for y in 0..SIZE {
            for x in 0..SIZE {
                let e = self.0[y][x];
                if e == 0 {
                    continue;
                }
                if x + 1 < SIZE && self.0[y][x + 1] == e {
                    return true;
                }
                if y + 1 < SIZE && self.0[y + 1][x] == e {
                    return true;
                }
            }
        }
        false
    }

    /// Applies one move and returns the resulting grid, or `None` when the
    /// move changes nothing anywhere on the board (the no-op contract callers
    /// rely on to decide whether a tile may spawn).
    ///
    /// Per lane from the leading edge: collect the nonzero exponents, fuse
    /// adjacent equal pairs front to back, recompact. A fused cell never
    /// fuses again within the same move, so `[1,1,1,1]` becomes `[2,2,0,0]`
    /// rather than collapsing further.
    pub(crate) fn shifted(&self, direction: Direction) -> Option<Grid> {
        let mut next = *self;
        let idxs = lane_indices(direction).collect::<Vec<Idx>>();
        for lane in idxs.chunks(SIZE) {
            let mut vals = lane
                .iter()
                .map(|idx| self.get(idx))
                .filter(|&e| e != 0)
                .collect::<Vec<u8>>();
            let mut i = 0;
            while i + 1 < vals.len() {
                if vals[i] == vals[i + 1] {
                    vals[i] += 1;
                    vals.remove(i + 1);
                }
                i += 1;
            }
            for (slot, idx) in lane.iter().enumerate() {
                next.set(idx, vals.get(slot).copied().unwrap_or(0));
            }
        }
        (next != *self).then_some(next)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for &e in row {
                if e == 0 {
                    write!(f, "|{: ^5}", " ")?;
                } else {
                    write!(f, "|{: ^5}", 1u32 << e)?;
                }
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// Yields every cell of the board in lane-major order for a move direction:
/// chunks of [`SIZE`] consecutive items form one row or column, leading edge
/// (the edge tiles are pushed toward) first.
pub(crate) fn lane_indices(direction: Direction) -> LaneIndices {
    LaneIndices {
        direction,
        lane: 0,
        slot: 0,
    }
}

pub(crate) struct LaneIndices {
    direction: Direction,
    lane: usize,
    slot: usize,
}

impl Iterator for LaneIndices {
    type Item = Idx;

    fn next(&mut self) -> Option<Self::Item> {
        if self.lane == SIZE {
            return None;
        }
        let (lane, slot) = (self.lane, self.slot);
        self.slot += 1;
        if self.slot == SIZE {
            self.slot = 0;
            self.lane += 1;
        }
        Some(match self.direction {
            Direction::Left => Idx(slot, lane),
            Direction::Right => Idx(SIZE - 1 - slot, lane),
            Direction::Up => Idx(lane, slot),
            Direction::Down => Idx(lane, SIZE - 1 - slot),
        })
    }
}
