use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

mod fmt;
mod parse;
pub mod solve;

/// Side length of the board.
pub const SIZE: usize = 3;
/// Number of cells on the board, blank included.
pub const CELLS: usize = SIZE * SIZE;
/// The blank label.
pub const BLANK: u8 = 0;

pub const DEFAULT_GOAL: [u8; CELLS] = [1, 2, 3, 4, 5, 6, 7, 8, 0];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("expected {n} tiles, got {0}", n = CELLS)]
    WrongLength(usize),
    #[error("tile {0} is out of range 0..={max}", max = CELLS - 1)]
    TileOutOfRange(u8),
    #[error("duplicate tile {0}")]
    DuplicateTile(u8),
    #[error("no blank square")]
    MissingBlank,
    #[error("cannot move the blank {action} from square {blank}")]
    InvalidAction { action: Action, blank: usize },
}

/// Direction the blank moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Expansion order of the search.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn reversed(self) -> Self {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        }
    }
}

/// Locate the blank in raw tile input.
pub fn find_blank(tiles: &[u8]) -> Result<usize, PuzzleError> {
    tiles
        .iter()
        .position(|&tile| tile == BLANK)
        .ok_or(PuzzleError::MissingBlank)
}

/// A board configuration. Always a permutation of `0..CELLS`.
///
/// Ordering is lexicographic over the tiles; `blank` is derived from them and
/// never decides a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    tiles: [u8; CELLS],
    blank: u8,
}

impl TryFrom<&[u8]> for State {
    type Error = PuzzleError;

    fn try_from(tiles: &[u8]) -> Result<Self, Self::Error> {
        let tiles: [u8; CELLS] = tiles
            .try_into()
            .map_err(|_| PuzzleError::WrongLength(tiles.len()))?;
        Self::new(tiles)
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            tiles: DEFAULT_GOAL,
            blank: (CELLS - 1) as u8,
        }
    }
}

impl State {
    pub fn new(tiles: [u8; CELLS]) -> Result<Self, PuzzleError> {
        let mut seen = [false; CELLS];
        for &tile in &tiles {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(PuzzleError::TileOutOfRange(tile))?;
            if *slot {
                return Err(PuzzleError::DuplicateTile(tile));
            }
            *slot = true;
        }
        let blank = find_blank(&tiles)?;
        Ok(Self {
            tiles,
            blank: blank as u8,
        })
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank as usize
    }

    /// Target square of the blank after moving it in `action`, if on the board.
    fn blank_target(&self, action: Action) -> Option<usize> {
        let (row, col) = (self.blank() / SIZE, self.blank() % SIZE);
        let (row, col) = match action {
            Action::Up => (row.checked_sub(1)?, col),
            Action::Down => (row + 1, col),
            Action::Left => (row, col.checked_sub(1)?),
            Action::Right => (row, col + 1),
        };
        if SIZE <= row || SIZE <= col {
            return None;
        }
        Some(row * SIZE + col)
    }

    /// Slide the blank, or `None` if it would leave the board.
    pub fn slide(&self, action: Action) -> Option<State> {
        let target = self.blank_target(action)?;
        let mut tiles = self.tiles;
        tiles.swap(self.blank(), target);
        Some(State {
            tiles,
            blank: target as u8,
        })
    }

    pub fn actions(&self) -> ArrayVec<Action, 4> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.blank_target(action).is_some())
            .collect()
    }

    pub fn successors(&self) -> impl Iterator<Item = (Action, State)> + '_ {
        Action::ALL
            .into_iter()
            .filter_map(|action| Some((action, self.slide(action)?)))
    }

    /// Parity of the number of inverted tile pairs, blank ignored.
    fn inversion_parity(&self) -> bool {
        let tiles = self.tiles.iter().filter(|&&tile| tile != BLANK);
        let inversions = tiles
            .clone()
            .enumerate()
            .map(|(i, &a)| tiles.clone().skip(i + 1).filter(|&&b| b < a).count())
            .sum::<usize>();
        inversions % 2 == 1
    }
}

/// Estimate of the remaining cost to the goal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Number of tiles off their goal square.
    #[default]
    Misplaced,
    /// Sum of row and column displacement of every tile.
    Manhattan,
}

/// An 8-puzzle instance: where we start, where we must end, and how to estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    initial: State,
    goal: State,
    /// Goal square of each tile.
    goal_square: [u8; CELLS],
    heuristic: Heuristic,
}

impl Puzzle {
    pub fn new(initial: State) -> Self {
        Self::with_goal(initial, State::default())
    }

    pub fn with_goal(initial: State, goal: State) -> Self {
        let mut goal_square = [0; CELLS];
        for (square, &tile) in goal.tiles.iter().enumerate() {
            goal_square[tile as usize] = square as u8;
        }
        Self {
            initial,
            goal,
            goal_square,
            heuristic: Heuristic::default(),
        }
    }

    /// Build from raw tiles, validating both boards.
    pub fn from_tiles(
        initial: [u8; CELLS],
        goal: Option<[u8; CELLS]>,
    ) -> Result<Self, PuzzleError> {
        let initial = State::new(initial)?;
        let goal = goal.map(State::new).transpose()?.unwrap_or_default();
        Ok(Self::with_goal(initial, goal))
    }

    pub fn with_heuristic(self, heuristic: Heuristic) -> Self {
        Self { heuristic, ..self }
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn goal(&self) -> &State {
        &self.goal
    }

    pub fn actions(&self, state: &State) -> ArrayVec<Action, 4> {
        state.actions()
    }

    pub fn result(&self, state: &State, action: Action) -> Result<State, PuzzleError> {
        state.slide(action).ok_or(PuzzleError::InvalidAction {
            action,
            blank: state.blank(),
        })
    }

    pub fn goal_test(&self, state: &State) -> bool {
        *state == self.goal
    }

    pub fn find_blank(&self, state: &State) -> usize {
        state.blank()
    }

    pub fn heuristic(&self, state: &State) -> u32 {
        let tiles = state
            .tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK);
        match self.heuristic {
            Heuristic::Misplaced => tiles
                .filter(|&(square, &tile)| self.goal.tiles[square] != tile)
                .count() as u32,
            Heuristic::Manhattan => tiles
                .map(|(square, &tile)| {
                    let target = self.goal_square[tile as usize] as usize;
                    let rows = (square / SIZE).abs_diff(target / SIZE);
                    let cols = (square % SIZE).abs_diff(target % SIZE);
                    (rows + cols) as u32
                })
                .sum(),
        }
    }

    /// Whether the goal is reachable at all. On an odd-width board a move never
    /// changes inversion parity, so both boards must agree on it.
    pub fn is_solvable(&self) -> bool {
        self.initial.inversion_parity() == self.goal.inversion_parity()
    }
}

/// Random walk of `moves` legal moves away from `goal`, never undoing the
/// previous move.
pub fn scramble(goal: State, moves: usize, rng: &mut impl Rng) -> State {
    let mut state = goal;
    let mut last = None;
    for _ in 0..moves {
        let choices = state
            .actions()
            .into_iter()
            .filter(|&action| Some(action.reversed()) != last)
            .collect::<ArrayVec<_, 4>>();
        let Some(&action) = choices.choose(rng) else { break };
        if let Some(next) = state.slide(action) {
            state = next;
            last = Some(action);
        }
    }
    state
}
