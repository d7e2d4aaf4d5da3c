use rand::{seq::SliceRandom, Rng};
use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::BoardError;

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Successor order used by [`Board::neighbors`].
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Offset from the blank to the tile that slides, as (row, col).
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An immutable N-by-N sliding puzzle configuration.
///
/// Tiles are stored row-major; `0` is the blank. Both heuristics are
/// computed on first use and cached for the lifetime of the board.
/// Equality and hashing only look at the grid.
#[derive(Clone)]
pub struct Board {
    size: usize,
    tiles: Vec<u32>,
    blank: usize,
    manhattan: OnceCell<u32>,
    hamming: OnceCell<u32>,
}

impl Board {
    /// Build a board from its rows.
    pub fn new(grid: Vec<Vec<u32>>) -> Result<Self, BoardError> {
        if grid.is_empty() {
            return Err(BoardError::Empty);
        }
        let size = grid.len();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
        }
        Self::from_tiles(size, grid.into_iter().flatten().collect())
    }

    /// Build a board from `size * size` tiles in row-major order.
    pub fn from_tiles(size: usize, tiles: Vec<u32>) -> Result<Self, BoardError> {
        if size < 2 {
            return Err(BoardError::TooSmall(size));
        }
        let expected = size * size;
        if tiles.len() != expected {
            return Err(BoardError::TileCount {
                expected,
                found: tiles.len(),
            });
        }

        let max = (expected - 1) as u32;
        let mut seen = vec![false; expected];
        for &value in &tiles {
            if value > max {
                return Err(BoardError::OutOfRange { value, max });
            }
            if std::mem::replace(&mut seen[value as usize], true) {
                return Err(BoardError::Duplicate(value));
            }
        }
        if let Some(value) = seen.iter().position(|&s| !s) {
            return Err(BoardError::Missing(value as u32));
        }

        Ok(Self::from_valid(size, tiles))
    }

    /// The solved configuration: 1..N*N-1 in order, blank last.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    pub fn goal(size: usize) -> Self {
        assert!(size >= 2, "board dimension must be at least 2");
        let last = size * size - 1;
        let tiles = (0..=last)
            .map(|i| if i == last { 0 } else { i as u32 + 1 })
            .collect();
        Self::from_valid(size, tiles)
    }

    /// A uniformly shuffled board; roughly half of these are unsolvable.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut tiles = Self::goal(size).tiles;
        tiles.shuffle(rng);
        Self::from_valid(size, tiles)
    }

    /// A shuffled board that is reachable from the goal.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    pub fn random_solvable<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        loop {
            let board = Self::random(size, rng);
            if board.is_solvable_by_parity() {
                return board;
            }
        }
    }

    fn from_valid(size: usize, tiles: Vec<u32>) -> Self {
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or_default();
        debug_assert_eq!(tiles[blank], 0);
        Self {
            size,
            tiles,
            blank,
            manhattan: OnceCell::new(),
            hamming: OnceCell::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn tile(&self, row: usize, col: usize) -> u32 {
        self.tiles[row * self.size + col]
    }

    /// Position of the blank as (row, col).
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Number of non-blank tiles out of place.
    pub fn hamming(&self) -> u32 {
        *self.hamming.get_or_init(|| {
            self.tiles
                .iter()
                .enumerate()
                .filter(|&(i, &t)| t != 0 && t as usize != i + 1)
                .count() as u32
        })
    }

    /// Sum of the Manhattan distances from each tile to its goal cell.
    pub fn manhattan(&self) -> u32 {
        *self.manhattan.get_or_init(|| {
            let n = self.size;
            self.tiles
                .iter()
                .enumerate()
                .filter(|&(_, &t)| t != 0)
                .map(|(i, &t)| {
                    let goal = t as usize - 1;
                    (i / n).abs_diff(goal / n) + (i % n).abs_diff(goal % n)
                })
                .sum::<usize>() as u32
        })
    }

    pub fn is_goal(&self) -> bool {
        self.manhattan() == 0
    }

    /// Swap two adjacent non-blank tiles: the first pair of row 0, or the
    /// first pair of row 1 when the blank sits in that pair.
    ///
    /// A board and its twin always fall in opposite solvability classes.
    pub fn twin(&self) -> Self {
        let (a, b) = if self.tiles[0] != 0 && self.tiles[1] != 0 {
            (0, 1)
        } else {
            (self.size, self.size + 1)
        };
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        Self::from_valid(self.size, tiles)
    }

    /// Slide the tile next to the blank in direction `dir` into the blank.
    /// Returns `None` if there is no such tile.
    pub fn slide(&self, dir: Move) -> Option<Self> {
        let (dr, dc) = dir.as_offset();
        let (row, col) = self.blank();
        let n = self.size as isize;

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        if new_row < 0 || new_row >= n || new_col < 0 || new_col >= n {
            return None;
        }
        Some(self.move_blank(new_row as usize * self.size + new_col as usize))
    }

    fn move_blank(&self, to: usize) -> Self {
        let (r0, c0) = (self.blank / self.size, self.blank % self.size);
        let (r1, c1) = (to / self.size, to % self.size);
        assert!(
            r0.abs_diff(r1) + c0.abs_diff(c1) == 1,
            "impossible slide from ({r0}, {c0}) to ({r1}, {c1})"
        );
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, to);
        Self {
            size: self.size,
            tiles,
            blank: to,
            manhattan: OnceCell::new(),
            hamming: OnceCell::new(),
        }
    }

    /// Every board one slide away, in [`Move::ALL`] order.
    pub fn neighbors(&self) -> Vec<Self> {
        Move::ALL.iter().filter_map(|&dir| self.slide(dir)).collect()
    }

    /// Inversion-parity solvability test.
    ///
    /// Odd widths are solvable with an even inversion count; even widths
    /// need inversions plus the blank's row index to be odd.
    pub fn is_solvable_by_parity(&self) -> bool {
        let inversions = Self::count_inversions(&self.tiles);
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.blank / self.size) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[u32]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.tiles.hash(state);
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("tiles", &self.tiles)
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        for row in self.tiles.chunks(self.size) {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses `N` followed by `N*N` tiles, all whitespace separated.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let first = tokens.next().ok_or(BoardError::Empty)?;
        let size: usize = first
            .parse()
            .map_err(|_| BoardError::Dimension(first.to_string()))?;
        if size < 2 {
            return Err(BoardError::TooSmall(size));
        }
        if size.checked_mul(size).is_none() {
            return Err(BoardError::Dimension(first.to_string()));
        }

        let tiles = tokens
            .map(|tok| tok.parse().map_err(|_| BoardError::Tile(tok.to_string())))
            .collect::<Result<Vec<u32>, _>>()?;
        Self::from_tiles(size, tiles)
    }
}
