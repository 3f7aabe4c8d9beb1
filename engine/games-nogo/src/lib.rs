//! NoGo game implementation for the search engine
//!
//! NoGo is played with Go stones on a square board, but capturing is
//! forbidden: a placement is illegal if it leaves the placed group without a
//! liberty (suicide) or if it takes the last liberty of any opponent group
//! (capture). The side to move with no legal placement loses.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{GameState, Player};
//! use games_nogo::{Board, Place};
//!
//! let mut board = Board::standard();
//! assert_eq!(board.current_player(), Player::Black);
//! assert_eq!(board.legal_moves().len(), 81);
//!
//! assert!(board.apply(Place(40)).is_legal());
//! assert_eq!(board.current_player(), Player::White);
//! ```

use std::fmt;

use engine_core::{GameState, Placement, Player};
use thiserror::Error;

/// Largest supported board edge.
pub const MAX_SIZE: usize = 19;

/// Edge of the standard NoGo board.
pub const STANDARD_SIZE: usize = 9;

/// Errors raised while constructing a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board size must be between 1 and {MAX_SIZE}, got {0}")]
    InvalidSize(usize),

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unexpected cell '{ch}' at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// Content of a single intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    fn of(player: Player) -> Stone {
        match player {
            Player::Black => Stone::Black,
            Player::White => Stone::White,
        }
    }

    fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

/// NoGo action: place a stone of the side to move on a cell index
/// (row-major, `row * size + col`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Place(pub u16);

impl Place {
    /// Build a placement from board coordinates.
    pub fn at(row: usize, col: usize, size: usize) -> Place {
        Place((row * size + col) as u16)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// NoGo position: stones on the board plus the side to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
    to_move: Player,
}

impl Board {
    /// Empty board of the given edge length, Black to move.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_SIZE {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Stone::Empty; size * size],
            to_move: Player::Black,
        })
    }

    /// Empty 9×9 board, Black to move.
    pub fn standard() -> Self {
        Self {
            size: STANDARD_SIZE,
            cells: vec![Stone::Empty; STANDARD_SIZE * STANDARD_SIZE],
            to_move: Player::Black,
        }
    }

    /// Parse a position from rows of `.` (empty), `X` (black) and `O` (white).
    ///
    /// The stones are taken as given; no legality check is made on how they
    /// got there.
    pub fn from_rows(rows: &[&str], to_move: Player) -> Result<Self, BoardError> {
        let size = rows.len();
        let mut board = Self::new(size)?;
        board.to_move = to_move;

        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: size,
                    actual: symbols.len(),
                });
            }
            for (col, ch) in symbols.into_iter().enumerate() {
                let stone = match ch {
                    '.' => Stone::Empty,
                    'X' | 'x' | 'B' | 'b' => Stone::Black,
                    'O' | 'o' | 'W' | 'w' => Stone::White,
                    _ => return Err(BoardError::InvalidCell { row, col, ch }),
                };
                board.cells[row * size + col] = stone;
            }
        }

        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Stone at (row, col). Panics on out-of-range coordinates.
    pub fn stone_at(&self, row: usize, col: usize) -> Stone {
        self.cells[row * self.size + col]
    }

    /// Number of stones on the board.
    pub fn stones_played(&self) -> usize {
        self.cells.iter().filter(|&&s| s != Stone::Empty).count()
    }

    /// Whether the side to move may place on `index`.
    pub fn is_legal_at(&self, index: usize) -> bool {
        if index >= self.cells.len() || self.cells[index] != Stone::Empty {
            return false;
        }

        let mine = Stone::of(self.to_move);
        let theirs = Stone::of(self.to_move.opponent());

        // Suicide
        if !self.group_has_liberty(index, mine, index, mine) {
            return false;
        }

        // Capture
        self.neighbors(index)
            .all(|nb| self.cells[nb] != theirs || self.group_has_liberty(nb, theirs, index, mine))
    }

    /// Orthogonal neighbours of a cell index.
    fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> {
        let size = self.size;
        let (row, col) = (index / size, index % size);
        [
            (row > 0).then(|| index - size),
            (row + 1 < size).then(|| index + size),
            (col > 0).then(|| index - 1),
            (col + 1 < size).then(|| index + 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Flood-fill the `color` group containing `start` and report whether it
    /// touches an empty cell. `placed` is treated as holding `placed_stone`,
    /// so a candidate placement can be tested without mutating the board.
    fn group_has_liberty(
        &self,
        start: usize,
        color: Stone,
        placed: usize,
        placed_stone: Stone,
    ) -> bool {
        let stone_at = |idx: usize| {
            if idx == placed {
                placed_stone
            } else {
                self.cells[idx]
            }
        };

        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(cell) = stack.pop() {
            for nb in self.neighbors(cell) {
                let stone = stone_at(nb);
                if stone == Stone::Empty {
                    return true;
                }
                if stone == color && !visited[nb] {
                    visited[nb] = true;
                    stack.push(nb);
                }
            }
        }

        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl GameState for Board {
    type Move = Place;

    fn current_player(&self) -> Player {
        self.to_move
    }

    fn move_space(&self) -> Vec<Place> {
        (0..self.cells.len()).map(|i| Place(i as u16)).collect()
    }

    fn apply(&mut self, mv: Place) -> Placement {
        let index = mv.index();
        if !self.is_legal_at(index) {
            return Placement::Illegal;
        }
        self.cells[index] = Stone::of(self.to_move);
        self.to_move = self.to_move.opponent();
        Placement::Legal
    }

    fn legal_moves(&self) -> Vec<Place> {
        (0..self.cells.len())
            .filter(|&i| self.is_legal_at(i))
            .map(|i| Place(i as u16))
            .collect()
    }

    fn is_terminal(&self) -> bool {
        !(0..self.cells.len()).any(|i| self.is_legal_at(i))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row.iter().map(|s| s.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        write!(f, "{} to move", self.to_move)
    }
}
