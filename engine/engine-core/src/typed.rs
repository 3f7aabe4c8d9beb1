//! Typed game contract consumed by the search engine
//!
//! The search never looks inside a board. It only needs to enumerate legal
//! moves, apply a move to a private copy of the state, compare states for
//! equality (tree reuse) and know whose turn it is.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// One side of a two-player, alternating-move game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The side that moves after this one.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::Black => "black",
            Player::White => "white",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string names neither side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0} (expected black or white)")]
pub struct PlayerParseError(pub String);

impl FromStr for Player {
    type Err = PlayerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Player::Black),
            "white" | "w" => Ok(Player::White),
            _ => Err(PlayerParseError(s.to_string())),
        }
    }
}

/// Outcome of applying a move to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Legal,
    Illegal,
}

impl Placement {
    #[inline]
    pub fn is_legal(self) -> bool {
        self == Placement::Legal
    }
}

/// Rules contract for games the engine can search.
///
/// States are plain values: the search clones them freely, so they should be
/// cheap to copy. A side that has no legal move when it is its turn loses.
///
/// # Example
///
/// ```rust
/// use engine_core::{GameState, Placement, Player};
///
/// /// Players alternately take one of `n` stones; whoever cannot take loses.
/// #[derive(Debug, Clone, PartialEq)]
/// struct Take {
///     left: u8,
///     to_move: Player,
/// }
///
/// impl GameState for Take {
///     type Move = u8;
///
///     fn current_player(&self) -> Player {
///         self.to_move
///     }
///
///     fn move_space(&self) -> Vec<u8> {
///         vec![1]
///     }
///
///     fn apply(&mut self, mv: u8) -> Placement {
///         if mv != 1 || self.left == 0 {
///             return Placement::Illegal;
///         }
///         self.left -= 1;
///         self.to_move = self.to_move.opponent();
///         Placement::Legal
///     }
/// }
///
/// let mut state = Take { left: 1, to_move: Player::Black };
/// assert_eq!(state.legal_moves(), vec![1]);
/// assert!(state.apply(1).is_legal());
/// assert!(state.is_terminal());
/// ```
pub trait GameState: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// Move type. The search treats moves as opaque tree edge labels.
    type Move: Copy + Eq + Hash + Send + Sync + std::fmt::Debug + 'static;

    /// The side to move in this state.
    fn current_player(&self) -> Player;

    /// Every move that could ever be legal on this board, regardless of the
    /// current position. Rollouts shuffle this domain and take the first
    /// move that applies.
    fn move_space(&self) -> Vec<Self::Move>;

    /// Apply `mv` for the side to move.
    ///
    /// On `Legal` the state advances and the turn passes to the opponent.
    /// On `Illegal` the state must be left exactly as it was.
    fn apply(&mut self, mv: Self::Move) -> Placement;

    /// Legal moves for the side to move. The default probes every move in
    /// `move_space` on a scratch copy; games with cheaper legality checks
    /// should override it.
    fn legal_moves(&self) -> Vec<Self::Move> {
        self.move_space()
            .into_iter()
            .filter(|&mv| self.clone().apply(mv).is_legal())
            .collect()
    }

    /// State reached by playing `mv`, or `None` if it is illegal.
    fn after(&self, mv: Self::Move) -> Option<Self> {
        let mut next = self.clone();
        next.apply(mv).is_legal().then_some(next)
    }

    /// True when the side to move has lost.
    fn is_terminal(&self) -> bool {
        self.legal_moves().is_empty()
    }
}
