//! Test utilities (internal use only)

use engine_core::{GameState, Placement, Player};

/// Placement-only game on a square board: any empty cell is legal, there
/// are no captures, and the side to move with no empty cell loses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FillGame {
    filled: Vec<bool>,
    to_move: Player,
}

impl FillGame {
    pub fn empty(size: usize) -> Self {
        Self {
            filled: vec![false; size * size],
            to_move: Player::Black,
        }
    }

    /// Board where every cell is filled except `free`.
    pub fn with_free(size: usize, free: &[u8]) -> Self {
        let mut filled = vec![true; size * size];
        for &cell in free {
            filled[cell as usize] = false;
        }
        Self {
            filled,
            to_move: Player::Black,
        }
    }

    pub fn after_move(&self, mv: u8) -> Self {
        self.after(mv).expect("move should be legal in test setup")
    }
}

impl GameState for FillGame {
    type Move = u8;

    fn current_player(&self) -> Player {
        self.to_move
    }

    fn move_space(&self) -> Vec<u8> {
        (0..self.filled.len() as u8).collect()
    }

    fn apply(&mut self, mv: u8) -> Placement {
        match self.filled.get(mv as usize) {
            Some(false) => {
                self.filled[mv as usize] = true;
                self.to_move = self.to_move.opponent();
                Placement::Legal
            }
            _ => Placement::Illegal,
        }
    }
}
