//! Uniform random playouts.

use engine_core::{first_legal_move, GameState, Player};
use rand::Rng;

/// Result of one playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutOutcome {
    /// Side that still had a move when the opponent ran out.
    pub winner: Player,

    /// Moves played during the playout.
    pub plies: u32,
}

/// Random rollout policy.
///
/// Keeps one scratch copy of the move domain so each ply only reshuffles it
/// instead of allocating.
#[derive(Debug, Clone)]
pub struct RandomRollout<M> {
    domain: Vec<M>,
}

impl<M: Copy> RandomRollout<M> {
    pub fn new(domain: Vec<M>) -> Self {
        Self { domain }
    }

    /// Play uniformly random legal moves on a copy of `state` until the side
    /// to move has none. That side loses.
    pub fn play<G, R>(&mut self, state: &G, rng: &mut R) -> RolloutOutcome
    where
        G: GameState<Move = M>,
        R: Rng + ?Sized,
    {
        let mut scratch = state.clone();
        let mut plies = 0;
        while first_legal_move(&mut scratch, &mut self.domain, rng).is_some() {
            plies += 1;
        }
        RolloutOutcome {
            winner: scratch.current_player().opponent(),
            plies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FillGame;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_fill_game_parity_decides_winner() {
        // With n free cells exactly n moves are played; the side to move
        // after that loses.
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let state = FillGame::empty(3);
        let mut rollout = RandomRollout::new(state.move_space());

        let outcome = rollout.play(&state, &mut rng);
        assert_eq!(outcome.plies, 9);
        assert_eq!(outcome.winner, Player::Black);

        let even = FillGame::with_free(2, &[0, 3]);
        let outcome = rollout.play(&even, &mut rng);
        assert_eq!(outcome.plies, 2);
        assert_eq!(outcome.winner, Player::White);
    }

    #[test]
    fn test_terminal_state_loses_immediately() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let state = FillGame::with_free(2, &[]);
        let mut rollout = RandomRollout::new(state.move_space());

        let outcome = rollout.play(&state, &mut rng);
        assert_eq!(outcome.plies, 0);
        assert_eq!(outcome.winner, Player::White);
    }

    #[test]
    fn test_rollout_leaves_input_untouched() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let state = FillGame::empty(2);
        let before = state.clone();
        RandomRollout::new(state.move_space()).play(&state, &mut rng);
        assert_eq!(state, before);
    }
}
