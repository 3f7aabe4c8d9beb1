//! Shared utilities for move selection
//!
//! Rollouts and the simple agents both pick "a random legal move" the same
//! way: shuffle the full move domain and keep the first move that applies.
//! This avoids enumerating every legal move when only one is needed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::typed::GameState;

/// Shuffle `domain` in place and play the first legal move on `state`.
///
/// Returns the move that was applied, or `None` when the side to move has no
/// legal move (in which case `state` is unchanged).
///
/// # Example
/// ```
/// use engine_core::{first_legal_move, GameState, Placement, Player};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct OneShot(bool);
///
/// impl GameState for OneShot {
///     type Move = ();
///     fn current_player(&self) -> Player { Player::Black }
///     fn move_space(&self) -> Vec<()> { vec![()] }
///     fn apply(&mut self, _: ()) -> Placement {
///         if self.0 { return Placement::Illegal; }
///         self.0 = true;
///         Placement::Legal
///     }
/// }
///
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let mut state = OneShot(false);
/// let mut domain = state.move_space();
/// assert_eq!(first_legal_move(&mut state, &mut domain, &mut rng), Some(()));
/// assert_eq!(first_legal_move(&mut state, &mut domain, &mut rng), None);
/// ```
pub fn first_legal_move<G, R>(state: &mut G, domain: &mut [G::Move], rng: &mut R) -> Option<G::Move>
where
    G: GameState,
    R: Rng + ?Sized,
{
    domain.shuffle(rng);
    domain
        .iter()
        .copied()
        .find(|&mv| state.apply(mv).is_legal())
}

/// Number of legal moves available to the side to move.
#[inline]
pub fn mobility<G: GameState>(state: &G) -> usize {
    state.legal_moves().len()
}
