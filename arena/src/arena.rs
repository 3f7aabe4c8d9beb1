//! Match runner: plays episodes between two agents and tallies results.

use std::time::{Duration, Instant};

use engine_core::{GameState, Player};
use tracing::{debug, info, warn};

use crate::policy::Agent;

/// Outcome of one game.
#[derive(Debug, Clone)]
pub struct EpisodeResult {
    pub winner: Player,
    /// Legal moves played before the loser ran out of moves
    pub moves: u32,
    /// MCTS iterations spent across both sides
    pub iterations: u64,
    /// Decisions that ran a search
    pub searches: u32,
    /// Set when the loser tried an illegal move instead of running out
    pub forfeit: bool,
    pub elapsed: Duration,
}

/// Running totals over a match.
#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    pub games: u32,
    pub black_wins: u32,
    pub white_wins: u32,
    pub forfeits: u32,
    pub total_moves: u64,
    pub total_iterations: u64,
    pub total_searches: u64,
    pub elapsed: Duration,
}

impl MatchStats {
    fn record(&mut self, result: &EpisodeResult) {
        self.games += 1;
        match result.winner {
            Player::Black => self.black_wins += 1,
            Player::White => self.white_wins += 1,
        }
        self.forfeits += u32::from(result.forfeit);
        self.total_moves += u64::from(result.moves);
        self.total_iterations += result.iterations;
        self.total_searches += u64::from(result.searches);
        self.elapsed += result.elapsed;
    }

    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::Black => self.black_wins,
            Player::White => self.white_wins,
        }
    }

    pub fn avg_moves(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games as f64
        }
    }

    /// Average MCTS iterations per search (0 when nobody searched).
    pub fn avg_iterations(&self) -> f64 {
        if self.total_searches == 0 {
            0.0
        } else {
            self.total_iterations as f64 / self.total_searches as f64
        }
    }
}

/// Two agents and the position every game starts from.
pub struct Arena<G: GameState> {
    initial: G,
    black: Box<dyn Agent<G>>,
    white: Box<dyn Agent<G>>,
}

impl<G: GameState> Arena<G> {
    pub fn new(initial: G, black: Box<dyn Agent<G>>, white: Box<dyn Agent<G>>) -> Self {
        Self {
            initial,
            black,
            white,
        }
    }

    fn agent(&mut self, player: Player) -> &mut dyn Agent<G> {
        match player {
            Player::Black => self.black.as_mut(),
            Player::White => self.white.as_mut(),
        }
    }

    /// Play one game to the end. The side to move with no legal move loses;
    /// so does a side that answers with an illegal move.
    pub fn play_episode(&mut self, episode: u32) -> EpisodeResult {
        let start = Instant::now();
        self.black.open_episode();
        self.white.open_episode();

        let mut state = self.initial.clone();
        let mut moves = 0u32;
        let mut iterations = 0u64;
        let mut searches = 0u32;
        let mut forfeit = false;

        let winner = loop {
            let mover = state.current_player();
            let agent = self.agent(mover);

            let Some(action) = agent.take_action(&state) else {
                break mover.opponent();
            };
            if let Some(search) = agent.last_search() {
                iterations += search.iterations;
                searches += 1;
            }

            if !state.apply(action).is_legal() {
                warn!(
                    episode,
                    agent = agent.name(),
                    ?action,
                    "Agent played an illegal move; forfeiting"
                );
                forfeit = true;
                break mover.opponent();
            }

            moves += 1;
            debug!(episode, ply = moves, player = %mover, ?action, "Move played");
        };

        self.black.close_episode();
        self.white.close_episode();

        let result = EpisodeResult {
            winner,
            moves,
            iterations,
            searches,
            forfeit,
            elapsed: start.elapsed(),
        };

        info!(
            episode,
            winner = %winner,
            winner_name = self.agent(winner).name(),
            moves,
            iterations,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Episode finished"
        );
        result
    }

    /// Play `games` episodes and return the totals.
    pub fn run(&mut self, games: u32) -> MatchStats {
        let mut stats = MatchStats::default();
        for episode in 1..=games {
            let result = self.play_episode(episode);
            stats.record(&result);
        }
        stats
    }

    pub fn black(&self) -> &dyn Agent<G> {
        self.black.as_ref()
    }

    pub fn white(&self) -> &dyn Agent<G> {
        self.white.as_ref()
    }
}
