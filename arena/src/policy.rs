//! Move selection agents for the arena
//!
//! Every agent implements the same [`Agent`] capability; the arena never
//! knows which strategy sits behind it.

use std::fmt;
use std::str::FromStr;

use engine_core::{first_legal_move, mobility, GameState, Player};
use mcts::{seeded_rng, Coordinator, MctsConfig, SearchBudget, SearchError, SearchStats};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::debug;

/// Characters an agent name may not contain (they delimit names in logs).
const RESERVED_NAME_CHARS: &[char] = &['[', ']', '(', ')', ':', ';', ' '];

/// Errors raised while building an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("unknown agent kind: {0} (expected random, greedy or mcts)")]
    UnknownKind(String),

    #[error("search engine: {0}")]
    Search(#[from] SearchError),
}

/// A player that picks moves for one side.
pub trait Agent<G: GameState>: Send {
    fn name(&self) -> &str;

    fn role(&self) -> Player;

    /// Called before the first move of a game.
    fn open_episode(&mut self) {}

    /// Called once the game is decided.
    fn close_episode(&mut self) {}

    /// Choose a move for `state`, or None when there is no legal move.
    fn take_action(&mut self, state: &G) -> Option<G::Move>;

    /// Statistics of the most recent search, for agents that search.
    fn last_search(&self) -> Option<&SearchStats> {
        None
    }
}

/// Plays a uniformly random legal move.
#[derive(Debug)]
pub struct RandomAgent<G: GameState> {
    name: String,
    role: Player,
    rng: ChaCha20Rng,
    domain: Vec<G::Move>,
}

impl<G: GameState> RandomAgent<G> {
    pub fn new(name: impl Into<String>, role: Player, seed: Option<u64>) -> Self {
        Self {
            name: name.into(),
            role,
            rng: seeded_rng(seed),
            domain: Vec::new(),
        }
    }
}

impl<G: GameState> Agent<G> for RandomAgent<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Player {
        self.role
    }

    /// The next game may be on another board.
    fn open_episode(&mut self) {
        self.domain.clear();
    }

    fn take_action(&mut self, state: &G) -> Option<G::Move> {
        if self.domain.is_empty() {
            self.domain = state.move_space();
        }
        let mut scratch = state.clone();
        first_legal_move(&mut scratch, &mut self.domain, &mut self.rng)
    }
}

/// Plays the move that leaves the opponent the fewest legal replies.
#[derive(Debug)]
pub struct GreedyAgent {
    name: String,
    role: Player,
    rng: ChaCha20Rng,
}

impl GreedyAgent {
    pub fn new(name: impl Into<String>, role: Player, seed: Option<u64>) -> Self {
        Self {
            name: name.into(),
            role,
            rng: seeded_rng(seed),
        }
    }
}

impl<G: GameState> Agent<G> for GreedyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Player {
        self.role
    }

    fn take_action(&mut self, state: &G) -> Option<G::Move> {
        let mut moves = state.legal_moves();
        moves.shuffle(&mut self.rng);

        // min_by_key keeps the first minimum, so the shuffle breaks ties
        moves
            .into_iter()
            .filter_map(|mv| state.after(mv).map(|next| (mv, mobility(&next))))
            .min_by_key(|&(_, replies)| replies)
            .map(|(mv, _)| mv)
    }
}

/// Searches with a root-parallel MCTS engine.
pub struct MctsAgent<G: GameState> {
    name: String,
    engine: Coordinator<G>,
    budget: SearchBudget,
    last: Option<SearchStats>,
}

impl<G: GameState> MctsAgent<G> {
    pub fn new(name: impl Into<String>, role: Player, config: MctsConfig) -> Result<Self, SearchError> {
        let budget = config.budget;
        Ok(Self {
            name: name.into(),
            engine: Coordinator::new(config, role)?,
            budget,
            last: None,
        })
    }
}

impl<G: GameState> fmt::Debug for MctsAgent<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MctsAgent")
            .field("name", &self.name)
            .field("engine", &self.engine)
            .field("budget", &self.budget)
            .finish()
    }
}

impl<G: GameState> Agent<G> for MctsAgent<G> {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Player {
        self.engine.perspective()
    }

    fn open_episode(&mut self) {
        self.engine.reset();
        self.last = None;
    }

    fn take_action(&mut self, state: &G) -> Option<G::Move> {
        let result = self.engine.search(state, self.budget);
        self.last = Some(result.stats);
        result.action
    }

    fn last_search(&self) -> Option<&SearchStats> {
        self.last.as_ref()
    }
}

/// Strategy behind an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Greedy,
    Mcts,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::Greedy => "greedy",
            AgentKind::Mcts => "mcts",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "greedy" => Ok(AgentKind::Greedy),
            "mcts" => Ok(AgentKind::Mcts),
            _ => Err(AgentError::UnknownKind(s.to_string())),
        }
    }
}

/// Typed description of one agent, validated by [`build_agent`].
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: String,
    pub role: Player,
    pub kind: AgentKind,
    /// Seed for the agent's own RNG (MCTS agents take theirs from `search`)
    pub seed: Option<u64>,
    pub search: MctsConfig,
}

impl AgentSpec {
    /// Spec named after its kind, with default search settings.
    pub fn new(kind: AgentKind, role: Player) -> Self {
        Self {
            name: kind.as_str().to_string(),
            role,
            kind,
            seed: None,
            search: MctsConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.name.is_empty() || self.name.contains(RESERVED_NAME_CHARS) {
            return Err(AgentError::InvalidName(self.name.clone()));
        }
        if self.kind == AgentKind::Mcts {
            self.search.validate()?;
        }
        Ok(())
    }
}

/// Validate `spec` and build the agent it describes.
pub fn build_agent<G: GameState>(spec: &AgentSpec) -> Result<Box<dyn Agent<G>>, AgentError> {
    spec.validate()?;
    debug!(name = %spec.name, role = %spec.role, kind = %spec.kind, "Building agent");

    let agent: Box<dyn Agent<G>> = match spec.kind {
        AgentKind::Random => Box::new(RandomAgent::<G>::new(
            spec.name.clone(),
            spec.role,
            spec.seed,
        )),
        AgentKind::Greedy => Box::new(GreedyAgent::new(spec.name.clone(), spec.role, spec.seed)),
        AgentKind::Mcts => Box::new(MctsAgent::<G>::new(
            spec.name.clone(),
            spec.role,
            spec.search.clone(),
        )?),
    };
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_nogo::{Board, Place};

    fn small_board() -> Board {
        Board::new(4).unwrap()
    }

    #[test]
    fn test_random_agent_plays_legal_moves() {
        let mut agent = RandomAgent::<Board>::new("random", Player::Black, Some(42));
        let mut board = small_board();

        while let Some(mv) = agent.take_action(&board) {
            assert!(board.legal_moves().contains(&mv));
            assert!(board.apply(mv).is_legal());
        }
        assert!(board.is_terminal());
    }

    #[test]
    fn test_random_agent_determinism_with_same_seed() {
        let mut a = RandomAgent::<Board>::new("a", Player::Black, Some(12345));
        let mut b = RandomAgent::<Board>::new("b", Player::Black, Some(12345));
        let board = Board::standard();

        for _ in 0..20 {
            assert_eq!(a.take_action(&board), b.take_action(&board));
        }
    }

    #[test]
    fn test_random_agent_follows_board_size_across_episodes() {
        let mut agent = RandomAgent::<Board>::new("random", Player::Black, Some(8));
        // A lone stone on 1x1 has no liberty
        assert_eq!(agent.take_action(&Board::new(1).unwrap()), None);

        agent.open_episode();
        let mut board = Board::new(2).unwrap();
        for _ in 0..2 {
            let mv = agent.take_action(&board).unwrap();
            assert!(board.apply(mv).is_legal());
        }
    }

    #[test]
    fn test_agents_report_no_action_when_stuck() {
        let stuck = Board::from_rows(&[".XO", "XOX", "OXO"], Player::White).unwrap();

        let mut random = RandomAgent::<Board>::new("r", Player::White, Some(1));
        let mut greedy = GreedyAgent::new("g", Player::White, Some(1));
        let mut mcts =
            MctsAgent::<Board>::new("m", Player::White, MctsConfig::for_testing()).unwrap();

        assert_eq!(random.take_action(&stuck), None);
        assert_eq!(Agent::<Board>::take_action(&mut greedy, &stuck), None);
        assert_eq!(mcts.take_action(&stuck), None);
    }

    #[test]
    fn test_greedy_minimises_opponent_replies() {
        // Moves next to the white stone change white's options; the chosen
        // move must leave as few replies as any alternative.
        let board = Board::from_rows(&["...", "XOX", "..."], Player::Black).unwrap();
        let mut greedy = GreedyAgent::new("greedy", Player::Black, Some(3));

        let chosen = Agent::<Board>::take_action(&mut greedy, &board).unwrap();
        let best = board
            .legal_moves()
            .into_iter()
            .map(|mv| mobility(&board.after(mv).unwrap()))
            .min()
            .unwrap();
        assert_eq!(mobility(&board.after(chosen).unwrap()), best);
    }

    #[test]
    fn test_mcts_agent_tracks_search_stats() {
        let config = MctsConfig::for_testing().with_iterations(40);
        let mut agent = MctsAgent::<Board>::new("mcts", Player::Black, config).unwrap();
        assert!(agent.last_search().is_none());

        let mv = agent.take_action(&small_board()).unwrap();
        assert!(small_board().legal_moves().contains(&mv));
        assert_eq!(agent.last_search().map(|s| s.iterations), Some(40));

        agent.open_episode();
        assert!(agent.last_search().is_none());
    }

    #[test]
    fn test_agent_kind_parse() {
        assert_eq!("mcts".parse::<AgentKind>().unwrap(), AgentKind::Mcts);
        assert_eq!(" Greedy ".parse::<AgentKind>().unwrap(), AgentKind::Greedy);
        assert!(matches!(
            "alphabeta".parse::<AgentKind>(),
            Err(AgentError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_build_agent_validates_name() {
        for bad in ["", "has space", "a:b", "x[1]", "f()", "semi;colon"] {
            let mut spec = AgentSpec::new(AgentKind::Random, Player::Black);
            spec.name = bad.to_string();
            let result = build_agent::<Board>(&spec);
            assert!(
                matches!(result, Err(AgentError::InvalidName(_))),
                "name {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_build_agent_rejects_bad_search_config() {
        let mut spec = AgentSpec::new(AgentKind::Mcts, Player::White);
        spec.search = MctsConfig::default().with_parallelism(0);
        assert!(matches!(
            build_agent::<Board>(&spec),
            Err(AgentError::Search(SearchError::InvalidConfig(_)))
        ));

        // Random agents ignore search settings
        spec.kind = AgentKind::Random;
        assert!(build_agent::<Board>(&spec).is_ok());
    }

    #[test]
    fn test_build_agent_sets_name_and_role() {
        let mut spec = AgentSpec::new(AgentKind::Mcts, Player::White);
        spec.search = MctsConfig::for_testing();
        let agent = build_agent::<Board>(&spec).unwrap();
        assert_eq!(agent.name(), "mcts");
        assert_eq!(agent.role(), Player::White);
    }

    #[test]
    fn test_place_moves_are_in_range() {
        let mut agent = GreedyAgent::new("greedy", Player::Black, None);
        let mv: Place = Agent::<Board>::take_action(&mut agent, &small_board()).unwrap();
        assert!(mv.index() < 16);
    }
}
