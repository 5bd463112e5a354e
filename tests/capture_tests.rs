//! Capture variant behaviour through the public API.

use std::sync::Arc;

use pacman_engine::{
    CaptureConfig, CaptureRules, Direction, Game, GameRng, GameResult, GameState, Layout, RandomAgent, RulesEngine,
    Team,
};

// Halves split at x = 5. Red (1) defends the left, blue (2) the right.
const BOARD: &str = "\
%%%%%%%%%%
%1..  ..2%
%.  oo  .%
%%%%%%%%%%";

fn state(config: CaptureConfig) -> GameState {
    let layout = Arc::new(Layout::parse(BOARD).unwrap());
    CaptureRules::new(config).initial_state(layout, 2)
}

fn walk(state: GameState, agent: usize, moves: &[Direction]) -> GameState {
    moves
        .iter()
        .try_fold(state, |s, &d| s.generate_successor(agent, d))
        .unwrap()
}

/// Crossing the midline turns a defender into an invader and back.
#[test]
fn test_role_follows_side() {
    let s = state(CaptureConfig::default());
    let s = walk(s, 0, &[Direction::East; 3]);
    assert!(!s.agent_state(0).unwrap().is_pacman());
    // Own food is never eaten.
    assert!(s.has_food(2, 2));

    let s = walk(s, 0, &[Direction::East]);
    assert!(s.agent_state(0).unwrap().is_pacman());

    let s = walk(s, 0, &[Direction::West]);
    assert!(!s.agent_state(0).unwrap().is_pacman());
}

#[test]
fn test_eating_down_to_min_food_ends_game() {
    let rules = CaptureRules::default();
    let s = state(CaptureConfig::default());
    let s = walk(s, 0, &[Direction::East; 5]);

    // Blue defended 3 dots; one left over the minimum of 2 ends it.
    assert!(!s.has_food(6, 2));
    assert_eq!(s.capture().unwrap().food_of(Team::Blue).count(true), 2);
    assert_eq!(s.score(), 1);
    assert!(s.is_over());
    assert!(rules.process(&s));
    assert_eq!(rules.result(&s), Some(GameResult::Winners(vec![0])));
}

/// Only enemy capsules can be eaten, and they scare the enemy team.
#[test]
fn test_capsules_belong_to_sides() {
    let s = state(CaptureConfig::default());
    let s = walk(s, 0, &[Direction::East, Direction::East, Direction::East, Direction::South]);
    assert_eq!(s.capsules().len(), 2);

    let s = walk(s, 0, &[Direction::East]);
    let data = s.capture().unwrap();
    assert!(data.capsules_of(Team::Blue).is_empty());
    assert_eq!(data.capsules_of(Team::Red).len(), 1);
    assert_eq!(s.agent_state(1).unwrap().scared_timer(), 40);
    assert_eq!(s.agent_state(0).unwrap().scared_timer(), 0);
}

#[test]
fn test_partitions_track_the_board() {
    let s = state(CaptureConfig::default());
    let s = walk(s, 1, &[Direction::West; 3]);
    // x=5 is still blue's half.
    assert!(!s.agent_state(1).unwrap().is_pacman());

    let s = walk(s, 1, &[Direction::West]);
    assert!(s.agent_state(1).unwrap().is_pacman());
    let s = walk(s, 1, &[Direction::West]);
    let data = s.capture().unwrap();
    assert!(!s.has_food(3, 2));
    assert!(!data.food_of(Team::Red).get(3, 2));
    assert_eq!(data.food_of(Team::Red).count(true) + data.food_of(Team::Blue).count(true), s.num_food());
    assert_eq!(s.score(), -1);
}

#[test]
fn test_clock_runs_out_in_a_game() {
    let layout = Arc::new(Layout::parse(BOARD).unwrap());
    let rules = CaptureRules::new(CaptureConfig::default().with_max_moves(30).with_min_food(0));
    let mut rng = GameRng::new(4);
    let agents: Vec<Box<dyn pacman_engine::Agent>> = vec![
        Box::new(RandomAgent::new(0, rng.fork())),
        Box::new(RandomAgent::new(1, rng.fork())),
    ];

    let mut game: Game<CaptureRules> = rules.new_game(layout, agents, &mut rng);
    let outcome = game.run().unwrap();

    assert!(outcome.final_state.is_over());
    assert!(outcome.num_moves() <= 30);
    let expected = match outcome.score {
        0 => GameResult::Draw,
        s if s > 0 => GameResult::Winners(vec![0]),
        _ => GameResult::Winners(vec![1]),
    };
    assert_eq!(outcome.result, expected);
}

#[test]
fn test_generated_maze_has_four_teams_members() {
    let layout = Arc::new(Layout::resolve("RANDOM7", &mut GameRng::new(0)).unwrap());
    let s = CaptureRules::default().initial_state(layout, 4);
    let data = s.capture().unwrap();

    assert_eq!(data.team_indices(Team::Red), vec![0, 2]);
    assert_eq!(data.team_indices(Team::Blue), vec![1, 3]);
    assert_eq!(data.food_of(Team::Red).count(true), data.food_of(Team::Blue).count(true));
}
