//! Classic variant behaviour through the public API.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use pacman_engine::{
    ClassicConfig, ClassicRules, Direction, GameRng, GameResult, GameState, Layout, RuleError, RulesEngine,
};

const MEDIUM: &str = "\
%%%%%%%%%
%.......%
%.%%o%%.%
%.G...G.%
%.%%.%%.%
%...P...%
%%%%%%%%%";

fn state(text: &str) -> GameState {
    let layout = Arc::new(Layout::parse(text).unwrap());
    GameState::new_classic(layout, ClassicConfig::default(), 4)
}

/// Pacman eats the last dot: food, win bonus and the move penalty.
#[test]
fn test_last_food_wins() {
    let s = state("%%%%\n%P.%\n%%%%");
    let next = s.generate_successor(0, Direction::East).unwrap();

    assert!(next.is_win());
    assert_eq!(next.score(), 509);
    assert_eq!(next.num_food(), 0);
    assert_eq!(ClassicRules::default().result(&next), Some(GameResult::Winner(0)));
}

/// A capsule scares the ghost, which slows down and can be eaten.
#[test]
fn test_capsule_then_eat_ghost() {
    let s = state("%%%%%%\n%Po G%\n%%%%%%");

    let s = s.generate_successor(0, Direction::East).unwrap();
    assert!(s.capsules().is_empty());
    assert_eq!(s.agent_state(1).unwrap().scared_timer(), 40);
    assert_eq!(s.score(), -1);

    let s = s.generate_successor(1, Direction::West).unwrap();
    assert_eq!(s.agent_state(1).unwrap().scared_timer(), 39);

    let s = s.generate_successor(0, Direction::East).unwrap();
    let ghost = s.agent_state(1).unwrap();
    assert_eq!(ghost.position(), ghost.start().position);
    assert!(!ghost.is_scared());
    assert_eq!(s.score(), 198);
    assert!(!s.is_over());
}

#[test]
fn test_successor_leaves_parent_untouched() {
    let parent = state(MEDIUM);
    let before = parent.clone();

    let child = parent.generate_successor(0, Direction::West).unwrap();
    assert_eq!(parent, before);
    assert_eq!(parent.structural_hash(), before.structural_hash());
    assert!(parent.has_food(3, 1));
    assert!(!child.has_food(3, 1));
    assert_eq!(child.num_food(), parent.num_food() - 1);
}

#[test]
fn test_terminal_state_is_frozen() {
    let s = state("%%%%\n%P.%\n%%%%");
    let done = s.generate_successor(0, Direction::East).unwrap();

    for agent in 0..done.num_agents() {
        assert!(done.legal_actions(agent).is_empty());
    }
    assert_eq!(done.generate_successor(0, Direction::West), Err(RuleError::TerminalState));
}

/// Equality depends on where the agents are, not on how they got there.
#[test]
fn test_equality_is_path_independent() {
    let s = state("%%%%%\n%P  %\n%   %\n%%%%%");

    let a = [Direction::East, Direction::South, Direction::East]
        .into_iter()
        .try_fold(s.clone(), |st, d| st.generate_successor(0, d))
        .unwrap();
    let b = [Direction::South, Direction::East, Direction::East]
        .into_iter()
        .try_fold(s.clone(), |st, d| st.generate_successor(0, d))
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(a.structural_hash(), b.structural_hash());
    let distinct: HashSet<GameState> = [a, b, s].into_iter().collect();
    assert_eq!(distinct.len(), 2);
}

#[test]
fn test_rules_engine_root_state() {
    let layout = Arc::new(Layout::parse(MEDIUM).unwrap());
    let rules = ClassicRules::default();

    let full = rules.initial_state(layout.clone(), 3);
    assert_eq!(full.num_agents(), 3);
    let fewer = rules.initial_state(layout, 2);
    assert_eq!(fewer.num_agents(), 2);
    assert!(full.agent_state(0).unwrap().is_pacman());
    assert!(!full.agent_state(1).unwrap().is_pacman());
}

proptest! {
    /// Along random walks, legal actions are exactly those the state
    /// accepts, and the parent never changes.
    #[test]
    fn prop_legal_actions_match_successors(seed in 0u64..500) {
        let mut rng = GameRng::new(seed);
        let mut s = state(MEDIUM);
        let mut turn = 0;

        for _ in 0..60 {
            if s.is_over() {
                break;
            }
            let agent = turn % s.num_agents();
            let legal = s.legal_actions(agent);
            let hash = s.structural_hash();

            for action in Direction::ALL {
                let result = s.generate_successor(agent, action);
                if legal.contains(&action) {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert_eq!(result, Err(RuleError::IllegalAction { agent, action }));
                }
            }
            prop_assert_eq!(s.structural_hash(), hash);

            let action = *rng.choose(&legal).unwrap();
            let next = s.generate_successor(agent, action).unwrap();
            prop_assert_eq!(next.score(), s.score() + next.score_change());
            s = next;
            turn += 1;
        }
    }
}
