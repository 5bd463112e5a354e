//! Random maze generation.

use proptest::prelude::*;

use pacman_engine::layout::{generate_maze_with, random_maze};
use pacman_engine::{generate_maze, GameRng, Layout, LayoutError, MazeConfig};

fn cells(maze: &str) -> Vec<Vec<char>> {
    maze.lines().map(|line| line.chars().collect()).collect()
}

/// Agent starts count as one class under reflection.
fn class(c: char) -> char {
    if c.is_ascii_digit() {
        'A'
    } else {
        c
    }
}

#[test]
fn test_default_maze_shape() {
    let maze = generate_maze(1);
    let grid = cells(&maze);

    assert_eq!(grid.len(), 18);
    assert!(grid.iter().all(|row| row.len() == 34));
    assert!(grid[0].iter().all(|&c| c == '%'));
    assert!(grid[17].iter().all(|&c| c == '%'));
    assert!(grid.iter().all(|row| row[0] == '%' && row[33] == '%'));

    // Starts: 1 and 3 bottom left, 2 and 4 top right.
    assert_eq!(grid[16][1], '3');
    assert_eq!(grid[15][1], '1');
    assert_eq!(grid[1][32], '4');
    assert_eq!(grid[2][32], '2');
}

#[test]
fn test_maze_parses_with_four_agents() {
    let layout = Layout::parse(&generate_maze(99)).unwrap();
    assert_eq!(layout.all_agent_starts().len(), 4);
    assert!(layout.all_agent_starts().iter().all(|start| !start.is_pacman));
    assert!(layout.total_food() > 0);
    assert!(layout.capsules().len() <= 4);
}

#[test]
fn test_random_layout_names() {
    let mut rng = GameRng::new(12);
    let (seed, text) = random_maze(&mut GameRng::new(12));
    assert!((1..=10_000).contains(&seed));

    let layout = Layout::resolve("RANDOM", &mut rng).unwrap();
    assert_eq!(layout, Layout::parse(&text).unwrap());

    let seeded = Layout::resolve(&format!("RANDOM{seed}"), &mut rng).unwrap();
    assert_eq!(seeded, layout);

    assert!(matches!(
        Layout::resolve("RANDOMxyz", &mut rng),
        Err(LayoutError::InvalidSeed(_))
    ));
}

#[test]
fn test_config_overrides() {
    let config = MazeConfig::default().with_size(10).with_max_capsules(0);
    let grid = cells(&generate_maze_with(5, &config));

    assert_eq!(grid.len(), 12);
    assert!(grid.iter().all(|row| row.len() == 22));
    assert!(grid.iter().flatten().all(|&c| c != 'o'));
}

proptest! {
    #[test]
    fn prop_same_seed_same_maze(seed in 1u64..=10_000) {
        prop_assert_eq!(generate_maze(seed), generate_maze(seed));
    }

    /// The board is symmetric under a half turn.
    #[test]
    fn prop_point_symmetric(seed in 1u64..=10_000) {
        let grid = cells(&generate_maze(seed));
        let (rows, cols) = (grid.len(), grid[0].len());
        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(class(grid[r][c]), class(grid[rows - 1 - r][cols - 1 - c]));
            }
        }
    }
}
