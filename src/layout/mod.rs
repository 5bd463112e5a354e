//! Static board descriptions.
//!
//! A [`Layout`] is parsed from text art and never changes afterwards. Game
//! states share it behind an `Arc` and keep their own copies of whatever
//! they eat (food, capsules).
//!
//! ## Text format
//!
//! | char      | meaning                          |
//! |-----------|----------------------------------|
//! | `%`       | wall                             |
//! | `.`       | food                             |
//! | `o`       | capsule                          |
//! | `P`       | pacman start                     |
//! | `G`       | ghost start                      |
//! | `1`..`4`  | numbered agent start             |
//!
//! The last text line is row `y = 0`.
//!
//! Random layouts come from [`maze`]: `"RANDOM"` samples a seed,
//! `"RANDOM<N>"` uses seed `N`.

pub mod maze;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{Coord, GameRng, Grid, Position};
use crate::error::LayoutError;

pub use maze::{generate_maze, generate_maze_with, random_maze, MazeConfig, MAX_DIFFERENT_MAZES};

/// Initial placement of one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentStart {
    /// True only for the `P` start.
    pub is_pacman: bool,
    pub cell: Coord,
}

/// Parsed board: walls, food, capsules and agent starts.
#[derive(Clone, Debug)]
pub struct Layout {
    width: usize,
    height: usize,
    walls: Grid,
    food: Grid,
    capsules: Vec<Coord>,
    agent_starts: Vec<AgentStart>,
    num_ghosts: usize,
    total_food: usize,
    text: Vec<String>,
}

impl Layout {
    /// Parse layout text.
    ///
    /// Lines are trimmed and blank lines dropped. Every remaining line
    /// must have the same length. Characters outside the alphabet are
    /// treated as open floor.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let width = lines.first().ok_or(LayoutError::Empty)?.chars().count();
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        let height = lines.len();
        let mut walls = Grid::new(width, height);
        let mut food = Grid::new(width, height);
        let mut capsules = Vec::new();
        // (ordering label, cell); P sorts first, digits by value, G last.
        let mut labelled: Vec<(u8, Coord)> = Vec::new();

        for y in 0..height {
            let line = &lines[height - 1 - y];
            for (x, ch) in line.chars().enumerate() {
                let cell = Coord::new(x, y);
                match ch {
                    '%' => walls.set(x, y, true),
                    '.' => food.set(x, y, true),
                    'o' => capsules.push(cell),
                    'P' => labelled.push((0, cell)),
                    'G' => labelled.push((5, cell)),
                    '1'..='4' => labelled.push((ch as u8 - b'0', cell)),
                    _ => {}
                }
            }
        }

        // Stable: equal labels keep scan order.
        labelled.sort_by_key(|&(label, _)| label);
        let agent_starts: Vec<AgentStart> = labelled
            .into_iter()
            .map(|(label, cell)| AgentStart {
                is_pacman: label == 0,
                cell,
            })
            .collect();
        let num_ghosts = agent_starts.iter().filter(|a| !a.is_pacman).count();
        let total_food = food.count(true);

        debug!(width, height, num_ghosts, total_food, "parsed layout");

        Ok(Self {
            width,
            height,
            walls,
            food,
            capsules,
            agent_starts,
            num_ghosts,
            total_food,
            text: lines,
        })
    }

    /// Load a named layout from disk, searching from the working directory.
    ///
    /// See [`Layout::load_from`].
    pub fn load(name: &str) -> Result<Self, LayoutError> {
        Self::load_from(Path::new("."), name)
    }

    /// Load a named layout, searching `root` and up to two parent directories.
    ///
    /// In each directory the candidates are `layouts/<name>.lay` then
    /// `<name>.lay`; a name already ending in `.lay` is used as given.
    pub fn load_from(root: &Path, name: &str) -> Result<Self, LayoutError> {
        let file_name = if name.ends_with(".lay") {
            name.to_string()
        } else {
            format!("{name}.lay")
        };

        let mut dir = root.to_path_buf();
        for _ in 0..3 {
            let candidates: [PathBuf; 2] = [dir.join("layouts").join(&file_name), dir.join(&file_name)];
            for path in candidates {
                if path.is_file() {
                    let text = std::fs::read_to_string(&path)
                        .map_err(|source| LayoutError::Io { path: path.clone(), source })?;
                    debug!(path = %path.display(), "loading layout");
                    return Self::parse(&text);
                }
            }
            dir = dir.join("..");
        }

        Err(LayoutError::NotFound(name.to_string()))
    }

    /// Resolve a layout name, handling the `RANDOM` convention.
    ///
    /// - `"RANDOM"` or `"RANDOM0"`: maze from a seed drawn from `rng` in `[1, 10000]`
    /// - `"RANDOM<N>"`: maze from seed `N`, which must be at most 10000
    /// - anything else: [`Layout::load`]
    pub fn resolve(name: &str, rng: &mut GameRng) -> Result<Self, LayoutError> {
        let Some(digits) = name.strip_prefix("RANDOM") else {
            return Self::load(name);
        };
        let seed = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u64>()
                .ok()
                .filter(|&seed| seed <= MAX_DIFFERENT_MAZES)
                .ok_or_else(|| LayoutError::InvalidSeed(name.to_string()))?
        };

        if seed == 0 {
            let (seed, text) = random_maze(rng);
            debug!(seed, "generated random layout");
            return Self::parse(&text);
        }
        Self::parse(&generate_maze(seed))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn walls(&self) -> &Grid {
        &self.walls
    }

    /// Food present at game start.
    #[must_use]
    pub fn food(&self) -> &Grid {
        &self.food
    }

    #[must_use]
    pub fn capsules(&self) -> &[Coord] {
        &self.capsules
    }

    #[must_use]
    pub fn num_ghosts(&self) -> usize {
        self.num_ghosts
    }

    #[must_use]
    pub fn total_food(&self) -> usize {
        self.total_food
    }

    /// Every agent start, in agent-index order.
    #[must_use]
    pub fn all_agent_starts(&self) -> &[AgentStart] {
        &self.agent_starts
    }

    /// Agent starts with at most `max_ghosts` non-pacman agents.
    ///
    /// Extra ghosts are dropped; the earliest ones in index order are kept.
    #[must_use]
    pub fn agent_starts(&self, max_ghosts: usize) -> Vec<AgentStart> {
        let mut ghosts = 0;
        self.agent_starts
            .iter()
            .filter(|start| {
                if start.is_pacman {
                    return true;
                }
                ghosts += 1;
                ghosts <= max_ghosts
            })
            .copied()
            .collect()
    }

    /// True for wall cells. Cells outside the board count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: Coord) -> bool {
        self.walls.try_get(cell).unwrap_or(true)
    }

    /// Uniformly sampled non-wall cell, `None` if the board is all wall.
    pub fn random_legal_position(&self, rng: &mut GameRng) -> Option<Coord> {
        if self.walls.count(false) == 0 {
            return None;
        }
        loop {
            let cell = Coord::new(
                rng.gen_range_usize(0..self.width),
                rng.gen_range_usize(0..self.height),
            );
            if !self.is_wall(cell) {
                return Some(cell);
            }
        }
    }

    /// The four interior corners.
    #[must_use]
    pub fn corners(&self) -> [Coord; 4] {
        let right = self.width.saturating_sub(2);
        let top = self.height.saturating_sub(2);
        [
            Coord::new(1, 1),
            Coord::new(1, top),
            Coord::new(right, 1),
            Coord::new(right, top),
        ]
    }

    pub fn random_corner(&self, rng: &mut GameRng) -> Coord {
        let corners = self.corners();
        corners[rng.gen_range_usize(0..corners.len())]
    }

    /// Interior corner closest to `position` (Manhattan).
    #[must_use]
    pub fn nearest_corner(&self, position: Position) -> Coord {
        let cell = position.nearest_cell();
        self.corners()
            .into_iter()
            .min_by_key(|&corner| (corner.manhattan(cell), corner))
            .unwrap_or(cell)
    }

    /// Interior corner furthest from `position` (Manhattan).
    #[must_use]
    pub fn furthest_corner(&self, position: Position) -> Coord {
        let cell = position.nearest_cell();
        self.corners()
            .into_iter()
            .max_by_key(|&corner| (corner.manhattan(cell), corner))
            .unwrap_or(cell)
    }

    /// Source text, top line first.
    #[must_use]
    pub fn text(&self) -> &[String] {
        &self.text
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        // Everything else is derived from the text.
        self.text == other.text
    }
}

impl Eq for Layout {}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text.join("\n"))
    }
}
