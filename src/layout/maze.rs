//! Random capture-board generator.
//!
//! Builds a square half board by recursive space partition, mirrors it into
//! a 180° symmetric full board, then scatters food, capsules and the four
//! agent starts. The output is layout text accepted by
//! [`Layout::parse`](super::Layout::parse).
//!
//! ## Stages
//!
//! 1. Prison: zero to three full-height bars on the left edge, each with one
//!    gap alternating between the top and bottom row.
//! 2. Partition: alternate vertical and horizontal walls with `gaps`
//!    openings, shrinking `gaps` by a per-maze `gapfactor` at every level.
//! 3. Mirror and border.
//! 4. Content: dead-end food, starts, capsules, extra food.
//!
//! Generation is a pure function of the seed and the [`MazeConfig`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::GameRng;

/// Seeds sampled for `RANDOM` layouts fall in `[1, MAX_DIFFERENT_MAZES]`.
pub const MAX_DIFFERENT_MAZES: u64 = 10_000;

const WALL: u8 = b'%';
const FOOD: u8 = b'.';
const CAPSULE: u8 = b'o';
const EMPTY: u8 = b' ';

/// Rejection sampling gives up after this many draws per placement phase.
const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;

/// Maze generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Rows and columns of the half board before mirroring.
    pub size: usize,

    /// Openings in the first partition wall.
    pub initial_gaps: f64,

    /// Rooms no larger than this in both dimensions are not divided.
    pub min_width: usize,

    /// Capsules placed in total (in mirrored pairs).
    pub max_capsules: usize,

    /// Upper bound on dead-end food passes.
    pub dead_end_passes: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: 16,
            initial_gaps: 3.0,
            min_width: 1,
            max_capsules: 4,
            dead_end_passes: 2,
        }
    }
}

impl MazeConfig {
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_initial_gaps(mut self, gaps: f64) -> Self {
        self.initial_gaps = gaps;
        self
    }

    #[must_use]
    pub fn with_max_capsules(mut self, capsules: usize) -> Self {
        self.max_capsules = capsules;
        self
    }

    #[must_use]
    pub fn with_dead_end_passes(mut self, passes: usize) -> Self {
        self.dead_end_passes = passes;
        self
    }
}

/// Generate the default maze for `seed`.
#[must_use]
pub fn generate_maze(seed: u64) -> String {
    generate_maze_with(seed, &MazeConfig::default())
}

/// Generate a maze from a seed sampled out of `rng`.
///
/// Returns the seed so the board can be reproduced as `RANDOM<seed>`.
pub fn random_maze(rng: &mut GameRng) -> (u64, String) {
    let seed = rng.gen_inclusive(1, MAX_DIFFERENT_MAZES);
    (seed, generate_maze(seed))
}

/// Generate a maze for `seed` with explicit parameters.
#[must_use]
pub fn generate_maze_with(seed: u64, config: &MazeConfig) -> String {
    let mut rng = GameRng::new(seed);
    let mut maze = Maze::new(config.size, config.size);
    let gapfactor = rng.gauss(0.5, 0.1).min(0.65);

    let mut partition = Partition {
        maze: &mut maze,
        min_width: config.min_width,
        gapfactor,
    };
    let skip = partition.make_with_prison(&mut rng, config.initial_gaps);

    maze.mirror();
    let max_food = 2 * (maze.rows * maze.cols / 20);
    maze.add_contents(&mut rng, config, max_food, skip);

    trace!(seed, gapfactor, skip, "generated maze");
    maze.render()
}

/// Character grid indexed `[row][col]`, row 0 at the top.
struct Maze {
    rows: usize,
    cols: usize,
    grid: Vec<Vec<u8>>,
}

/// Sub-rectangle of the half board still to be divided.
#[derive(Clone, Copy, Debug)]
struct Room {
    rows: usize,
    cols: usize,
    /// Top-left `(row, col)` in the board.
    anchor: (usize, usize),
}

impl Maze {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            grid: vec![vec![EMPTY; cols]; rows],
        }
    }

    /// Point-reflect the half board onto its right side and add a wall border.
    fn mirror(&mut self) {
        let half = self.grid.clone();
        for (row, cells) in half.iter().enumerate() {
            self.grid[self.rows - 1 - row].extend(cells.iter().rev());
        }
        self.cols *= 2;

        for row in &mut self.grid {
            row.insert(0, WALL);
            row.push(WALL);
        }
        self.cols += 2;
        self.grid.insert(0, vec![WALL; self.cols]);
        self.grid.push(vec![WALL; self.cols]);
        self.rows += 2;
    }

    /// Cells in the bottom-left start pocket.
    fn in_start_box(&self, row: usize, col: usize) -> bool {
        row + 6 > self.rows && col < 6
    }

    fn set_mirrored(&mut self, row: usize, col: usize, value: u8) {
        let (rows, cols) = (self.rows, self.cols);
        self.grid[row][col] = value;
        self.grid[rows - row - 1][cols - col - 1] = value;
    }

    fn open_neighbours(&self, row: usize, col: usize) -> usize {
        [
            self.grid[row - 1][col],
            self.grid[row][col - 1],
            self.grid[row + 1][col],
            self.grid[row][col + 1],
        ]
        .iter()
        .filter(|&&c| c == EMPTY)
        .count()
    }

    /// Mark dead ends as food, one pass at a time; returns food placed.
    fn fill_dead_ends(&mut self, passes: usize, skip: usize) -> usize {
        let mut total = 0;
        for _ in 0..passes {
            let mut placed = 0;
            for row in 1..self.rows - 1 {
                for col in (1 + skip)..(self.cols / 2).saturating_sub(1) {
                    if self.in_start_box(row, col) || self.grid[row][col] != EMPTY {
                        continue;
                    }
                    if self.open_neighbours(row, col) == 1 {
                        self.set_mirrored(row, col, FOOD);
                        placed += 2;
                    }
                }
            }
            total += placed;
            if placed == 0 {
                break;
            }
        }
        total
    }

    /// Scatter `item` in mirrored pairs until `count` reaches `target`.
    fn scatter(
        &mut self,
        rng: &mut GameRng,
        item: u8,
        mut count: usize,
        target: usize,
        skip: usize,
        max_col: usize,
    ) -> usize {
        let min_col = 1 + skip;
        if min_col > max_col || self.rows < 2 {
            return count;
        }
        let centre = self.cols / 2;
        let mut attempts = 0;
        while count < target && attempts < MAX_PLACEMENT_ATTEMPTS {
            attempts += 1;
            let row = rng.gen_inclusive(1, self.rows as u64 - 1) as usize;
            let col = rng.gen_inclusive(min_col as u64, max_col as u64) as usize;
            if self.in_start_box(row, col) || col.abs_diff(centre) < 3 {
                continue;
            }
            if self.grid[row][col] == EMPTY {
                self.set_mirrored(row, col, item);
                count += 2;
            }
        }
        count
    }

    fn add_contents(&mut self, rng: &mut GameRng, config: &MazeConfig, max_food: usize, skip: usize) {
        let food = self.fill_dead_ends(config.dead_end_passes, skip);

        let (rows, cols) = (self.rows, self.cols);
        if rows < 4 || cols < 3 {
            return;
        }
        self.grid[rows - 2][1] = b'3';
        self.grid[rows - 3][1] = b'1';
        self.grid[1][cols - 2] = b'4';
        self.grid[2][cols - 2] = b'2';

        let half = cols / 2;
        self.scatter(rng, CAPSULE, 0, config.max_capsules, skip, half.saturating_sub(2));
        self.scatter(rng, FOOD, food, max_food, skip, half.saturating_sub(1));
    }

    fn render(&self) -> String {
        self.grid
            .iter()
            .map(|row| String::from_utf8_lossy(row).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Recursive wall placement over a [`Maze`].
struct Partition<'a> {
    maze: &'a mut Maze,
    min_width: usize,
    gapfactor: f64,
}

impl Partition<'_> {
    /// Draw the prison bars, partition the rest; returns columns consumed.
    fn make_with_prison(&mut self, rng: &mut GameRng, gaps: f64) -> usize {
        let roll = rng.gen_f64();
        let layers = if roll < 0.5 {
            1
        } else if roll < 0.7 {
            0
        } else if roll < 0.9 {
            2
        } else {
            3
        };

        let rows = self.maze.rows;
        for j in 0..layers {
            let col = 2 * (j + 1) - 1;
            if col >= self.maze.cols {
                break;
            }
            for row in 0..rows {
                self.maze.grid[row][col] = WALL;
            }
            let gap_row = if j % 2 == 0 { 0 } else { rows - 1 };
            self.maze.grid[gap_row][col] = EMPTY;
        }

        let skip = 2 * layers;
        let room = Room {
            rows,
            cols: self.maze.cols.saturating_sub(skip),
            anchor: (0, skip),
        };
        self.make(rng, room, 0, gaps, true);
        skip
    }

    fn make(&mut self, rng: &mut GameRng, room: Room, depth: usize, gaps: f64, vert: bool) {
        if room.rows <= self.min_width && room.cols <= self.min_width {
            return;
        }

        let mut vert = vert;
        let mut num = if vert { room.cols } else { room.rows };
        if num < self.min_width + 2 {
            vert = !vert;
            num = if vert { room.cols } else { room.rows };
        }

        let wall = if depth == 0 {
            match num.checked_sub(2) {
                Some(slot) => slot,
                None => return,
            }
        } else {
            if num < 3 {
                return;
            }
            rng.gen_range_usize(1..num - 1)
        };

        let Some(sub_rooms) = self.add_wall(rng, room, wall, gaps, vert) else {
            return;
        };
        let next_gaps = (gaps * self.gapfactor).max(1.0);
        for sub_room in sub_rooms {
            self.make(rng, sub_room, depth + 1, next_gaps, !vert);
        }
    }

    /// Wall off line `i` of `room`, leaving `gaps` openings.
    ///
    /// Returns the two rooms on either side, or `None` when there are not
    /// enough slots left for the openings.
    fn add_wall(&mut self, rng: &mut GameRng, room: Room, i: usize, gaps: f64, vert: bool) -> Option<[Room; 2]> {
        let (add_r, add_c) = room.anchor;
        let (board_rows, board_cols) = (self.maze.rows, self.maze.cols);
        let grid = &mut self.maze.grid;

        let (length, start, limit) = if vert {
            (room.rows, add_r, board_rows)
        } else {
            (room.cols, add_c, board_cols)
        };
        // Neighbouring cell just past either end of the wall.
        let cell = |slot: usize| if vert { (slot, add_c + i) } else { (add_r + i, slot) };

        let gaps = gaps.min(length as f64);
        let mut slots: Vec<usize> = (start..start + length).collect();
        let (&first, &last) = (slots.first()?, slots.last()?);

        if first > 0 {
            let (r, c) = cell(first - 1);
            if grid[r][c] == EMPTY {
                slots.remove(0);
            }
            if slots.len() as f64 <= gaps {
                return None;
            }
        }
        if last + 1 < limit {
            let (r, c) = cell(last + 1);
            if grid[r][c] == EMPTY {
                slots.pop();
            }
        }
        if slots.len() as f64 <= gaps {
            return None;
        }

        rng.shuffle(&mut slots);
        for &slot in &slots[gaps.round() as usize..] {
            let (r, c) = cell(slot);
            grid[r][c] = WALL;
        }

        Some(if vert {
            [
                Room { rows: room.rows, cols: i, anchor: (add_r, add_c) },
                Room { rows: room.rows, cols: room.cols - i - 1, anchor: (add_r, add_c + i + 1) },
            ]
        } else {
            [
                Room { rows: i, cols: room.cols, anchor: (add_r, add_c) },
                Room { rows: room.rows - i - 1, cols: room.cols, anchor: (add_r + i + 1, add_c) },
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<u8>> {
        text.lines().map(|l| l.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_dimensions_and_border() {
        let grid = rows(&generate_maze(1));
        assert_eq!(grid.len(), 18);
        assert!(grid.iter().all(|r| r.len() == 34));
        assert!(grid[0].iter().all(|&c| c == WALL));
        assert!(grid[17].iter().all(|&c| c == WALL));
        assert!(grid.iter().all(|r| r[0] == WALL && r[33] == WALL));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_maze(42), generate_maze(42));
        assert_ne!(generate_maze(42), generate_maze(43));
    }

    #[test]
    fn test_starts_stamped() {
        let grid = rows(&generate_maze(7));
        assert_eq!(grid[16][1], b'3');
        assert_eq!(grid[15][1], b'1');
        assert_eq!(grid[1][32], b'4');
        assert_eq!(grid[2][32], b'2');
    }

    #[test]
    fn test_capsules_in_pairs() {
        for seed in 1..20 {
            let text = generate_maze(seed);
            let capsules = text.bytes().filter(|&c| c == CAPSULE).count();
            assert!(capsules <= 4, "seed {seed} has {capsules} capsules");
            assert_eq!(capsules % 2, 0);
        }
    }

    #[test]
    fn test_mirror_is_point_symmetric() {
        let mut maze = Maze::new(2, 2);
        maze.grid[0][0] = WALL;
        maze.grid[1][1] = FOOD;
        maze.mirror();

        assert_eq!(maze.rows, 4);
        assert_eq!(maze.cols, 6);
        for r in 0..maze.rows {
            for c in 0..maze.cols {
                assert_eq!(maze.grid[r][c], maze.grid[maze.rows - 1 - r][maze.cols - 1 - c]);
            }
        }
    }

    #[test]
    fn test_add_wall_aborts_without_slots() {
        let mut maze = Maze::new(3, 3);
        let mut rng = GameRng::new(0);
        let mut partition = Partition { maze: &mut maze, min_width: 1, gapfactor: 0.5 };
        let room = Room { rows: 3, cols: 3, anchor: (0, 0) };

        assert!(partition.add_wall(&mut rng, room, 1, 3.0, true).is_none());
        assert!(maze.grid.iter().flatten().all(|&c| c == EMPTY));
    }

    #[test]
    fn test_add_wall_leaves_gaps() {
        let mut maze = Maze::new(6, 6);
        let mut rng = GameRng::new(3);
        let mut partition = Partition { maze: &mut maze, min_width: 1, gapfactor: 0.5 };
        let room = Room { rows: 6, cols: 6, anchor: (0, 0) };

        let [left, right] = partition.add_wall(&mut rng, room, 2, 2.0, true).unwrap();
        assert_eq!((left.cols, right.cols), (2, 3));
        assert_eq!(right.anchor, (0, 3));

        let walls = maze.grid.iter().filter(|row| row[2] == WALL).count();
        assert_eq!(walls, 4);
    }

    #[test]
    fn test_add_wall_keeps_ends_open_next_to_open_cells() {
        let mut maze = Maze::new(5, 5);
        let mut rng = GameRng::new(9);
        let mut partition = Partition { maze: &mut maze, min_width: 1, gapfactor: 0.5 };
        let room = Room { rows: 3, cols: 3, anchor: (1, 1) };

        // Column 2, rows 1..=3. Rows 0 and 4 are open, so rows 1 and 3
        // stay open and only row 2 can be walled.
        let [left, right] = partition.add_wall(&mut rng, room, 1, 0.0, true).unwrap();
        assert_eq!(left.anchor, (1, 1));
        assert_eq!(right.anchor, (1, 3));
        let column: Vec<u8> = maze.grid.iter().map(|row| row[2]).collect();
        assert_eq!(column, vec![EMPTY, EMPTY, WALL, EMPTY, EMPTY]);

        // One gap needs more than the single slot left.
        let mut maze = Maze::new(5, 5);
        let mut partition = Partition { maze: &mut maze, min_width: 1, gapfactor: 0.5 };
        assert!(partition.add_wall(&mut rng, room, 1, 1.0, true).is_none());
    }

    #[test]
    fn test_add_wall_uses_end_slots_next_to_walls() {
        let mut maze = Maze::new(5, 5);
        maze.grid[0][2] = WALL;
        maze.grid[4][2] = WALL;
        let mut rng = GameRng::new(9);
        let mut partition = Partition { maze: &mut maze, min_width: 1, gapfactor: 0.5 };
        let room = Room { rows: 3, cols: 3, anchor: (1, 1) };

        assert!(partition.add_wall(&mut rng, room, 1, 0.0, true).is_some());
        assert!(maze.grid.iter().all(|row| row[2] == WALL));
    }

    /// Solid 8x12 board with the given cells opened.
    fn solid_with(open: &[(usize, usize)]) -> Maze {
        let mut maze = Maze { rows: 8, cols: 12, grid: vec![vec![WALL; 12]; 8] };
        for &(r, c) in open {
            maze.grid[r][c] = EMPTY;
        }
        maze
    }

    #[test]
    fn test_dead_end_gets_mirrored_food() {
        // (1, 2) has one open neighbour, (2, 2).
        let mut maze = solid_with(&[(1, 2), (2, 2)]);

        assert_eq!(maze.fill_dead_ends(1, 0), 2);
        assert_eq!(maze.grid[1][2], FOOD);
        assert_eq!(maze.grid[6][9], FOOD);
        // No longer a dead end once its neighbour is food.
        assert_eq!(maze.grid[2][2], EMPTY);
    }

    #[test]
    fn test_dead_ends_skip_start_box_and_prison() {
        // Start box: rows 3.. and columns below 6 on an 8-row board.
        let mut maze = solid_with(&[(5, 2), (5, 3)]);
        assert_eq!(maze.fill_dead_ends(2, 0), 0);
        assert_eq!(maze.grid[5][2], EMPTY);
        assert_eq!(maze.grid[5][3], EMPTY);

        // Prison columns 1..=2 are skipped.
        let mut maze = solid_with(&[(1, 2), (2, 2)]);
        assert_eq!(maze.fill_dead_ends(1, 2), 0);
        assert_eq!(maze.grid[1][2], EMPTY);
    }

    #[test]
    fn test_custom_size() {
        let config = MazeConfig::default().with_size(10).with_max_capsules(2);
        let grid = rows(&generate_maze_with(5, &config));
        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|r| r.len() == 22));
    }
}
