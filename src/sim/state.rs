//! Game state and core grid types
//!
//! Everything the saved-game snapshot needs lives in `GameState`.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;

/// One grid cell in pixel space (always a multiple of the unit size)
pub type Position = IVec2;

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Velocity for this heading (screen coordinates, y grows downward)
    pub fn velocity(self, unit: i32) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -unit),
            Direction::Down => IVec2::new(0, unit),
            Direction::Left => IVec2::new(-unit, 0),
            Direction::Right => IVec2::new(unit, 0),
        }
    }

    /// Heading of a velocity, if it is a valid one-cell step
    pub fn from_velocity(velocity: IVec2, unit: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.velocity(unit) == velocity)
    }
}

/// The drawing area, in pixels, divided into square cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub unit: i32,
}

impl Board {
    /// Board of `width` x `height` pixels, snapped down to whole cells (at least one)
    pub fn new(width: i32, height: i32, unit: i32) -> Self {
        let unit = unit.max(1);
        let snap = |px: i32| (px / unit).max(1) * unit;
        Self {
            width: snap(width),
            height: snap(height),
            unit,
        }
    }

    /// Square board of `cells` per side
    pub fn square(cells: u32, unit: i32) -> Self {
        let side = cells as i32 * unit.max(1);
        Self::new(side, side, unit)
    }

    /// Square board fitted into a container `container_px` wide
    pub fn fit(container_px: i32, unit: i32) -> Self {
        Self::new(container_px, container_px, unit)
    }

    pub fn cols(&self) -> i32 {
        self.width / self.unit
    }

    pub fn rows(&self) -> i32 {
        self.height / self.unit
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Whether `pos` sits on the cell grid
    pub fn is_aligned(&self, pos: Position) -> bool {
        pos.x % self.unit == 0 && pos.y % self.unit == 0
    }

    /// Uniformly random cell on the board
    pub fn random_cell(&self, rng: &mut Pcg32) -> Position {
        let col = rng.random_range(0..self.cols());
        let row = rng.random_range(0..self.rows());
        Position::new(col * self.unit, row * self.unit)
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Created, scheduler not started yet
    Fresh,
    /// Ticking
    Running,
    /// Stopped by the player, no ticks pending
    Paused,
    /// "Level completed" pause; no ticks until the transition timer fires
    LevelTransition,
    /// Run ended; terminal until reset
    GameOver,
}

impl GamePhase {
    /// Value of the persisted `running` flag
    pub fn is_running(self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::LevelTransition)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Snake cells, head first
    pub snake: VecDeque<Position>,
    pub food: Position,
    /// One-cell step applied each tick
    pub velocity: IVec2,
    pub score: u32,
    /// 1-based
    pub level: u32,
    /// Tick interval in ms
    pub speed_ms: u32,
    pub phase: GamePhase,
    /// Food placement RNG
    pub rng: Pcg32,
}

impl GameState {
    /// Fresh game: one cell at the origin heading right
    pub fn new(board: &Board, settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut state = Self {
            snake: VecDeque::from([Position::ZERO]),
            food: Position::ZERO,
            velocity: Direction::Right.velocity(board.unit),
            score: 0,
            level: 1,
            speed_ms: settings.initial_speed_ms,
            phase: GamePhase::Fresh,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.respawn_food(board);
        state
    }

    pub fn head(&self) -> Position {
        // Snake is never empty
        self.snake[0]
    }

    /// Current heading, derived from the velocity
    pub fn heading(&self, unit: i32) -> Option<Direction> {
        Direction::from_velocity(self.velocity, unit)
    }

    /// Place food on a random cell. Cells under the snake are not excluded.
    pub fn respawn_food(&mut self, board: &Board) {
        self.food = board.random_cell(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.velocity(25) + d.opposite().velocity(25), IVec2::ZERO);
        }
    }

    #[test]
    fn test_from_velocity_rejects_invalid_steps() {
        assert_eq!(
            Direction::from_velocity(IVec2::new(25, 0), 25),
            Some(Direction::Right)
        );
        assert_eq!(Direction::from_velocity(IVec2::new(25, 25), 25), None);
        assert_eq!(Direction::from_velocity(IVec2::new(10, 0), 25), None);
        assert_eq!(Direction::from_velocity(IVec2::ZERO, 25), None);
    }

    #[test]
    fn test_board_snaps_to_cells() {
        let board = Board::fit(510, 25);
        assert_eq!(board.width, 500);
        assert_eq!(board.height, 500);
        assert_eq!(board.cols(), 20);

        let tiny = Board::new(3, 3, 25);
        assert_eq!(tiny.width, 25);
    }

    #[test]
    fn test_board_contains_edges() {
        let board = Board::square(4, 25);
        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(75, 75)));
        assert!(!board.contains(Position::new(100, 0)));
        assert!(!board.contains(Position::new(0, -25)));
    }

    #[test]
    fn test_fresh_state() {
        let board = Board::square(20, 25);
        let state = GameState::new(&board, &Settings::seeded(1));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.head(), Position::ZERO);
        assert_eq!(state.velocity, IVec2::new(25, 0));
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed_ms, 200);
        assert_eq!(state.phase, GamePhase::Fresh);
        assert!(board.contains(state.food));
        assert!(board.is_aligned(state.food));
    }

    #[test]
    fn test_food_is_deterministic_per_seed() {
        let board = Board::square(20, 25);
        let a = GameState::new(&board, &Settings::seeded(42));
        let b = GameState::new(&board, &Settings::seeded(42));
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_random_cell_stays_on_grid() {
        let board = Board::new(125, 75, 25);
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..500 {
            let cell = board.random_cell(&mut rng);
            assert!(board.contains(cell));
            assert!(board.is_aligned(cell));
        }
    }
}
