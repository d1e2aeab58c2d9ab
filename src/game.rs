//! Game session
//!
//! Owns the state, the scheduler and the store, and is the only place that
//! changes phase in response to timers and commands. Hosts call `handle` for
//! input, `update` from their frame/sleep loop and `render` to draw.

use crate::highscores::HighScores;
use crate::input::{Command, adjust_speed, change_direction};
use crate::persistence::{KeyValueStore, SaveSlot};
use crate::platform::clock::unix_time_ms;
use crate::renderer::{Renderer, draw_frame};
use crate::scheduler::{Scheduler, Wake};
use crate::settings::Settings;
use crate::sim::{Board, GamePhase, GameState, TickOutcome, finish_level_transition, tick};

/// Things hosts may want to react to (HUD text, sounds, logging)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started { restored: bool },
    FoodEaten { score: u32 },
    LevelCompleted { level: u32 },
    LevelStarted { level: u32 },
    Paused,
    Resumed,
    Reset,
    SpeedChanged { speed_ms: u32 },
    /// Emitted once per game; `rank` is the high score position, if any
    GameOver {
        score: u32,
        level: u32,
        rank: Option<usize>,
    },
}

pub struct Game<S: KeyValueStore> {
    settings: Settings,
    board: Board,
    state: GameState,
    scheduler: Scheduler,
    store: S,
    high_scores: HighScores,
    restored: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// Restore the saved game from `store`, or set up a fresh one
    pub fn new(settings: Settings, board: Board, mut store: S) -> Self {
        let restored = SaveSlot::new(&mut store).load(&board, &settings);
        let high_scores = HighScores::load(&store);
        let is_restored = restored.is_some();
        let state = restored.unwrap_or_else(|| GameState::new(&board, &settings));

        Self {
            settings,
            board,
            state,
            scheduler: Scheduler::new(),
            store,
            high_scores,
            restored: is_restored,
        }
    }

    /// Start ticking. A game restored in `Paused` waits for `Resume`.
    pub fn start(&mut self, now_ms: u64) -> Vec<GameEvent> {
        match self.state.phase {
            GamePhase::Fresh | GamePhase::Running | GamePhase::LevelTransition => {
                self.state.phase = GamePhase::Running;
                self.scheduler.schedule_tick(now_ms, self.state.speed_ms);
            }
            GamePhase::Paused | GamePhase::GameOver => {}
        }

        log::info!(
            "Game started ({}, score {}, level {}, {:?})",
            if self.restored { "restored" } else { "fresh" },
            self.state.score,
            self.state.level,
            self.state.phase
        );
        vec![GameEvent::Started {
            restored: self.restored,
        }]
    }

    /// Apply a player command
    pub fn handle(&mut self, command: Command, now_ms: u64) -> Vec<GameEvent> {
        match command {
            Command::Turn(dir) => {
                if self.state.phase != GamePhase::GameOver {
                    change_direction(&mut self.state, dir, self.board.unit);
                }
                Vec::new()
            }
            Command::Reset => self.reset(now_ms),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(now_ms),
            Command::TogglePause => match self.state.phase {
                GamePhase::Paused => self.resume(now_ms),
                _ => self.pause(),
            },
            Command::SpeedUp => self.adjust_speed(-(self.settings.speed_step_ms as i64)),
            Command::SpeedDown => self.adjust_speed(self.settings.speed_step_ms as i64),
        }
    }

    /// Fire the pending timer if due
    pub fn update(&mut self, now_ms: u64) -> Vec<GameEvent> {
        match self.scheduler.poll(now_ms) {
            Some(Wake::Tick) => self.step(now_ms),
            Some(Wake::LevelTransitionEnd) => {
                if !finish_level_transition(&mut self.state, &self.board) {
                    return Vec::new();
                }
                self.save();
                self.scheduler.schedule_tick(now_ms, self.state.speed_ms);
                vec![GameEvent::LevelStarted {
                    level: self.state.level,
                }]
            }
            None => Vec::new(),
        }
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        draw_frame(renderer, &self.state, &self.board)
    }

    /// Use a new board size. Only meaningful between games; food left off the
    /// board is moved back on.
    pub fn resize(&mut self, board: Board) {
        self.board = board;
        if !board.contains(self.state.food) {
            self.state.respawn_food(&self.board);
        }
        log::info!("Board resized to {} x {}", board.width, board.height);
    }

    /// Milliseconds until the next timer, if one is pending
    pub fn time_until_wake(&self, now_ms: u64) -> Option<u64> {
        self.scheduler.time_until(now_ms)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn step(&mut self, now_ms: u64) -> Vec<GameEvent> {
        match tick(&mut self.state, &self.board, &self.settings) {
            TickOutcome::Skipped => Vec::new(),
            TickOutcome::Moved => {
                self.save();
                self.scheduler.schedule_tick(now_ms, self.state.speed_ms);
                Vec::new()
            }
            TickOutcome::Ate { score } => {
                self.save();
                self.scheduler.schedule_tick(now_ms, self.state.speed_ms);
                vec![GameEvent::FoodEaten { score }]
            }
            TickOutcome::LevelComplete { level } => {
                self.save();
                self.scheduler
                    .schedule_transition_end(now_ms, self.settings.level_pause_ms);
                vec![
                    GameEvent::FoodEaten {
                        score: self.state.score,
                    },
                    GameEvent::LevelCompleted { level: level - 1 },
                ]
            }
            TickOutcome::GameOver => vec![self.game_over()],
        }
    }

    fn game_over(&mut self) -> GameEvent {
        self.scheduler.cancel();
        SaveSlot::new(&mut self.store).clear();

        let (score, level) = (self.state.score, self.state.level);
        let rank = self.high_scores.add_score(score, level, unix_time_ms());
        if rank.is_some() {
            self.high_scores.save(&mut self.store);
        }

        log::info!("Game over (score {score}, level {level})");
        GameEvent::GameOver { score, level, rank }
    }

    fn reset(&mut self, now_ms: u64) -> Vec<GameEvent> {
        self.scheduler.cancel();
        self.state = GameState::new(&self.board, &self.settings);
        self.restored = false;
        self.state.phase = GamePhase::Running;
        self.scheduler.schedule_tick(now_ms, self.state.speed_ms);
        self.save();
        log::info!("Game reset");
        vec![GameEvent::Reset]
    }

    fn pause(&mut self) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Running {
            return Vec::new();
        }

        self.scheduler.cancel();
        self.state.phase = GamePhase::Paused;
        self.save();
        log::info!("Paused");
        vec![GameEvent::Paused]
    }

    fn resume(&mut self, now_ms: u64) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Paused {
            return Vec::new();
        }

        // Full fresh interval; time elapsed before the pause is not credited
        self.state.phase = GamePhase::Running;
        self.scheduler.schedule_tick(now_ms, self.state.speed_ms);
        log::info!("Resumed");
        vec![GameEvent::Resumed]
    }

    fn adjust_speed(&mut self, delta_ms: i64) -> Vec<GameEvent> {
        if self.state.phase == GamePhase::GameOver {
            return Vec::new();
        }

        let speed_ms = adjust_speed(&mut self.state, delta_ms, &self.settings);
        self.save();
        log::info!("Tick interval set to {speed_ms} ms");
        vec![GameEvent::SpeedChanged { speed_ms }]
    }

    fn save(&mut self) {
        SaveSlot::new(&mut self.store).save(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SAVE_KEY;
    use crate::platform::MemoryStore;
    use crate::sim::{Direction, Position};

    fn new_game() -> Game<MemoryStore> {
        let settings = Settings::seeded(12345);
        let board = Board::square(20, settings.unit_size);
        let mut game = Game::new(settings, board, MemoryStore::new());
        // Park the food out of the snake's path
        game.state.food = Position::new(475, 475);
        game
    }

    #[test]
    fn test_fresh_start() {
        let mut game = new_game();
        assert_eq!(game.phase(), GamePhase::Fresh);
        assert_eq!(game.start(0), vec![GameEvent::Started { restored: false }]);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.time_until_wake(0), Some(200));
    }

    #[test]
    fn test_tick_waits_for_interval_and_saves() {
        let mut game = new_game();
        game.start(0);
        game.update(199);
        assert_eq!(game.state().head(), Position::ZERO);
        game.update(200);
        assert_eq!(game.state().head(), Position::new(25, 0));
        assert!(game.store().get(SAVE_KEY).unwrap().is_some());
        // Next tick scheduled from the tick that just ran
        assert_eq!(game.time_until_wake(200), Some(200));
    }

    #[test]
    fn test_pause_cancels_pending_tick() {
        let mut game = new_game();
        game.start(0);
        assert_eq!(game.handle(Command::Pause, 100), vec![GameEvent::Paused]);
        assert_eq!(game.time_until_wake(100), None);
        game.update(10_000);
        assert_eq!(game.state().head(), Position::ZERO);

        let saved = game.store().get(SAVE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"running\":false"));
    }

    #[test]
    fn test_resume_grants_full_interval() {
        let mut game = new_game();
        game.start(0);
        game.handle(Command::Pause, 150);
        assert_eq!(game.handle(Command::Resume, 1000), vec![GameEvent::Resumed]);
        assert_eq!(game.time_until_wake(1000), Some(200));
        game.update(1199);
        assert_eq!(game.state().head(), Position::ZERO);
        game.update(1200);
        assert_eq!(game.state().head(), Position::new(25, 0));
    }

    #[test]
    fn test_toggle_pause() {
        let mut game = new_game();
        game.start(0);
        assert_eq!(game.handle(Command::TogglePause, 10), vec![GameEvent::Paused]);
        assert_eq!(game.handle(Command::TogglePause, 20), vec![GameEvent::Resumed]);
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_resume_only_from_pause() {
        let mut game = new_game();
        game.start(0);
        assert!(game.handle(Command::Resume, 50).is_empty());
        // The original tick is still the one pending
        assert_eq!(game.time_until_wake(50), Some(150));
    }

    #[test]
    fn test_speed_change_applies_to_next_schedule() {
        let mut game = new_game();
        game.start(0);
        assert_eq!(
            game.handle(Command::SpeedUp, 10),
            vec![GameEvent::SpeedChanged { speed_ms: 175 }]
        );
        // In-flight tick keeps its deadline
        assert_eq!(game.time_until_wake(10), Some(190));
        game.update(200);
        assert_eq!(game.time_until_wake(200), Some(175));
    }

    #[test]
    fn test_reverse_turn_ignored() {
        let mut game = new_game();
        game.start(0);
        game.handle(Command::Turn(Direction::Left), 10);
        assert_eq!(game.state().velocity, Direction::Right.velocity(25));
        game.handle(Command::Turn(Direction::Down), 10);
        assert_eq!(game.state().velocity, Direction::Down.velocity(25));
    }

    #[test]
    fn test_level_transition_pauses_ticks() {
        let mut game = new_game();
        game.start(0);
        game.state.score = 4;
        game.state.food = Position::new(25, 0);

        let events = game.update(200);
        assert_eq!(
            events,
            vec![
                GameEvent::FoodEaten { score: 5 },
                GameEvent::LevelCompleted { level: 1 }
            ]
        );
        assert_eq!(game.phase(), GamePhase::LevelTransition);
        assert_eq!(game.state().level, 2);
        assert_eq!(game.state().speed_ms, 190);
        assert_eq!(game.state().snake.len(), 2);

        // Pause is ignored during the transition
        assert!(game.handle(Command::Pause, 300).is_empty());

        assert!(game.update(2199).is_empty());
        assert_eq!(game.state().head(), Position::new(25, 0));

        assert_eq!(game.update(2200), vec![GameEvent::LevelStarted { level: 2 }]);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.time_until_wake(2200), Some(190));
    }

    #[test]
    fn test_game_over_clears_save_once() {
        let mut game = new_game();
        game.start(0);
        game.state.score = 3;
        game.state.velocity = Direction::Up.velocity(25);
        game.save();
        assert!(game.store().get(SAVE_KEY).unwrap().is_some());

        let events = game.update(200);
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                score: 3,
                level: 1,
                rank: Some(1)
            }]
        );
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.store().get(SAVE_KEY).unwrap(), None);
        assert_eq!(game.high_scores().top_score(), Some(3));

        // Terminal: no timers, commands other than reset ignored
        assert_eq!(game.time_until_wake(200), None);
        assert!(game.update(100_000).is_empty());
        assert!(game.handle(Command::Resume, 300).is_empty());
        assert!(game.handle(Command::SpeedUp, 300).is_empty());
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_fifth_food_on_body_ends_game() {
        let mut game = new_game();
        game.start(0);
        game.state.score = 4;
        game.state.snake = [
            Position::new(25, 25),
            Position::new(50, 25),
            Position::new(50, 0),
            Position::new(25, 0),
            Position::new(0, 0),
        ]
        .into_iter()
        .collect();
        game.state.velocity = Direction::Up.velocity(25);
        game.state.food = Position::new(25, 0);
        game.save();

        let events = game.update(200);
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                score: 5,
                level: 2,
                rank: Some(1)
            }]
        );
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.store().get(SAVE_KEY).unwrap(), None);
        assert_eq!(game.time_until_wake(200), None);
        assert!(game.update(2200).is_empty());
    }

    #[test]
    fn test_edited_save_off_board_starts_fresh() {
        let mut store = MemoryStore::new();
        store
            .set(
                SAVE_KEY,
                r#"{"snake":[{"x":2147483625,"y":0}],"foodX":100,"foodY":0,"xVelocity":25,
                "yVelocity":0,"score":0,"level":1,"speed":200,"running":true}"#,
            )
            .unwrap();
        let settings = Settings::seeded(5);
        let board = Board::square(20, settings.unit_size);
        let mut game = Game::new(settings, board, store);
        assert_eq!(game.phase(), GamePhase::Fresh);
        assert_eq!(game.start(0), vec![GameEvent::Started { restored: false }]);
        game.update(200);
        assert!(game.board().contains(game.state().head()));
    }

    #[test]
    fn test_reset_restarts_fresh() {
        let mut game = new_game();
        game.start(0);
        game.state.score = 7;
        game.state.level = 2;
        game.state.speed_ms = 120;
        game.state.phase = GamePhase::GameOver;
        game.scheduler.cancel();

        assert_eq!(game.handle(Command::Reset, 500), vec![GameEvent::Reset]);
        let state = game.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.speed_ms, 200);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.head(), Position::ZERO);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.time_until_wake(500), Some(200));
    }

    #[test]
    fn test_reset_during_transition_drops_transition_timer() {
        let mut game = new_game();
        game.start(0);
        game.state.score = 4;
        game.state.food = Position::new(25, 0);
        game.update(200);
        assert_eq!(game.phase(), GamePhase::LevelTransition);

        game.handle(Command::Reset, 300);
        game.state.food = Position::new(475, 475);
        assert_eq!(game.time_until_wake(300), Some(200));
        assert!(game.update(2200).is_empty());
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().level, 1);
        assert_eq!(game.state().head(), Position::new(25, 0));
    }

    #[test]
    fn test_restores_saved_game() {
        let mut game = new_game();
        game.start(0);
        game.update(200);
        game.update(400);
        game.handle(Command::Pause, 450);

        let store = game.store().clone();
        let settings = game.settings().clone();
        let board = *game.board();
        let mut restored = Game::new(settings, board, store);
        assert_eq!(restored.phase(), GamePhase::Paused);
        assert_eq!(restored.state().head(), Position::new(50, 0));

        assert_eq!(restored.start(0), vec![GameEvent::Started { restored: true }]);
        assert_eq!(restored.time_until_wake(0), None);
        restored.handle(Command::Resume, 0);
        restored.update(200);
        assert_eq!(restored.state().head(), Position::new(75, 0));
    }

    #[test]
    fn test_missing_save_starts_fresh() {
        let settings = Settings::seeded(1);
        let board = Board::square(20, 25);
        let game = Game::new(settings, board, MemoryStore::new());
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().level, 1);
        assert_eq!(game.state().snake.len(), 1);
    }
}
