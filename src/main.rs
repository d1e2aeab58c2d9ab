//! Canvas Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use canvas_snake::persistence::KeyValueStore;
    use canvas_snake::platform::web::CanvasRenderer;
    use canvas_snake::platform::{Clock, LocalStorageStore, MemoryStore};
    use canvas_snake::sim::GamePhase;
    use canvas_snake::{Command, Game, GameEvent, Settings};

    type Store = Box<dyn KeyValueStore>;

    /// Game instance plus the page pieces it drives
    struct App {
        game: Game<Store>,
        renderer: CanvasRenderer,
        clock: Clock,
    }

    impl App {
        fn command(&mut self, command: Command) {
            let events = self.game.handle(command, self.clock.now_ms());
            self.apply(&events);
        }

        fn frame(&mut self) {
            let events = self.game.update(self.clock.now_ms());
            self.apply(&events);
            if let Err(e) = self.game.render(&mut self.renderer) {
                log::warn!("Render failed: {e:?}");
            }
            self.update_hud();
        }

        fn apply(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::Paused => show_pause_button(false),
                    GameEvent::Started { .. } | GameEvent::Resumed | GameEvent::Reset => {
                        show_pause_button(self.game.phase() != GamePhase::Paused)
                    }
                    GameEvent::GameOver { score, rank, .. } => {
                        if let Some(rank) = rank {
                            log::info!("Score {score} is high score #{rank}");
                        }
                    }
                    _ => {}
                }
            }
        }

        fn update_hud(&self) {
            let state = self.game.state();
            if let Some(el) = element("scoreText") {
                el.set_text_content(Some(&format!("Score: {}", state.score)));
            }
            if let Some(el) = element("levelText") {
                el.set_text_content(Some(&format!("Level: {}", state.level)));
            }
        }

        fn resize(&mut self) {
            let Some(container) = element("gameContainer") else {
                return;
            };
            let unit = self.game.settings().unit_size;
            let board = self
                .renderer
                .fit_to_container(container.client_width(), unit);
            self.game.resize(board);
        }
    }

    fn element(id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn show_pause_button(running: bool) {
        let (shown, hidden) = if running {
            ("pauseBtn", "resumeBtn")
        } else {
            ("resumeBtn", "pauseBtn")
        };
        if let Some(el) = element(shown) {
            let _ = el.style().set_property("display", "inline");
        }
        if let Some(el) = element(hidden) {
            let _ = el.style().set_property("display", "none");
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Canvas Snake starting...");

        let store: Store = match LocalStorageStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable, progress will not be kept");
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(&store);

        let canvas: HtmlCanvasElement = element("gameBoard")
            .ok_or_else(|| JsValue::from_str("no #gameBoard canvas"))?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(canvas)?;
        let container_width = element("gameContainer")
            .map(|el| el.client_width())
            .unwrap_or(settings.board_cells as i32 * settings.unit_size);
        let board = renderer.fit_to_container(container_width, settings.unit_size);

        let clock = Clock::new();
        let mut game = Game::new(settings, board, store);
        let events = game.start(clock.now_ms());

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            clock,
        }));
        app.borrow_mut().apply(&events);

        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_resize(app.clone());
        request_animation_frame(app);

        log::info!("Canvas Snake running!");
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let command = Command::from_key(&event.key())
                .or_else(|| Command::from_key_code(event.key_code()));
            if let Some(command) = command {
                if matches!(command, Command::Turn(_)) {
                    // Keep arrow keys from scrolling the page
                    event.prevent_default();
                }
                app.borrow_mut().command(command);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let buttons = [
            ("resetBtn", Command::Reset),
            ("increaseSpeedBtn", Command::SpeedUp),
            ("decreaseSpeedBtn", Command::SpeedDown),
            ("pauseBtn", Command::Pause),
            ("resumeBtn", Command::Resume),
        ];

        for (id, command) in buttons {
            let Some(btn) = element(id) else {
                log::warn!("Missing button #{id}");
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().command(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io;
    use std::time::Duration;

    use canvas_snake::consts::SETTINGS_KEY;
    use canvas_snake::persistence::KeyValueStore;
    use canvas_snake::platform::terminal::{TermInput, Terminal};
    use canvas_snake::platform::{Clock, FileStore};
    use canvas_snake::{Game, GameEvent, Settings};

    /// Data directory (saved game, settings, high scores)
    const DATA_DIR_ENV: &str = "SNAKE_DATA_DIR";
    const DEFAULT_DATA_DIR: &str = ".canvas-snake";
    /// Longest the loop sleeps waiting for input
    const MAX_WAIT_MS: u64 = 50;

    pub fn run() -> io::Result<()> {
        let dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let mut store = FileStore::new(dir);
        log::info!("Using data directory {}", store.dir().display());

        let settings = Settings::load(&store);
        // Write defaults out once so they can be edited
        if matches!(store.get(SETTINGS_KEY), Ok(None)) {
            settings.save(&mut store);
        }

        let mut term = Terminal::setup()?;
        let result = play(&mut term, settings, store);
        term.restore()?;
        result
    }

    fn play(term: &mut Terminal, settings: Settings, store: FileStore) -> io::Result<()> {
        let board = term.fit_board(settings.board_cells, settings.unit_size)?;
        term.prepare(&board)?;

        let clock = Clock::new();
        let mut game = Game::new(settings, board, store);
        log_events(&game.start(clock.now_ms()));

        loop {
            let now = clock.now_ms();
            let wait = game.time_until_wake(now).unwrap_or(MAX_WAIT_MS).min(MAX_WAIT_MS);

            for input in term.read_inputs(Duration::from_millis(wait))? {
                match input {
                    TermInput::Quit => return Ok(()),
                    TermInput::Command(command) => {
                        log_events(&game.handle(command, clock.now_ms()));
                    }
                }
            }

            log_events(&game.update(clock.now_ms()));

            let state = game.state();
            let best = game.high_scores().top_score().unwrap_or(0);
            term.status(&format!(
                "Score: {}  Level: {}  Speed: {} ms  Best: {}   arrows move  p pause  r reset  +/- speed  q quit",
                state.score, state.level, state.speed_ms, best
            ))?;
            game.render(term)?;
        }
    }

    fn log_events(events: &[GameEvent]) {
        for event in events {
            log::debug!("{event:?}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canvas Snake (terminal) starting...");

    if let Err(e) = native::run() {
        eprintln!("canvas-snake: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
