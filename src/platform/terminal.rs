//! Terminal frontend (crossterm)
//!
//! Each board cell is two terminal columns wide so cells look square. The
//! board sits below a one-line status bar, inside a border.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{self, Stylize};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::input::Command;
use crate::renderer::{Color, Renderer, TextAlign, TextStyle};
use crate::sim::{Board, Direction, Position};

/// Rows above the board's top border (status bar)
const STATUS_ROWS: u16 = 1;
/// Terminal columns per cell
const CELL_COLS: u16 = 2;

/// Keyboard input as seen by the terminal host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermInput {
    Command(Command),
    Quit,
}

pub struct Terminal {
    stdout: Stdout,
    /// Board being drawn, in pixels
    board: Board,
}

impl Terminal {
    /// Enter the alternate screen in raw mode. Call `restore` before exiting.
    pub fn setup() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        Ok(Self {
            stdout,
            board: Board::square(1, 1),
        })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, LeaveAlternateScreen)
    }

    /// Largest square board (in cells) that fits, capped at `max_cells`
    pub fn fit_board(&self, max_cells: u32, unit: i32) -> io::Result<Board> {
        let (cols, rows) = terminal::size()?;
        let by_width = cols.saturating_sub(2) / CELL_COLS;
        let by_height = rows.saturating_sub(STATUS_ROWS + 2);
        let cells = (by_width.min(by_height) as u32).clamp(2, max_cells.max(2));
        Ok(Board::square(cells, unit))
    }

    /// Draw the border for `board` and remember it for later cell mapping
    pub fn prepare(&mut self, board: &Board) -> io::Result<()> {
        self.board = *board;
        queue!(self.stdout, terminal::Clear(ClearType::All))?;

        let width = board.cols() as u16 * CELL_COLS + 2;
        let height = board.rows() as u16 + 2;
        let (top, bottom) = (STATUS_ROWS, STATUS_ROWS + height - 1);

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 { '+' } else { '-' };
            queue!(
                self.stdout,
                cursor::MoveTo(x, top),
                style::Print(ch),
                cursor::MoveTo(x, bottom),
                style::Print(ch)
            )?;
        }
        for y in top + 1..bottom {
            queue!(
                self.stdout,
                cursor::MoveTo(0, y),
                style::Print('|'),
                cursor::MoveTo(width - 1, y),
                style::Print('|')
            )?;
        }
        self.stdout.flush()
    }

    /// Replace the status bar text
    pub fn status(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(text)
        )
    }

    /// Drain pending key events, waiting at most `timeout` for the first one
    pub fn read_inputs(&self, timeout: Duration) -> io::Result<Vec<TermInput>> {
        let mut inputs = Vec::new();
        let mut wait = timeout;

        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = map_key(&key) {
                    inputs.push(input);
                }
            }
            wait = Duration::ZERO;
        }

        Ok(inputs)
    }

    /// Terminal cell of a board pixel position, if it is on the board
    fn screen_pos(&self, pos: Position) -> Option<(u16, u16)> {
        if !self.board.contains(pos) {
            return None;
        }
        let col = (pos.x / self.board.unit) as u16 * CELL_COLS + 1;
        let row = (pos.y / self.board.unit) as u16 + STATUS_ROWS + 1;
        Some((col, row))
    }
}

fn term_color(color: Color) -> style::Color {
    let (r, g, b) = color.rgb;
    style::Color::Rgb { r, g, b }
}

fn map_key(key: &KeyEvent) -> Option<TermInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let cmd = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(TermInput::Quit);
        }
        KeyCode::Char('q') => return Some(TermInput::Quit),
        KeyCode::Up => Command::Turn(Direction::Up),
        KeyCode::Down => Command::Turn(Direction::Down),
        KeyCode::Left => Command::Turn(Direction::Left),
        KeyCode::Right => Command::Turn(Direction::Right),
        KeyCode::Esc => Command::TogglePause,
        KeyCode::Char(c) => Command::from_key(c.encode_utf8(&mut [0; 4]))?,
        _ => return None,
    };
    Some(TermInput::Command(cmd))
}

impl Renderer for Terminal {
    type Error = io::Error;

    fn clear_board(&mut self, board: &Board, color: Color) -> io::Result<()> {
        let blank = " ".repeat(board.cols() as usize * CELL_COLS as usize);
        for row in 0..board.rows() as u16 {
            queue!(
                self.stdout,
                cursor::MoveTo(1, row + STATUS_ROWS + 1),
                style::PrintStyledContent(blank.as_str().on(term_color(color)))
            )?;
        }
        Ok(())
    }

    fn fill_cell(
        &mut self,
        pos: Position,
        _size: i32,
        fill: Color,
        _border: Option<Color>,
    ) -> io::Result<()> {
        // Off-board cells (a head that just hit the wall) are not drawn
        let Some((col, row)) = self.screen_pos(pos) else {
            return Ok(());
        };
        queue!(
            self.stdout,
            cursor::MoveTo(col, row),
            style::PrintStyledContent("  ".on(term_color(fill)))
        )
    }

    fn draw_text(&mut self, text: &str, text_style: TextStyle) -> io::Result<()> {
        let Some((col, row)) = self.screen_pos(text_style.pos) else {
            return Ok(());
        };
        let len = text.chars().count() as u16;
        let col = match text_style.align {
            TextAlign::Left => col,
            TextAlign::Center => col.saturating_sub(len / 2).max(1),
        };
        queue!(
            self.stdout,
            cursor::MoveTo(col, row),
            style::PrintStyledContent(text.with(term_color(text_style.color)).bold())
        )
    }

    fn present(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
