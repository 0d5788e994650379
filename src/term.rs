use crate::{Coords, TermInt};
use crate::render::RenderSink;
use crate::session::GameSession;
use crate::snake::Cell;
use std::io::{Stdout, Write, stdout};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

// Row 0 holds the score line, the board border starts right below it.
const STATUS_ROW: TermInt = 0;
const BOARD_TOP: TermInt = 1;

/// Terminal render sink. Keeps a copy of every character drawn on the board
/// so a message box can be removed without a full repaint.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    cell_width: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new(cell_width: TermInt) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, cell_width, stdout, screen, current_msg: None })
    }

    /// Fails if a `grid_width` x `grid_height` board plus border and status
    /// line does not fit in the terminal.
    pub fn ensure_fits(&self, grid_width: TermInt, grid_height: TermInt) -> Result<()> {
        let (need_w, need_h) = board_extent(grid_width, grid_height, self.cell_width);
        if need_w as u32 > self.width as u32 || need_h as u32 > self.height as u32 {
            bail!(
                "terminal is {}x{} but a {}x{} board needs at least {}x{}",
                self.width, self.height, grid_width, grid_height, need_w, need_h
            );
        }
        Ok(())
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self, grid_width: TermInt, grid_height: TermInt) -> Result<()> {
        let (width, height) = board_extent(grid_width, grid_height, self.cell_width);
        let end_x = width - 1;
        let end_y = BOARD_TOP + height - 2;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, BOARD_TOP), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in BOARD_TOP + 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn paint_cell(&mut self, cell: Cell, glyph: char, fill: char) -> Result<()> {
        let Some((x, y)) = self.cell_origin(cell) else {
            return Ok(());
        };

        self.print_at((x, y), glyph)?;
        for dx in 1..self.cell_width {
            self.print_at((x + dx, y), fill)?;
        }
        Ok(())
    }

    /// Screen position of the first column of a grid cell, or `None` for
    /// cells off the board.
    fn cell_origin(&self, cell: Cell) -> Option<Coords> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let x = 1 + cell.x as u32 * self.cell_width as u32;
        let y = BOARD_TOP as u32 + 1 + cell.y as u32;
        Some((TermInt::try_from(x).ok()?, TermInt::try_from(y).ok()?))
    }

    fn print_str(&mut self, pos: Coords, text: &str) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).context("Error printing")?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // Message boxes bypass the screen buffer so hiding them can restore
        // whatever was underneath.
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).context("Error printing")?;
        Ok(())
    }

    fn hide_message(&mut self) -> Result<()> {
        let Some(msg) = self.current_msg.take() else {
            return Ok(());
        };
        let top_left = msg.top_left;

        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if x >= self.width || y >= self.height {
                    continue;
                }
                let ch = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch)?;
            }
        }

        Ok(())
    }
}

impl RenderSink for TermManager {
    fn repaint(&mut self, session: &GameSession, high_score: u32) -> Result<()> {
        let (grid_width, grid_height) = (session.width() as TermInt, session.height() as TermInt);
        let body_char = if session.is_running() {SNAKE_BODY_CHAR} else {DEAD_SNAKE_CHAR};

        self.draw_borders(grid_width, grid_height)?;
        for y in 0..session.height() {
            for x in 0..session.width() {
                self.paint_cell(Cell::new(x, y), ' ', ' ')?;
            }
        }

        self.paint_cell(session.food(), FOOD_CHAR, ' ')?;
        for segment in session.snake().trailing() {
            self.paint_cell(*segment, body_char, body_char)?;
        }
        let head = session.snake().head();
        if (0..session.width()).contains(&head.x) && (0..session.height()).contains(&head.y) {
            let head_char = if session.is_running() {session.direction().head_char()} else {DEAD_SNAKE_CHAR};
            self.paint_cell(head, head_char, body_char)?;
        }

        let status = format!("Score: {:<6} Best: {:<6}", session.score(), high_score);
        self.print_str((0, STATUS_ROW), &status)?;

        self.flush()
    }

    fn notify(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Blank first and last rows around the text
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    fn dismiss(&mut self) -> Result<()> {
        self.hide_message()?;
        self.flush()
    }
}

/// Terminal columns and rows taken by the board, its border and the status
/// line.
fn board_extent(grid_width: TermInt, grid_height: TermInt, cell_width: TermInt) -> Coords {
    let width = grid_width.saturating_mul(cell_width).saturating_add(2);
    let height = grid_height.saturating_add(2 + BOARD_TOP);
    (width, height)
}
