use anyhow::Result;

use crate::session::GameSession;

/// Receives "state changed" notifications from the game loop.
///
/// `repaint` must draw only from its arguments; the sink keeps no game
/// state of its own.
pub trait RenderSink {
    fn repaint(&mut self, session: &GameSession, high_score: u32) -> Result<()>;

    /// Shows a message box on top of the board until `dismiss` is called.
    fn notify(&mut self, lines: &[&str]) -> Result<()>;

    fn dismiss(&mut self) -> Result<()>;
}
