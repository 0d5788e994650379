use crate::config::Config;
use crate::input::{key_action, KeyAction};
use crate::render::RenderSink;
use crate::session::{new_game, Ending, GameSession};
use crate::term::TermManager;
use crate::ticker::{Tick, TickDriver, TickHandle};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::{self, Sender};

const INTRO: &[&str] = &[
    "Arrow keys or WASD to move",
    "R to restart",
    "Q, Esc or CTRL+C to quit",
    "",
    "Press any key to begin",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// A message box is up and the next key starts a new game.
    Waiting,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns everything that lives across games: the current session, the tick
/// stream driving it, the render sink and the best score so far.
pub struct SnakeGame<S, R = StdRng> {
    width: i32,
    height: i32,
    initial_length: usize,
    session: GameSession,
    phase: Phase,
    high_score: u32,
    driver: TickDriver,
    ticks: Option<TickHandle>,
    generation: u64,
    tx: Sender<Tick>,
    sink: S,
    rng: R,
}

impl<S: RenderSink, R: Rng> SnakeGame<S, R> {
    pub fn new(config: &Config, sink: S, mut rng: R, tx: Sender<Tick>) -> Self {
        let (width, height) = (config.width as i32, config.height as i32);
        let initial_length = config.initial_length as usize;
        let session = new_game(width, height, initial_length, &mut rng);
        let driver = TickDriver::new(config.tick_period());
        log::debug!("Grid {}x{}, tick every {:?}", width, height, driver.period());

        SnakeGame {
            width,
            height,
            initial_length,
            session,
            phase: Phase::Waiting,
            high_score: 0,
            driver,
            ticks: None,
            generation: 0,
            tx,
            sink,
            rng,
        }
    }

    pub fn show_intro(&mut self) -> Result<()> {
        self.sink.repaint(&self.session, self.high_score)?;
        self.sink.notify(INTRO)
    }

    /// Throws the current session away and starts a fresh one with its own
    /// tick stream. Any previous stream is cancelled first.
    pub fn restart(&mut self) -> Result<()> {
        self.stop_ticks();

        self.session = new_game(self.width, self.height, self.initial_length, &mut self.rng);
        self.generation += 1;
        self.phase = Phase::Playing;
        log::info!("Starting game {} (food at {:?})", self.generation, self.session.food());

        self.sink.dismiss()?;
        self.sink.repaint(&self.session, self.high_score)?;

        let handle = self.driver.start(self.generation, self.tx.clone());
        log::debug!("Tick stream {} started", handle.generation());
        self.ticks = Some(handle);
        Ok(())
    }

    pub fn on_tick(&mut self, tick: Tick) -> Result<()> {
        if tick.generation != self.generation || self.phase != Phase::Playing {
            log::trace!("Dropping stale tick from stream {}", tick.generation);
            return Ok(());
        }

        let step = self.session.advance(&mut self.rng);
        if step.ate_food {
            log::debug!("Ate food, score {}", self.session.score());
        }

        self.sink.repaint(&self.session, self.high_score)?;

        match step.ending {
            Some(ending) => self.game_over(ending),
            None => Ok(()),
        }
    }

    pub fn on_key(&mut self, action: KeyAction) -> Result<Flow> {
        match (self.phase, action) {
            (_, KeyAction::Quit) => return Ok(Flow::Quit),
            (Phase::Waiting, _) | (Phase::Playing, KeyAction::Restart) => self.restart()?,
            (Phase::Playing, KeyAction::Steer(direction)) => {
                self.session.set_pending_direction(direction);
            }
            (Phase::Playing, KeyAction::Other) => {}
        }

        Ok(Flow::Continue)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, ending: Ending) -> Result<()> {
        self.stop_ticks();
        self.phase = Phase::Waiting;

        let score = self.session.score();
        self.high_score = self.high_score.max(score);
        log::info!(
            "Game {} over ({:?}), length {}, score {}, best {}",
            self.generation, ending, self.session.snake().len(), score, self.high_score
        );

        let title = match ending {
            Ending::BoardFilled => "You won!",
            Ending::Crashed(_) => "Game over!",
        };

        self.sink.notify(&[
            title,
            &*format!("Score: {}", score),
            &*format!("Best: {}", self.high_score),
            "",
            "Press any key to play again,",
            "or Q to quit.",
        ])
    }

    fn stop_ticks(&mut self) {
        if let Some(handle) = self.ticks.take() {
            handle.cancel();
        }
    }
}

/// Runs the game on the terminal until the player quits. The terminal is
/// restored even when the loop fails.
pub async fn run(config: &Config) -> Result<()> {
    let mut term = TermManager::new(config.cell_width)?;
    term.ensure_fits(config.width, config.height)?;
    term.setup()?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Capacity 1: the tick task waits for each tick to be handled.
    let (tx, mut rx) = mpsc::channel(1);
    let mut game = SnakeGame::new(config, term, rng, tx);

    let result = play(&mut game, &mut rx).await;

    game.stop_ticks();
    game.sink.restore()?;
    result
}

async fn play<R: Rng>(game: &mut SnakeGame<TermManager, R>, rx: &mut mpsc::Receiver<Tick>) -> Result<()> {
    game.show_intro()?;
    let mut events = EventStream::new();

    loop {
        tokio::select! {
            maybe_event = events.next() => {
                let event = match maybe_event {
                    Some(event) => event.context("Error reading terminal event")?,
                    None => return Ok(()),
                };

                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press && game.on_key(key_action(&key))? == Flow::Quit {
                        log::info!("Quit requested");
                        return Ok(());
                    }
                }
            }

            Some(tick) = rx.recv() => {
                game.on_tick(tick)?;
            }
        }
    }
}
