//! Game state and the per-tick transition rules.
//!
//! A [`GameSession`] is created by [`new_game`], advanced once per tick and
//! thrown away on restart. Nothing in here does I/O.

use std::collections::HashSet;

use rand::Rng;

use crate::food::place_food;
use crate::snake::{steer, Cell, Direction, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// The head left the grid.
    Wall,
    /// The head ran into another segment.
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCheck {
    Safe,
    Fatal(Collision),
}

/// Why a session stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Crashed(Collision),
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated(Ending),
}

/// What a single advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub ate_food: bool,
    pub ending: Option<Ending>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    width: i32,
    height: i32,
    snake: Snake,
    direction: Direction,
    pending: Direction,
    food: Cell,
    score: u32,
    status: Status,
}

/// Starts a session with a horizontal snake on row 0, heading right, and
/// food somewhere off the snake.
pub fn new_game<R: Rng + ?Sized>(width: i32, height: i32, initial_length: usize, rng: &mut R) -> GameSession {
    let snake = Snake::new(initial_length);
    let food = place_food(width, height, &occupied_by(&snake), rng);

    GameSession {
        width,
        height,
        snake,
        direction: Direction::Right,
        pending: Direction::Right,
        food,
        score: 0,
        status: Status::Running,
    }
}

fn occupied_by(snake: &Snake) -> HashSet<Cell> {
    snake.cells().copied().collect()
}

impl GameSession {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Direction applied on the most recent tick.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Records a requested turn for the next tick. A reversal of the direction
    /// applied on the last tick is ignored and leaves the previous pending
    /// direction in place. Returns the pending direction after the request.
    pub fn set_pending_direction(&mut self, requested: Direction) -> Direction {
        if steer(self.direction, requested) == requested {
            self.pending = requested;
        }
        self.pending
    }

    /// Moves the snake one cell in the pending direction, eating and growing
    /// if the head lands on the food, then classifies the result.
    /// Does nothing once the session has terminated.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Advance {
        if let Status::Terminated(ending) = self.status {
            return Advance { ate_food: false, ending: Some(ending) };
        }

        self.direction = self.pending;
        let new_head = self.snake.head().step(self.direction);
        self.snake.push_head(new_head);

        let ate_food = new_head == self.food;
        if ate_food {
            self.score += 1;

            let occupied = occupied_by(&self.snake);
            if occupied.len() >= (self.width * self.height) as usize {
                self.status = Status::Terminated(Ending::BoardFilled);
                return Advance { ate_food, ending: Some(Ending::BoardFilled) };
            }
            self.food = place_food(self.width, self.height, &occupied, rng);
        } else {
            self.snake.pop_tail();
        }

        let ending = match self.check_collision() {
            CollisionCheck::Safe => None,
            CollisionCheck::Fatal(collision) => {
                let ending = Ending::Crashed(collision);
                self.status = Status::Terminated(ending);
                Some(ending)
            }
        };

        Advance { ate_food, ending }
    }

    /// Classifies the current head position without touching state.
    pub fn check_collision(&self) -> CollisionCheck {
        let head = self.snake.head();

        if head.x < 0 || head.x >= self.width || head.y < 0 || head.y >= self.height {
            return CollisionCheck::Fatal(Collision::Wall);
        }

        if self.snake.trailing().any(|segment| *segment == head) {
            return CollisionCheck::Fatal(Collision::Body);
        }

        CollisionCheck::Safe
    }
}

#[cfg(test)]
impl GameSession {
    pub(crate) fn with_state(width: i32, height: i32, cells: &[(i32, i32)], direction: Direction, food: Cell) -> Self {
        let snake = Snake::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y))).unwrap();
        GameSession {
            width,
            height,
            snake,
            direction,
            pending: direction,
            food,
            score: 0,
            status: Status::Running,
        }
    }

    /// Direction the next tick will apply.
    pub(crate) fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub(crate) fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn set_food(&mut self, food: Cell) {
        self.food = food;
    }
}
