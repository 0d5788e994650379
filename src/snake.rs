use std::collections::VecDeque;

use Direction::*;

/// A grid position. Signed so that a head stepping off the board is still
/// representable until the collision check rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Cell { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Resolves a requested turn against the direction applied on the last tick.
/// A direct reversal is ignored and `current` is kept.
pub fn steer(current: Direction, requested: Direction) -> Direction {
    if requested.is_opposite(current) {
        current
    } else {
        requested
    }
}

/// Snake body, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// A horizontal snake on row 0 with its head at column `length - 1`
    /// and its tail at column 0.
    pub fn new(length: usize) -> Self {
        let length = length.max(1);
        let body = (0..length as i32).rev().map(|x| Cell::new(x, 0)).collect();
        Snake { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    /// Every segment except the head.
    pub fn trailing(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter().skip(1)
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    /// Drops the last segment, keeping at least the head.
    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }
}

#[cfg(test)]
impl Snake {
    /// Builds a snake from head-first cells; `None` if there are none.
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        (!body.is_empty()).then_some(Snake { body })
    }

    pub(crate) fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    pub(crate) fn to_vec(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));

        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn test_steer_rejects_reversal() {
        assert_eq!(steer(Right, Left), Right);
        assert_eq!(steer(Right, Up), Up);
        assert_eq!(steer(Up, Down), Up);
        assert_eq!(steer(Left, Left), Left);
    }

    #[test]
    fn test_cell_step() {
        let c = Cell::new(5, 5);
        assert_eq!(c.step(Up), Cell::new(5, 4));
        assert_eq!(c.step(Down), Cell::new(5, 6));
        assert_eq!(c.step(Left), Cell::new(4, 5));
        assert_eq!(c.step(Right), Cell::new(6, 5));
    }

    #[test]
    fn test_new_snake_layout() {
        let snake = Snake::new(5);
        assert_eq!(snake.head(), Cell::new(4, 0));
        assert_eq!(
            snake.to_vec(),
            vec![Cell::new(4, 0), Cell::new(3, 0), Cell::new(2, 0), Cell::new(1, 0), Cell::new(0, 0)]
        );
    }

    #[test]
    fn test_pop_tail_keeps_head() {
        let mut snake = Snake::new(1);
        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_trailing_skips_head() {
        let snake = Snake::new(3);
        let rest: Vec<Cell> = snake.trailing().copied().collect();
        assert_eq!(rest, vec![Cell::new(1, 0), Cell::new(0, 0)]);
    }
}
