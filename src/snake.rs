use crate::body::Body;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Change in linear index for one step on a board `width` cells wide.
    pub fn offset(self, width: usize) -> isize {
        match self {
            Up => -(width as isize),
            Down => width as isize,
            Left => -1,
            Right => 1,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// What one tick did to the board, for callers that redraw incrementally.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: usize, old_head: usize, old_tail: Option<usize>, ate: bool },
    Crashed,
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Body,
    direction: Direction,
}

impl Snake {
    pub fn new(head: usize, direction: Direction) -> Self {
        Snake { body: Body::new(head), direction }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn head(&self) -> usize {
        self.body.head()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = new_direction;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Left.offset(20), -1);
        assert_eq!(Right.offset(20), 1);
        assert_eq!(Up.offset(20), -20);
        assert_eq!(Down.offset(20), 20);
    }

    #[test]
    fn test_opposites() {
        assert!(Up.is_opposite(Down));
        assert!(Left.is_opposite(Right));
        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn test_direction_is_stored_verbatim() {
        let mut snake = Snake::new(42, Right);
        snake.set_direction(Left);
        assert_eq!(snake.get_direction(), Left);
        assert_eq!(snake.head_char(), '<');
    }
}
