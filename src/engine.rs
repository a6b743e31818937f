use log::debug;
use rand::rngs::StdRng;

use crate::board::{Board, CellFlag};
use crate::snake::{Direction, MoveResult::{self, *}, Snake};

/// Progress of the current round, polled by the driving loop after every tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GameStatus {
    pub game_over: bool,
    pub score: u32,
}

impl GameStatus {
    pub fn reset(&mut self) {
        *self = GameStatus::default();
    }
}

/// Outcome of walking the body for a move onto a snake-occupied cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Backing {
    Clear,
    Collision,
    /// Target is the tail, which moves away this tick.
    TailFollow,
    /// Reversal onto the neck; keep going the way we came.
    Straight,
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    snake: Snake,
    status: GameStatus,
    rng: StdRng,
}

impl Game {
    pub fn new(board: Board, snake: Snake, rng: StdRng) -> Self {
        Game { board, snake, status: GameStatus::default(), rng }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct cell access for level editors and tests.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn place_food(&mut self) -> usize {
        self.board.place_food(&mut self.rng)
    }

    /// Advances the game by one tick.
    ///
    /// An explicit `input` always overwrites the stored direction, even when the
    /// resulting move is rejected as a reversal. With no input the snake keeps its
    /// stored heading. Once the game is over this only records the input.
    pub fn update(&mut self, input: Option<Direction>, growing: bool) -> MoveResult {
        let prev_direction = self.snake.get_direction();
        if let Some(dir) = input {
            self.snake.set_direction(dir);
        }

        if self.status.game_over {
            return Idle;
        }

        let head = self.snake.head();
        let mut next = match self.board.step(head, input.unwrap_or(prev_direction)) {
            Some(next) => next,
            None => return self.crash(head),
        };

        match self.board.get(next) {
            CellFlag::Wall => return self.crash(next),
            CellFlag::Food => return self.eat(next, growing),
            _ => {}
        }

        if self.snake.len() > 1 {
            match self.backing_up(next) {
                Backing::Clear | Backing::TailFollow => {}
                Backing::Collision => return self.crash(next),
                Backing::Straight => {
                    next = match self.board.step(head, self.heading(prev_direction)) {
                        Some(next) => next,
                        None => return self.crash(head),
                    };

                    match self.board.get(next) {
                        CellFlag::Wall => return self.crash(next),
                        CellFlag::Food => return self.eat(next, growing),
                        CellFlag::Snake if next != self.snake.body().last() => {
                            return self.crash(next)
                        }
                        _ => {}
                    }
                }
            }
        }

        self.advance(next)
    }

    /// Direction the head actually travelled last tick, read off the neck. The
    /// stored direction can disagree after a rejected reversal.
    fn heading(&self, fallback: Direction) -> Direction {
        let body = self.snake.body();
        body.iter()
            .nth(1)
            .and_then(|&neck| self.board.direction_between(neck, body.head()))
            .unwrap_or(fallback)
    }

    /// Walks consecutive (previous, current) segment pairs from the head down.
    /// A touch two or more pairs deep is fatal unless it is the tail; anything
    /// shallower is a reversal onto the neck.
    fn backing_up(&self, next: usize) -> Backing {
        let body = self.snake.body();
        let tail = body.last();
        let mut previous = body.head();

        for (depth, &segment) in body.iter().skip(1).enumerate() {
            if previous == next || segment == next {
                return match (depth >= 2, next == tail) {
                    (true, true) => Backing::TailFollow,
                    (true, false) => Backing::Collision,
                    (false, _) => Backing::Straight,
                };
            }
            previous = segment;
        }

        Backing::Clear
    }

    fn advance(&mut self, next: usize) -> MoveResult {
        let old_head = self.snake.head();
        let old_tail = self.snake.body().last();

        // Free the tail first so following it leaves that cell flagged as snake.
        self.board.set(old_tail, CellFlag::Plain);
        let body = self.snake.body_mut();
        body.push_front(next);
        body.pop_back();
        self.board.set(next, CellFlag::Snake);

        Moved {
            new_head: next,
            old_head,
            old_tail: if old_tail != next { Some(old_tail) } else { None },
            ate: false,
        }
    }

    fn eat(&mut self, next: usize, growing: bool) -> MoveResult {
        let old_head = self.snake.head();
        self.status.score += 1;
        self.board.set(next, CellFlag::Snake);

        let old_tail = if growing {
            self.snake.body_mut().push_front(next);
            None
        } else {
            self.board.set(old_head, CellFlag::Plain);
            self.snake.body_mut().replace_head(next);
            Some(old_head)
        };

        let food = self.place_food();
        debug!("ate food at {}, score {}, new food at {}", next, self.status.score, food);

        Moved { new_head: next, old_head, old_tail, ate: true }
    }

    fn crash(&mut self, at: usize) -> MoveResult {
        debug!("crashed at {} with score {}", at, self.status.score);
        self.status.game_over = true;
        Crashed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{decompress, default_board};
    use rand::SeedableRng;
    use Direction::*;

    const W: usize = 8;

    fn at(row: usize, col: usize) -> usize {
        row * W + col
    }

    /// 8x8 board walled on every edge holding a snake over `cells`, head first.
    fn game_with(cells: &[usize], direction: Direction) -> Game {
        let mut board = Board::new(W, W);
        for i in 0..W {
            board.set(at(0, i), CellFlag::Wall);
            board.set(at(W - 1, i), CellFlag::Wall);
            board.set(at(i, 0), CellFlag::Wall);
            board.set(at(i, W - 1), CellFlag::Wall);
        }

        let mut snake = Snake::new(cells[cells.len() - 1], direction);
        for &cell in cells[..cells.len() - 1].iter().rev() {
            snake.body_mut().push_front(cell);
        }
        for &cell in cells {
            board.set(cell, CellFlag::Snake);
        }

        Game::new(board, snake, StdRng::seed_from_u64(3))
    }

    fn body(game: &Game) -> Vec<usize> {
        game.snake().body().iter().copied().collect()
    }

    #[test]
    fn test_default_board_moves_right() {
        let (board, snake) = default_board();
        let mut game = Game::new(board, snake, StdRng::seed_from_u64(0));

        let result = game.update(None, false);

        assert_eq!(
            result,
            Moved { new_head: 43, old_head: 42, old_tail: Some(42), ate: false }
        );
        assert_eq!(body(&game), vec![43]);
        assert_eq!(game.board().get(42), CellFlag::Plain);
        assert_eq!(game.board().get(43), CellFlag::Snake);
        assert_eq!(game.status(), GameStatus { game_over: false, score: 0 });
    }

    #[test]
    fn test_wall_ends_game_without_mutation() {
        let mut game = game_with(&[at(1, 3), at(2, 3)], Up);
        let board_before = game.board().clone();

        assert_eq!(game.update(None, false), Crashed);

        assert!(game.status().game_over);
        assert_eq!(game.board(), &board_before);
        assert_eq!(body(&game), vec![at(1, 3), at(2, 3)]);
    }

    #[test]
    fn test_game_over_is_idle_but_records_input() {
        let mut game = game_with(&[at(1, 3)], Up);
        game.update(None, false);
        let board_before = game.board().clone();

        assert_eq!(game.update(Some(Down), false), Idle);

        assert_eq!(game.snake().get_direction(), Down);
        assert_eq!(game.board(), &board_before);
        assert_eq!(body(&game), vec![at(1, 3)]);
    }

    #[test]
    fn test_eating_while_growing() {
        let mut game = game_with(&[at(3, 3), at(3, 2)], Right);
        game.board.set(at(3, 4), CellFlag::Food);

        let result = game.update(None, true);

        assert_eq!(
            result,
            Moved { new_head: at(3, 4), old_head: at(3, 3), old_tail: None, ate: true }
        );
        assert_eq!(game.status().score, 1);
        assert_eq!(body(&game), vec![at(3, 4), at(3, 3), at(3, 2)]);
        assert_eq!(game.board().count(CellFlag::Snake), 3);
        assert_eq!(game.board().count(CellFlag::Food), 1);
    }

    #[test]
    fn test_eating_without_growing_moves_head_only() {
        let mut game = game_with(&[at(3, 3)], Right);
        game.board.set(at(3, 4), CellFlag::Food);

        game.update(None, false);

        assert_eq!(game.status().score, 1);
        assert_eq!(body(&game), vec![at(3, 4)]);
        assert_eq!(game.board().get(at(3, 3)), CellFlag::Plain);
        assert_eq!(game.board().count(CellFlag::Snake), 1);
        assert_eq!(game.board().count(CellFlag::Food), 1);
    }

    #[test]
    fn test_single_cell_can_reverse() {
        let mut game = game_with(&[at(3, 3)], Right);

        game.update(Some(Left), false);

        assert!(!game.status().game_over);
        assert_eq!(body(&game), vec![at(3, 2)]);
        assert_eq!(game.board().get(at(3, 3)), CellFlag::Plain);
    }

    #[test]
    fn test_reversal_keeps_previous_heading() {
        let mut game = game_with(&[at(3, 3), at(3, 2), at(3, 1)], Right);

        let result = game.update(Some(Left), false);

        assert!(!game.status().game_over);
        assert_eq!(
            result,
            Moved { new_head: at(3, 4), old_head: at(3, 3), old_tail: Some(at(3, 1)), ate: false }
        );
        assert_eq!(body(&game), vec![at(3, 4), at(3, 3), at(3, 2)]);
        assert_eq!(game.board().get(at(3, 1)), CellFlag::Plain);
        // the rejected input is still remembered
        assert_eq!(game.snake().get_direction(), Left);
    }

    #[test]
    fn test_idle_tick_after_reversal_keeps_going() {
        let mut game = game_with(&[at(3, 3), at(3, 2), at(3, 1)], Right);

        game.update(Some(Left), false);
        assert_eq!(game.snake().head(), at(3, 4));

        let result = game.update(None, false);

        assert!(!game.status().game_over);
        assert_eq!(
            result,
            Moved { new_head: at(3, 5), old_head: at(3, 4), old_tail: Some(at(3, 2)), ate: false }
        );
        assert_eq!(body(&game), vec![at(3, 5), at(3, 4), at(3, 3)]);
        assert_eq!(game.snake().get_direction(), Left);

        game.update(None, false);
        assert!(!game.status().game_over);
        assert_eq!(game.snake().head(), at(3, 6));
    }

    #[test]
    fn test_reversal_on_two_cells() {
        let mut game = game_with(&[at(2, 3), at(2, 2)], Right);

        game.update(Some(Left), false);

        assert!(!game.status().game_over);
        assert_eq!(body(&game), vec![at(2, 4), at(2, 3)]);
    }

    #[test]
    fn test_reversal_redirected_into_wall() {
        let mut game = game_with(&[at(2, 6), at(2, 5)], Right);

        assert_eq!(game.update(Some(Left), false), Crashed);
        assert!(game.status().game_over);
        assert_eq!(body(&game), vec![at(2, 6), at(2, 5)]);
    }

    #[test]
    fn test_reversal_redirected_onto_food() {
        let mut game = game_with(&[at(2, 3), at(2, 2)], Right);
        game.board.set(at(2, 4), CellFlag::Food);

        game.update(Some(Left), true);

        assert_eq!(game.status().score, 1);
        assert_eq!(body(&game), vec![at(2, 4), at(2, 3), at(2, 2)]);
    }

    #[test]
    fn test_following_the_tail() {
        // 2x2 loop, heading up, tail just right of the head
        let mut game = game_with(&[at(2, 2), at(3, 2), at(3, 3), at(2, 3)], Up);

        let result = game.update(Some(Right), false);

        assert!(!game.status().game_over);
        assert_eq!(
            result,
            Moved { new_head: at(2, 3), old_head: at(2, 2), old_tail: None, ate: false }
        );
        assert_eq!(body(&game), vec![at(2, 3), at(2, 2), at(3, 2), at(3, 3)]);
        assert_eq!(game.board().get(at(2, 3)), CellFlag::Snake);
        assert_eq!(game.board().count(CellFlag::Snake), 4);
    }

    #[test]
    fn test_self_collision() {
        let mut game = game_with(&[at(2, 2), at(3, 2), at(3, 3), at(2, 3), at(1, 3)], Up);
        let board_before = game.board().clone();

        assert_eq!(game.update(Some(Right), false), Crashed);

        assert!(game.status().game_over);
        assert_eq!(game.board(), &board_before);
        assert_eq!(body(&game).len(), 5);
    }

    #[test]
    fn test_step_off_unwalled_board() {
        let (board, snake) = decompress("B1x3|E1S1E1").unwrap();
        let mut game = Game::new(board, snake, StdRng::seed_from_u64(0));

        assert_eq!(game.update(Some(Up), false), Crashed);
        assert!(game.status().game_over);
    }

    #[test]
    fn test_status_reset() {
        let mut status = GameStatus { game_over: true, score: 9 };
        status.reset();
        assert_eq!(status, GameStatus { game_over: false, score: 0 });
    }
}
