//! Board construction: the built-in default board and the run-length encoded
//! board format `B<height>x<width>|<row>|<row>|...`, where each row is a
//! sequence of `<letter><count>` runs (`W` wall, `E` empty, `S` snake).

use std::iter::{self, Peekable};
use std::str::Chars;

use log::{debug, warn};
use rand::rngs::StdRng;
use thiserror::Error;

use crate::board::{Board, CellFlag};
use crate::engine::Game;
use crate::snake::{Direction, Snake};

pub const DEFAULT_WIDTH: usize = 20;
pub const DEFAULT_HEIGHT: usize = 10;
pub const DEFAULT_SNAKE_INDEX: usize = DEFAULT_WIDTH * 2 + 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("board dimensions do not match its contents")]
    IncorrectDimensions,
    #[error("board must contain exactly one snake cell")]
    WrongSnakeNumber,
    #[error("unexpected cell letter {0:?}")]
    BadChar(char),
    #[error("board header must look like B<height>x<width>|")]
    MalformedHeader,
    #[error("board has no empty cell to place food on")]
    NoPlainCell,
}

/// Builds a fresh game from `compressed`, or from the default board when `None`.
/// The status is reset and one piece of food is placed.
pub fn initialize(compressed: Option<&str>, rng: StdRng) -> Result<Game, InitError> {
    let (board, snake) = match compressed {
        Some(s) => decompress(s).map_err(|e| {
            warn!("rejected board description: {}", e);
            e
        })?,
        None => default_board(),
    };

    if board.count(CellFlag::Plain) == 0 {
        warn!("rejected board description: {}", InitError::NoPlainCell);
        return Err(InitError::NoPlainCell);
    }

    let mut game = Game::new(board, snake, rng);
    game.place_food();
    Ok(game)
}

/// 20x10 board walled on every edge, single-cell snake heading right.
pub fn default_board() -> (Board, Snake) {
    let mut board = Board::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);

    for col in 0..DEFAULT_WIDTH {
        board.set(board.index_of(0, col), CellFlag::Wall);
        board.set(board.index_of(DEFAULT_HEIGHT - 1, col), CellFlag::Wall);
    }
    for row in 0..DEFAULT_HEIGHT {
        board.set(board.index_of(row, 0), CellFlag::Wall);
        board.set(board.index_of(row, DEFAULT_WIDTH - 1), CellFlag::Wall);
    }

    board.set(DEFAULT_SNAKE_INDEX, CellFlag::Snake);
    (board, Snake::new(DEFAULT_SNAKE_INDEX, Direction::Right))
}

pub fn decompress(compressed: &str) -> Result<(Board, Snake), InitError> {
    let compressed = compressed.trim_end_matches(|c| c == '\n' || c == '\r');
    let (height, width, rows) = parse_header(compressed)?;

    if compressed.matches('|').count() != height {
        return Err(InitError::IncorrectDimensions);
    }

    let total = width.checked_mul(height).ok_or(InitError::IncorrectDimensions)?;
    // Runs are validated before any cell storage exists; the header alone is untrusted
    let mut runs = Vec::new();
    let mut filled = 0usize;
    let mut snake_cells = 0usize;
    let mut head = None;

    for row in rows.split('|') {
        let mut chars = row.chars().peekable();

        while let Some(letter) = chars.next() {
            let count = read_count(&mut chars)?;

            if count > total - filled {
                return Err(InitError::IncorrectDimensions);
            }

            let flag = match letter {
                'W' => CellFlag::Wall,
                'E' => CellFlag::Plain,
                'S' => {
                    snake_cells += count;
                    if snake_cells != 1 {
                        return Err(InitError::WrongSnakeNumber);
                    }
                    head = Some(filled);
                    CellFlag::Snake
                }
                other => return Err(InitError::BadChar(other)),
            };

            runs.push((flag, count));
            filled += count;
        }
    }

    if filled != total {
        return Err(InitError::IncorrectDimensions);
    }
    let head = head.ok_or(InitError::WrongSnakeNumber)?;

    let mut cells = Vec::new();
    cells.try_reserve_exact(total).map_err(|_| InitError::IncorrectDimensions)?;
    for (flag, count) in runs {
        cells.extend(iter::repeat(flag).take(count));
    }

    debug!("decoded {}x{} board, snake at {}", height, width, head);
    Ok((Board::from_cells(width, height, cells), Snake::new(head, Direction::Right)))
}

/// Splits `B<h>x<w>|rest` into `(h, w, rest)`.
fn parse_header(compressed: &str) -> Result<(usize, usize, &str), InitError> {
    let body = compressed.strip_prefix('B').ok_or(InitError::MalformedHeader)?;
    let bar = body.find('|').ok_or(InitError::MalformedHeader)?;
    let (dims, rows) = (&body[..bar], &body[bar + 1..]);
    let x = dims.find('x').ok_or(InitError::MalformedHeader)?;

    let height = parse_dimension(&dims[..x])?;
    let width = parse_dimension(&dims[x + 1..])?;
    Ok((height, width, rows))
}

fn parse_dimension(digits: &str) -> Result<usize, InitError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InitError::MalformedHeader);
    }
    digits.parse().map_err(|_| InitError::IncorrectDimensions)
}

/// Consumes the decimal run length after a letter. No digits means zero.
fn read_count(chars: &mut Peekable<Chars<'_>>) -> Result<usize, InitError> {
    let mut count = 0usize;

    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        count = count
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit as usize))
            .ok_or(InitError::IncorrectDimensions)?;
    }

    Ok(count)
}
