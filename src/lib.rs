//! Grid snake engine: board state, tick-by-tick movement and collision
//! resolution, food placement, and the run-length encoded board format.

pub mod board;
pub mod body;
pub mod engine;
pub mod setup;
pub mod snake;

pub use board::{Board, CellFlag};
pub use body::Body;
pub use engine::{Game, GameStatus};
pub use setup::{initialize, InitError};
pub use snake::{Direction, MoveResult, Snake};
