use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use gridsnake::{initialize, CellFlag, Direction::{*, self}, Game, MoveResult};

use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const WALL_CHAR: char = '#';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Everything needed to start a round, collected from the command line.
pub struct Settings {
    pub board: Option<String>,
    pub growing: bool,
    pub seed: Option<u64>,
    pub tick: Duration,
}

enum Control {
    Continue,
    Quit,
}

pub struct SnakeGame {
    settings: Settings,
    paused: bool,
    rounds: u64,
    term: TermManager,
    next_game: Option<Game>,
}

impl SnakeGame {
    pub fn new(settings: Settings) -> Result<Self> {
        let term = TermManager::new().context("Failed to read terminal size")?;
        let mut game = SnakeGame { settings, paused: false, rounds: 0, term, next_game: None };

        // Build the first round up front so a bad board is reported on a sane terminal
        game.next_game = Some(game.new_game()?);
        Ok(game)
    }

    /// Runs rounds until the player quits, restoring the terminal on every path.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("Failed to set up terminal")?;
        let result = self.run_rounds();
        self.term.restore().context("Failed to restore terminal")?;
        result
    }

    fn run_rounds(&mut self) -> Result<()> {
        if let Control::Quit = self.show_intro()? {
            return Ok(());
        }

        loop {
            if let Control::Quit = self.play()? {
                return Ok(());
            }
        }
    }

    fn show_intro(&mut self) -> Result<Control> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C or q to quit",
            "",
            "Press any key to begin"
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(if is_quit(&key) { Control::Quit } else { Control::Continue })
    }

    fn play(&mut self) -> Result<Control> {
        let mut game = match self.next_game.take() {
            Some(game) => game,
            None => self.new_game()?,
        };
        self.rounds += 1;
        info!("round {} started", self.rounds);

        self.term.clear()?;
        self.draw_board(&game)?;

        let mut dir_change: Option<Direction> = None;
        let mut last_tick = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                if is_quit(&key_ev) {
                    return Ok(Control::Quit);
                }
                match key_ev.code {
                    KeyCode::Char('w') | KeyCode::Up => dir_change = Some(Up),
                    KeyCode::Char('a') | KeyCode::Left => dir_change = Some(Left),
                    KeyCode::Char('s') | KeyCode::Down => dir_change = Some(Down),
                    KeyCode::Char('d') | KeyCode::Right => dir_change = Some(Right),
                    KeyCode::Esc => self.toggle_pause()?,
                    _ => {}
                }
            }

            if self.paused || last_tick.elapsed() < self.settings.tick {
                continue;
            }
            last_tick = Instant::now();

            let input = dir_change.take().filter(|dir| !is_reversal(&game, *dir));
            let move_res = game.update(input, self.settings.growing);

            match move_res {
                MoveResult::Crashed => {
                    info!("round {} over with score {}", self.rounds, game.status().score);
                    return self.game_over(&game);
                }
                MoveResult::Moved { .. } => self.draw_update(&game, &move_res)?,
                MoveResult::Idle => {}
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn new_game(&self) -> Result<Game> {
        let rng = match self.settings.seed {
            // Later rounds get their own stream so restarts are not replays
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.rounds)),
            None => StdRng::from_entropy(),
        };

        let game = initialize(self.settings.board.as_deref(), rng)
            .context("Invalid board description")?;

        let (cols, rows) = self.term.size();
        let board = game.board();
        if board.width() > cols as usize || board.height() + 1 > rows as usize {
            bail!(
                "a {}x{} board does not fit in a {}x{} terminal",
                board.width(),
                board.height(),
                cols,
                rows
            );
        }

        Ok(game)
    }

    fn game_over(&mut self, game: &Game) -> Result<Control> {
        for &pos in game.snake().body() {
            self.draw_cell(game, pos, DEAD_SNAKE_CHAR)?;
        }

        let score_line = format!("Score: {}", game.status().score);
        self.term.show_message(&[
            "Game over!",
            &score_line,
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(if is_quit(&key) { Control::Quit } else { Control::Continue })
    }

    fn draw_board(&mut self, game: &Game) -> Result<()> {
        for index in 0..game.board().len() {
            self.draw_cell(game, index, cell_char(game, index))?;
        }
        self.draw_score(game)?;
        self.term.flush()?;
        Ok(())
    }

    fn draw_update(&mut self, game: &Game, mov: &MoveResult) -> Result<()> {
        if let MoveResult::Moved { new_head, old_head, old_tail, ate } = *mov {
            for pos in old_tail.into_iter().chain([old_head, new_head].iter().copied()) {
                self.draw_cell(game, pos, cell_char(game, pos))?;
            }

            if ate {
                // The new food could be anywhere
                self.draw_board(game)?;
            } else {
                self.term.flush()?;
            }
        }
        Ok(())
    }

    fn draw_cell(&mut self, game: &Game, index: usize, ch: char) -> Result<()> {
        let (row, col) = game.board().coords_of(index);
        self.term.print_at((col as u16, row as u16), ch)?;
        Ok(())
    }

    fn draw_score(&mut self, game: &Game) -> Result<()> {
        let line = format!("Score: {}", game.status().score);
        self.term.print_str_at((0, game.board().height() as u16), &line)?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

fn cell_char(game: &Game, index: usize) -> char {
    match game.board().get(index) {
        CellFlag::Plain => ' ',
        CellFlag::Wall => WALL_CHAR,
        CellFlag::Food => FOOD_CHAR,
        CellFlag::Snake if index == game.snake().head() => game.snake().head_char(),
        CellFlag::Snake => SNAKE_BODY_CHAR,
    }
}

/// Reversals are legal for a lone head but only stall a longer snake.
fn is_reversal(game: &Game, dir: Direction) -> bool {
    game.snake().len() > 1 && game.snake().get_direction().is_opposite(dir)
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev.code, KeyCode::Char('q'))
        || (ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL))
}
