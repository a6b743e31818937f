use rand::Rng;

use crate::snake::Direction;

/// Occupancy of a single board square.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellFlag {
    Plain,
    Wall,
    Snake,
    Food,
}

/// A fixed-size grid of cells, addressed by `row * width + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<CellFlag>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Board::from_cells(width, height, vec![CellFlag::Plain; width * height])
    }

    /// Wraps an already filled buffer. `cells.len()` must be `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellFlag>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Board { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[CellFlag] {
        &self.cells
    }

    /// Flag at `index`; anything off the board reads as a wall.
    pub fn get(&self, index: usize) -> CellFlag {
        self.cells.get(index).copied().unwrap_or(CellFlag::Wall)
    }

    pub fn set(&mut self, index: usize, flag: CellFlag) {
        self.cells[index] = flag;
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Linear index one step from `from`. Horizontal steps wrap across rows the
    /// same way the index arithmetic does; `None` when the step leaves the buffer.
    pub fn step(&self, from: usize, direction: Direction) -> Option<usize> {
        let next = from as isize + direction.offset(self.width);
        if next < 0 || next as usize >= self.cells.len() {
            None
        } else {
            Some(next as usize)
        }
    }

    /// Direction of the single step leading from `from` to `to`, if they are adjacent.
    pub fn direction_between(&self, from: usize, to: usize) -> Option<Direction> {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .iter()
            .copied()
            .find(|&dir| self.step(from, dir) == Some(to))
    }

    pub fn count(&self, flag: CellFlag) -> usize {
        self.cells.iter().filter(|&&c| c == flag).count()
    }

    /// Marks a uniformly random plain cell as food, resampling until one is hit.
    ///
    /// The caller must guarantee at least one `Plain` cell exists; otherwise this
    /// never returns.
    pub fn place_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        debug_assert!(self.cells.contains(&CellFlag::Plain), "no plain cell left for food");

        loop {
            let index = rng.gen_range(0..self.cells.len());
            if self.cells[index] == CellFlag::Plain {
                self.cells[index] = CellFlag::Food;
                return index;
            }
        }
    }
}
