use std::collections::{vec_deque, VecDeque};

/// Cell indices occupied by the snake, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    cells: VecDeque<usize>,
}

impl Body {
    pub fn new(head: usize) -> Self {
        let mut cells = VecDeque::new();
        cells.push_back(head);
        Body { cells }
    }

    pub fn head(&self) -> usize {
        self.cells[0]
    }

    /// Tail segment (the head itself for a single-cell snake).
    pub fn last(&self) -> usize {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn push_front(&mut self, index: usize) {
        self.cells.push_front(index);
    }

    /// Drops the tail and returns the freed index. Never empties the body.
    pub fn pop_back(&mut self) -> Option<usize> {
        if self.cells.len() > 1 {
            self.cells.pop_back()
        } else {
            None
        }
    }

    /// Moves the head in place without touching the rest of the body.
    pub fn replace_head(&mut self, index: usize) -> usize {
        std::mem::replace(&mut self.cells[0], index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, usize> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Body {
    type Item = &'a usize;
    type IntoIter = vec_deque::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
