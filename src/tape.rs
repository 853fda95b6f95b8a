//! The two-way infinite tape of a single-tape machine.
//!
//! The tape keeps two views of the same cells. The *logical* tape starts at the first input
//! symbol and grows by exactly one blank whenever the head moves past either end; the head
//! position is an index into it. Around the logical tape a padding buffer keeps at least
//! [`TAPE_PADDING`] materialized cells on both sides of the head, so a renderer can always
//! show a full window without the tape growing under it.

use crate::types::{Direction, TAPE_PADDING};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    // Index of the first logical cell in `cells`.
    start: usize,
    len: usize,
    head: usize,
    blank: char,
}

impl Tape {
    /// Creates a tape holding `input`, or a single blank if `input` is empty, with the head
    /// on the first cell.
    pub fn new(input: &str, blank: char) -> Self {
        let mut cells: VecDeque<char> = input.chars().collect();
        if cells.is_empty() {
            cells.push_back(blank);
        }

        let mut tape = Self {
            len: cells.len(),
            cells,
            start: 0,
            head: 0,
            blank,
        };
        tape.pad();
        tape
    }

    /// Returns the symbol under the head, or the blank if the head is outside the
    /// materialized cells.
    pub fn read(&self) -> char {
        self.cells
            .get(self.buffer_head())
            .copied()
            .unwrap_or(self.blank)
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: char) {
        let index = self.buffer_head();
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = symbol;
        }
    }

    /// Moves the head one cell, growing the logical tape by one blank when the head leaves
    /// it. Moving left off the first cell re-anchors the head at index 0.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    if self.start == 0 {
                        self.cells.push_front(self.blank);
                        self.start += 1;
                    }
                    self.start -= 1;
                    self.len += 1;
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head == self.len {
                    self.len += 1;
                    if self.start + self.len > self.cells.len() {
                        self.cells.push_back(self.blank);
                    }
                }
            }
            Direction::Stay => {}
        }
        self.pad();
    }

    /// Grows the buffer until at least [`TAPE_PADDING`] cells exist on each side of the head.
    fn pad(&mut self) {
        while self.buffer_head() < TAPE_PADDING {
            self.cells.push_front(self.blank);
            self.start += 1;
        }
        while self.cells.len() - self.buffer_head() - 1 < TAPE_PADDING {
            self.cells.push_back(self.blank);
        }
    }

    /// Returns the head position within the logical tape.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the length of the logical tape.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The logical tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    /// Returns the cells of the logical tape.
    pub fn symbols(&self) -> Vec<char> {
        self.cells
            .range(self.start..self.start + self.len)
            .copied()
            .collect()
    }

    /// Returns every materialized cell, padding included.
    pub fn buffer(&self) -> Vec<char> {
        self.cells.iter().copied().collect()
    }

    /// Returns the head position within [`Tape::buffer`].
    pub fn buffer_head(&self) -> usize {
        self.start + self.head
    }

    /// Returns up to `radius` cells on each side of the head plus the head cell, each paired
    /// with its offset from the head.
    ///
    /// A radius of 10 gives the classic 21-cell view centered on the head.
    pub fn window(&self, radius: usize) -> Vec<(isize, char)> {
        let center = self.buffer_head();
        let from = center.saturating_sub(radius);
        let to = (center + radius + 1).min(self.cells.len());

        (from..to)
            .map(|index| (index as isize - center as isize, self.cells[index]))
            .collect()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols().iter().try_for_each(|symbol| write!(f, "{}", symbol))
    }
}
