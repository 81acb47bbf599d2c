//! A bi-infinite, sparse tape shared by both machines.
//!
//! Only non-blank cells are stored. The tape also remembers the leftmost and rightmost
//! positions the head has ever touched so an unbounded structure can be rendered as a
//! finite window.

use crate::types::Direction;
use std::collections::BTreeMap;

/// A tape of symbols indexed by signed position, blank everywhere it was never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
    head: i64,
    min: i64,
    max: i64,
    blank: char,
}

impl Tape {
    /// Creates an empty tape with the head at the origin.
    pub fn new(blank: char) -> Self {
        Self {
            cells: BTreeMap::new(),
            head: 0,
            min: 0,
            max: 0,
            blank,
        }
    }

    /// Creates a tape seeded from `input`, leftmost character at position 0.
    ///
    /// The seeded span counts as visited.
    pub fn with_content(input: &str, blank: char) -> Self {
        let mut tape = Self::new(blank);
        for (position, symbol) in (0i64..).zip(input.chars()) {
            if symbol != blank {
                tape.cells.insert(position, symbol);
            }
            tape.max = position;
        }
        tape
    }

    /// Reads the symbol under the head.
    ///
    /// Widens the visited bounds but never stores a blank cell.
    pub fn read(&mut self) -> char {
        self.touch();
        self.symbol()
    }

    /// Returns the symbol under the head without touching the bounds.
    pub fn symbol(&self) -> char {
        self.get(self.head)
    }

    /// Returns the symbol at an arbitrary position.
    pub fn get(&self, position: i64) -> char {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    /// Writes `symbol` under the head. Writing the blank erases the cell.
    pub fn write(&mut self, symbol: char) {
        if symbol == self.blank {
            self.cells.remove(&self.head);
        } else {
            self.cells.insert(self.head, symbol);
        }
        self.touch();
    }

    /// Moves the head one cell, or not at all for `Direction::Stay`.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.head -= 1,
            Direction::Right => self.head += 1,
            Direction::Stay => {}
        }
        self.touch();
    }

    /// Puts the head back on the origin. Contents and bounds are kept.
    pub fn rewind(&mut self) {
        self.head = 0;
        self.touch();
    }

    /// Returns the head position. Position 0 is the first seeded cell.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the symbol absent cells read as.
    pub fn blank(&self) -> char {
        self.blank
    }

    /// Returns the lowest and highest positions ever visited.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    /// Returns true if a symbol is stored at `position`.
    pub fn is_stored(&self, position: i64) -> bool {
        self.cells.contains_key(&position)
    }

    /// Number of stored (non-blank) cells.
    pub fn stored(&self) -> usize {
        self.cells.len()
    }

    /// Renders every visited cell from the lowest to the highest bound.
    ///
    /// A fresh tape renders as a single blank because the origin is always visited.
    pub fn render(&self) -> String {
        self.window(self.min, self.max)
    }

    /// Renders the span between the leftmost and rightmost non-blank cells.
    ///
    /// Returns an empty string for a blank tape.
    pub fn contents(&self) -> String {
        match (self.cells.keys().next(), self.cells.keys().next_back()) {
            (Some(&first), Some(&last)) => self.window(first, last),
            _ => String::new(),
        }
    }

    /// Returns the position of the first character of `contents()`.
    ///
    /// The head position stands in when the tape is blank.
    pub fn contents_origin(&self) -> i64 {
        self.cells.keys().next().copied().unwrap_or(self.head)
    }

    /// Renders positions `from..=to`, substituting the blank for absent cells.
    pub fn window(&self, from: i64, to: i64) -> String {
        (from..=to).map(|position| self.get(position)).collect()
    }

    fn touch(&mut self) {
        self.min = self.min.min(self.head);
        self.max = self.max.max(self.head);
    }
}
