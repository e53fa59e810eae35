//! Maze pieces.
//!
//! A piece is a shape plus an orientation in `[0, 3]`. Openings are derived
//! from the pair on demand and never stored.

use serde::{Deserialize, Serialize};

use crate::core::geometry::{Direction, Turn};

/// Piece shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    /// Two openings, 180° apart.
    Straight,
    /// Two adjacent openings.
    Corner,
    /// Three openings; the missing side is `orientation + 1`.
    TSplit,
    /// The target. Open on every side.
    Chest,
}

/// A single maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    shape: Shape,
    orientation: u8,
}

impl Piece {
    /// Create a piece. Any orientation is accepted and normalized.
    #[must_use]
    pub fn new(shape: Shape, orientation: i32) -> Self {
        Self {
            shape,
            orientation: normalize(orientation),
        }
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Orientation in `[0, 3]`.
    #[must_use]
    pub const fn orientation(&self) -> u8 {
        self.orientation
    }

    /// Set the orientation, wrapping into `[0, 3]` in both directions.
    pub fn set_orientation(&mut self, orientation: i32) {
        self.orientation = normalize(orientation);
    }

    /// Rotate by `count` steps; `Left` decrements, `Right` increments.
    pub fn rotate(&mut self, turn: Turn, count: u8) {
        self.set_orientation(self.orientation as i32 + turn.delta() * count as i32);
    }

    /// Whether a pawn on this piece has an opening toward `dir`.
    #[must_use]
    pub fn can_exit(&self, dir: Direction) -> bool {
        let rel = (dir.index() + 4 - self.orientation) % 4;
        match self.shape {
            Shape::Straight => rel == 0 || rel == 2,
            Shape::Corner => rel == 0 || rel == 1,
            Shape::TSplit => rel != 1,
            Shape::Chest => true,
        }
    }

    /// All directions this piece opens toward.
    pub fn openings(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|dir| self.can_exit(*dir))
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Box-drawing glyph for the piece's openings.
        let mask = Direction::ALL
            .iter()
            .enumerate()
            .filter(|(_, dir)| self.can_exit(**dir))
            .fold(0u8, |acc, (i, _)| acc | (1 << i));
        let glyph = match (self.shape, mask) {
            (Shape::Chest, _) => '◆',
            (_, 0b0101) => '│',
            (_, 0b1010) => '─',
            (_, 0b0011) => '└',
            (_, 0b0110) => '┌',
            (_, 0b1100) => '┐',
            (_, 0b1001) => '┘',
            (_, 0b1101) => '┤',
            (_, 0b1011) => '┴',
            (_, 0b0111) => '├',
            (_, 0b1110) => '┬',
            _ => '?',
        };
        write!(f, "{}", glyph)
    }
}

fn normalize(orientation: i32) -> u8 {
    orientation.rem_euclid(4) as u8
}
