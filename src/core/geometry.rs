//! Board geometry: cardinal directions, rotation turns and grid positions.
//!
//! Directions are indexed clockwise starting at `Up`, which is the index
//! space piece orientations live in. The y axis grows downward.

use serde::{Deserialize, Serialize};

/// A cardinal direction on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in clockwise index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Direction for an arbitrary index, wrapping in both directions.
    #[must_use]
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// Clockwise index (0-3).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() as i32 + 2)
    }

    /// Unit offset `(dx, dy)` of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// True for `Left` and `Right`, which shift rows rather than columns.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Horizontal direction toward a signed x offset, `None` when zero.
    #[must_use]
    pub fn toward_x(dx: i32) -> Option<Self> {
        match dx.signum() {
            1 => Some(Direction::Right),
            -1 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Vertical direction toward a signed y offset, `None` when zero.
    #[must_use]
    pub fn toward_y(dy: i32) -> Option<Self> {
        match dy.signum() {
            1 => Some(Direction::Down),
            -1 => Some(Direction::Up),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        };
        f.write_str(name)
    }
}

/// Rotation sense for a piece. `Right` is clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Left,
        }
    }

    /// Signed orientation delta of a single step.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Turn::Left => -1,
            Turn::Right => 1,
        }
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Turn::Left => "Left",
            Turn::Right => "Right",
        })
    }
}

/// A grid cell. `x` is the column, `y` the row; (0, 0) is top-left.
///
/// Coordinates are signed so offsets and out-of-bounds neighbours can be
/// expressed directly; the board decides what is in bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir`.
    #[must_use]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Signed offset from `self` to `other`.
    #[must_use]
    pub fn offset_to(self, other: Position) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_index_wraps() {
        assert_eq!(Direction::from_index(0), Direction::Up);
        assert_eq!(Direction::from_index(5), Direction::Right);
        assert_eq!(Direction::from_index(-1), Direction::Left);
        assert_eq!(Direction::from_index(-6), Direction::Down);
    }

    #[test]
    fn test_opposite() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_step_and_offsets() {
        let pos = Position::new(2, 2);
        assert_eq!(pos.step(Direction::Up), Position::new(2, 1));
        assert_eq!(pos.step(Direction::Right), Position::new(3, 2));
        assert_eq!(pos.step(Direction::Down), Position::new(2, 3));
        assert_eq!(pos.step(Direction::Left), Position::new(1, 2));
    }

    #[test]
    fn test_toward() {
        assert_eq!(Direction::toward_x(3), Some(Direction::Right));
        assert_eq!(Direction::toward_x(-1), Some(Direction::Left));
        assert_eq!(Direction::toward_x(0), None);
        assert_eq!(Direction::toward_y(2), Some(Direction::Down));
        assert_eq!(Direction::toward_y(-4), Some(Direction::Up));
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.distance(b), 7);
        assert_eq!(b.distance(a), 7);
        assert_eq!(a.offset_to(b), (3, 4));
    }

    #[test]
    fn test_turn_reverse() {
        assert_eq!(Turn::Left.reverse(), Turn::Right);
        assert_eq!(Turn::Right.delta(), 1);
        assert_eq!(Turn::Left.delta(), -1);
    }
}
