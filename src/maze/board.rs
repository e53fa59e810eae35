//! The maze board: an N×N grid of pieces plus a reserve array.
//!
//! ## Pinned cells
//!
//! The four corners hold Corner pieces facing inward and the center holds
//! the Chest. No operation moves or rotates them: rotation is a no-op there,
//! and the rows and columns through them are never shiftable.
//!
//! ## Line shifts
//!
//! Shifting a row or column works like a conveyor. The piece leaving the
//! far edge goes into a reserve slot, every other piece moves one cell, and
//! the reserve piece that was in that slot enters at the near edge. Pawns
//! on the line ride along.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::config::{BoardConfig, PINNED_CELLS};
use crate::core::error::ConfigError;
use crate::core::geometry::{Direction, Position, Turn};
use crate::core::player::{Player, PlayerId};
use crate::core::rng::SimRng;
use crate::record::{CounterKind, DataCollector, MoveDirection, MoveKind, MoveRecord, MoveTarget};

use super::piece::{Piece, Shape};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    /// Row-major: `grid[y * size + x]`.
    grid: Vec<Piece>,
    reserves: Vec<Piece>,
}

impl Board {
    /// Build a shuffled board from a validated config.
    ///
    /// Free cells get a random shape from the multiset and a random
    /// orientation; the leftover shapes fill the reserves at orientation 0.
    pub fn new(config: &BoardConfig, rng: &mut SimRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = config.size;
        let pieces = config.pieces;
        let mut shapes: Vec<Shape> = std::iter::repeat(Shape::Straight)
            .take(pieces.straight)
            .chain(std::iter::repeat(Shape::Corner).take(pieces.corner))
            .chain(std::iter::repeat(Shape::TSplit).take(pieces.tsplit))
            .collect();
        rng.shuffle(&mut shapes);

        let reserve_shapes = shapes.split_off(size * size - PINNED_CELLS);

        let mut grid = vec![Piece::new(Shape::Straight, 0); size * size];
        let mut free_cells = Vec::with_capacity(shapes.len());
        for (i, cell) in grid.iter_mut().enumerate() {
            match pinned_piece(size, cell_position(size, i)) {
                Some(pinned) => *cell = pinned,
                None => free_cells.push(i),
            }
        }
        for (i, shape) in free_cells.into_iter().zip(shapes) {
            grid[i] = Piece::new(shape, rng.gen_range(0..4));
        }

        let reserves = reserve_shapes.into_iter().map(|shape| Piece::new(shape, 0)).collect();

        Ok(Self { size, grid, reserves })
    }

    /// Build a board from explicit pieces, e.g. for scripted scenarios.
    ///
    /// `grid` is row-major. Whatever is given for the pinned cells is
    /// replaced by the pinned pieces.
    pub fn from_parts(size: usize, mut grid: Vec<Piece>, reserves: Vec<Piece>) -> Result<Self, ConfigError> {
        if size % 2 == 0 {
            return Err(ConfigError::EvenBoardSize(size));
        }
        if size < 5 {
            return Err(ConfigError::BoardTooSmall(size));
        }
        if reserves.is_empty() {
            return Err(ConfigError::NoReserves);
        }
        if grid.len() != size * size {
            return Err(ConfigError::PieceCountMismatch {
                expected: size * size,
                actual: grid.len(),
            });
        }
        for (i, cell) in grid.iter_mut().enumerate() {
            if let Some(pinned) = pinned_piece(size, cell_position(size, i)) {
                *cell = pinned;
            }
        }
        Ok(Self { size, grid, reserves })
    }

    /// A board whose free cells all hold `fill`, with `reserves` copies of
    /// `fill` at orientation 0 in reserve.
    pub fn uniform(size: usize, reserves: usize, fill: Piece) -> Result<Self, ConfigError> {
        let mut reserve = fill;
        reserve.set_orientation(0);
        Self::from_parts(size, vec![fill; size * size], vec![reserve; reserves])
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The chest cell.
    #[must_use]
    pub fn center(&self) -> Position {
        let c = (self.size / 2) as i32;
        Position::new(c, c)
    }

    #[must_use]
    pub fn reserves(&self) -> &[Piece] {
        &self.reserves
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    #[must_use]
    pub fn piece(&self, pos: Position) -> Option<&Piece> {
        self.index(pos).map(|i| &self.grid[i])
    }

    /// Current orientation at `pos`, the snapshot a rotation probe restores.
    #[must_use]
    pub fn orientation(&self, pos: Position) -> Option<u8> {
        self.piece(pos).map(Piece::orientation)
    }

    #[must_use]
    pub fn is_pinned(&self, pos: Position) -> bool {
        self.in_bounds(pos) && pinned_piece(self.size, pos).is_some()
    }

    /// Pieces of row `y`, left to right.
    #[must_use]
    pub fn row(&self, y: usize) -> Vec<Piece> {
        self.grid[y * self.size..(y + 1) * self.size].to_vec()
    }

    /// Pieces of column `x`, top to bottom.
    #[must_use]
    pub fn column(&self, x: usize) -> Vec<Piece> {
        (0..self.size).map(|y| self.grid[y * self.size + x]).collect()
    }

    /// Whether a pawn at `pos` can step toward `dir`.
    ///
    /// The destination must be on the board, the source piece must open
    /// toward `dir` and the destination piece toward the opposite side.
    #[must_use]
    pub fn can_player_move(&self, pos: Position, dir: Direction) -> bool {
        let dest = pos.step(dir);
        match (self.piece(pos), self.piece(dest)) {
            (Some(from), Some(to)) => from.can_exit(dir) && to.can_exit(dir.opposite()),
            _ => false,
        }
    }

    /// Whether the piece at `pos` opens toward `dir`, ignoring the
    /// neighbour. Used to judge a step across a shift not yet made.
    #[must_use]
    pub fn can_player_exit(&self, pos: Position, dir: Direction) -> bool {
        self.piece(pos).is_some_and(|piece| piece.can_exit(dir))
    }

    /// A line is shiftable unless it is a boundary or the center line.
    #[must_use]
    pub fn can_shift_line(&self, index: usize) -> bool {
        index != 0 && index != self.size - 1 && index != self.size / 2 && index < self.size
    }

    /// Whether `pos` lies on the line a shift toward `dir` moves.
    #[must_use]
    pub fn on_line(&self, pos: Position, index: usize, dir: Direction) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let coord = if dir.is_horizontal() { pos.y } else { pos.x };
        coord == index as i32
    }

    /// Where a pawn at `pos` ends up after shifting line `index` toward `dir`.
    ///
    /// Pawns on the line move one cell. A pawn on the ejected far-edge cell
    /// stays on that edge cell.
    #[must_use]
    pub fn shifted_position(&self, pos: Position, index: usize, dir: Direction) -> Position {
        if !self.on_line(pos, index, dir) {
            return pos;
        }
        let dest = pos.step(dir);
        if self.in_bounds(dest) {
            dest
        } else {
            pos
        }
    }

    /// Shift with a randomly drawn reserve slot and entry orientation.
    ///
    /// Returns false, changing nothing, if the line is not shiftable.
    pub fn shift_line(
        &mut self,
        index: usize,
        dir: Direction,
        players: &mut [Player],
        log: &mut dyn DataCollector,
        rng: &mut SimRng,
    ) -> bool {
        if !self.can_shift_line(index) {
            return false;
        }
        let reserve = rng.gen_range_usize(0..self.reserves.len());
        let orientation = rng.gen_range(0..4) as u8;
        self.shift_line_with(index, dir, reserve, orientation, players, log)
    }

    /// Shift line `index` one cell toward `dir`.
    ///
    /// The piece pushed off the far edge goes to `reserves[reserve]` at
    /// orientation 0; the piece previously there enters the near edge at
    /// `orientation`. Pawns on the line are carried along. Returns false,
    /// changing nothing, if the line is not shiftable or the slot is invalid.
    pub fn shift_line_with(
        &mut self,
        index: usize,
        dir: Direction,
        reserve: usize,
        orientation: u8,
        players: &mut [Player],
        log: &mut dyn DataCollector,
    ) -> bool {
        if !self.can_shift_line(index) || reserve >= self.reserves.len() {
            return false;
        }

        let line = self.line_cells(index, dir);
        let exit = line[line.len() - 1];

        let mut displaced: SmallVec<[PlayerId; 4]> = SmallVec::new();
        for player in players.iter_mut() {
            let pos = player.position;
            if self.on_line(pos, index, dir) && self.index(pos) != Some(exit) {
                player.carry(dir);
                displaced.push(player.id);
            }
        }

        let mut ejected = self.grid[exit];
        for w in (1..line.len()).rev() {
            self.grid[line[w]] = self.grid[line[w - 1]];
        }
        let mut incoming = self.reserves[reserve];
        incoming.set_orientation(orientation as i32);
        self.grid[line[0]] = incoming;
        ejected.set_orientation(0);
        self.reserves[reserve] = ejected;

        log.increment_move_data(CounterKind::HallShifted);
        if log.is_receiving_data() {
            log.send_move_data(MoveRecord {
                kind: MoveKind::HallShifted,
                target: MoveTarget::Line {
                    index,
                    reserve,
                    orientation: incoming.orientation(),
                    displaced,
                },
                direction: MoveDirection::Step(dir),
            });
        }
        true
    }

    /// Rotate the piece at `pos` by `count` steps.
    ///
    /// No-op on pinned cells. A single non-undo step appends one rotation
    /// record; a double step replaces the previous record (the net effect of
    /// "rotate, then rotate back past it"); an undo removes the previous
    /// record instead of adding one.
    pub fn rotate(&mut self, pos: Position, turn: Turn, count: u8, undo: bool, log: &mut dyn DataCollector) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        if self.is_pinned(pos) {
            return false;
        }
        self.grid[i].rotate(turn, count);

        let record = || MoveRecord {
            kind: MoveKind::BlockRotated,
            target: MoveTarget::Cell(pos),
            direction: MoveDirection::Turn(turn),
        };
        if undo {
            if log.is_receiving_data() {
                log.remove_last_move();
            }
            log.increment_move_data(CounterKind::BlockRotationUndone);
        } else if count == 1 {
            log.increment_move_data(CounterKind::BlockRotated);
            if log.is_receiving_data() {
                log.send_move_data(record());
            }
        } else if count == 2 && log.is_receiving_data() {
            log.remove_last_move();
            log.send_move_data(record());
        }
        true
    }

    /// Put back an orientation snapshot taken before a failed probe, and
    /// withdraw the probe's rotation record.
    pub fn restore_orientation(&mut self, pos: Position, snapshot: u8, log: &mut dyn DataCollector) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        if self.is_pinned(pos) {
            return false;
        }
        self.grid[i].set_orientation(snapshot as i32);
        if log.is_receiving_data() {
            log.remove_last_move();
        }
        log.increment_move_data(CounterKind::BlockRotationUndone);
        true
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.y as usize * self.size + pos.x as usize)
    }

    /// Grid indices of a line ordered along `dir`: entry edge first.
    fn line_cells(&self, index: usize, dir: Direction) -> Vec<usize> {
        let n = self.size;
        let cell = |along: usize| {
            if dir.is_horizontal() {
                index * n + along
            } else {
                along * n + index
            }
        };
        match dir {
            Direction::Right | Direction::Down => (0..n).map(cell).collect(),
            Direction::Left | Direction::Up => (0..n).rev().map(cell).collect(),
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.grid.chunks(self.size) {
            for piece in row {
                write!(f, "{}", piece)?;
            }
            writeln!(f)?;
        }
        write!(f, "reserves:")?;
        for piece in &self.reserves {
            write!(f, " {}", piece)?;
        }
        writeln!(f)
    }
}

fn cell_position(size: usize, i: usize) -> Position {
    Position::new((i % size) as i32, (i / size) as i32)
}

/// The fixed piece for a pinned cell, or `None` for a free cell.
fn pinned_piece(size: usize, pos: Position) -> Option<Piece> {
    let far = size as i32 - 1;
    let center = (size / 2) as i32;
    match (pos.x, pos.y) {
        (0, 0) => Some(Piece::new(Shape::Corner, 1)),
        (x, 0) if x == far => Some(Piece::new(Shape::Corner, 2)),
        (x, y) if x == far && y == far => Some(Piece::new(Shape::Corner, 3)),
        (0, y) if y == far => Some(Piece::new(Shape::Corner, 0)),
        (x, y) if x == center && y == center => Some(Piece::new(Shape::Chest, 0)),
        _ => None,
    }
}
