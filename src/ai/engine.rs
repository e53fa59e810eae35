//! Per-turn move selection.
//!
//! A turn starts with a question. A wrong answer allows only a weak move:
//! one rotation next to the pawn. A right answer runs the selection below,
//! stopping at the first stage that acts:
//!
//! 1. Threat check: counter any opponent within the threat radius of the
//!    chest, then take a plain step if one is open.
//! 2. Shared cell: when an opponent stands on the pawn's cell, try to step
//!    away toward the chest, probing rotations if needed.
//! 3. General search over [`Tier::ORDER`].
//! 4. Counter the nearest opponent.
//! 5. Turn the pawn's own cell.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, GameState, PlayerId, Turn};

use super::counter::{counter_any, counter_preserving, counter_target, rank_opponents};
use super::probe::{rotate_adjacent, try_open_step, try_rotate_adjacent, try_rotate_self};

/// One pass of the general search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Advance only. Never shifts a line to obstruct.
    Safe,
    /// Counters before a direct step and opens one with rotations when
    /// none is open. Otherwise shifts lines for position alone, and rotates
    /// next to the pawn as a last resort.
    Aggressive,
}

impl Tier {
    /// Search order.
    pub const ORDER: [Tier; 2] = [Tier::Safe, Tier::Aggressive];
}

/// The stage of move selection that acted this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Wrong answer: adjacent rotation only.
    Weak,
    /// Countered an opponent close to the chest.
    Threat(PlayerId),
    /// Stepped off a cell shared with an opponent.
    SharedCell,
    Search(Tier),
    /// Obstructed the nearest opponent.
    Counter,
    /// Turned the pawn's own cell.
    Fallback,
    /// Nothing could be done.
    Idle,
}

/// Scripted opponent AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEngine {
    /// Opponents this close to the chest are countered first.
    pub threat_radius: u32,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self { threat_radius: 2 }
    }
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threat_radius(mut self, radius: u32) -> Self {
        self.threat_radius = radius;
        self
    }

    /// Play one turn for `player`. Returns true iff the pawn now stands on
    /// the chest.
    pub fn execute_next_move(&self, state: &mut GameState, player: PlayerId, answer_chance: u8) -> bool {
        self.play_turn(state, player, answer_chance);
        state.has_won(player)
    }

    /// Play one turn and report which stage acted.
    pub fn play_turn(&self, state: &mut GameState, player: PlayerId, answer_chance: u8) -> Stage {
        let correct = state.rng.roll_percent(answer_chance);
        state.record_answer(player, correct);

        let stage = if correct {
            self.select_move(state, player)
        } else {
            rotate_adjacent(state, player);
            Stage::Weak
        };
        log::trace!("{} turn {}: {:?}", player, state.turn_number, stage);
        stage
    }

    /// Move selection after a correct answer.
    pub fn select_move(&self, state: &mut GameState, player: PlayerId) -> Stage {
        if state.has_won(player) {
            return Stage::Idle;
        }

        let here = state.position(player);
        let threats: Vec<PlayerId> = state
            .player_ids()
            .filter(|&id| id != player && state.player_distance(id) <= self.threat_radius)
            .collect();
        for opponent in threats {
            if state.position(opponent) != here && counter_target(state, player, opponent) {
                only_move(state, player);
                return Stage::Threat(opponent);
            }
        }

        let here = state.position(player);
        let shared = state.player_ids().any(|id| id != player && state.position(id) == here);
        if shared && advance_directly(state, player, false) {
            return Stage::SharedCell;
        }

        for tier in Tier::ORDER {
            if self.run_tier(state, player, tier) {
                return Stage::Search(tier);
            }
        }

        if counter_any(state, player) {
            return Stage::Counter;
        }
        if state.rotate(state.position(player), Turn::Right) {
            return Stage::Fallback;
        }
        Stage::Idle
    }

    /// Run one tier of the general search. Returns whether it acted.
    pub fn run_tier(&self, state: &mut GameState, player: PlayerId, tier: Tier) -> bool {
        let before = state.action_count();
        let (dx, dy) = state.offset_to_chest(player);

        if (dx, dy) == (0, 0) {
            return false;
        }
        if tier == Tier::Aggressive && advance_directly(state, player, true) {
            return true;
        }

        match (dx.unsigned_abs(), dy.unsigned_abs()) {
            (_, 0) | (0, _) => aligned(state, player),
            (1, 1) => diagonal(state, player),
            _ => far(state, player, tier),
        }
        state.action_count() != before
    }
}

/// Directions toward the chest, x axis first.
fn toward_chest(state: &GameState, player: PlayerId) -> [Option<Direction>; 2] {
    let (dx, dy) = state.offset_to_chest(player);
    [Direction::toward_x(dx), Direction::toward_y(dy)]
}

/// Take the first open step toward the chest.
fn only_move(state: &mut GameState, player: PlayerId) -> bool {
    toward_chest(state, player)
        .into_iter()
        .flatten()
        .any(|dir| state.step(player, dir))
}

/// Step toward the chest, probing the own cell and then the neighbour to
/// open a step when none is open. Turning both cells is the last resort.
///
/// With `counter` set, an open step is preceded by a shift against the
/// nearest opponent that keeps the step open.
fn advance_directly(state: &mut GameState, player: PlayerId, counter: bool) -> bool {
    let dirs = toward_chest(state, player);
    if let Some(dir) = dirs.into_iter().flatten().find(|&dir| state.can_move(player, dir)) {
        let countered = counter && counter_preserving(state, player, dir);
        return state.step(player, dir) || countered;
    }
    let single = dirs.into_iter().flatten().any(|dir| {
        (try_rotate_self(state, player, dir, Turn::Left) || try_rotate_adjacent(state, player, dir))
            && state.step(player, dir)
    });
    single
        || dirs
            .into_iter()
            .flatten()
            .any(|dir| try_open_step(state, player, dir) && state.step(player, dir))
}

/// Pawn shares a row or column with the chest.
fn aligned(state: &mut GameState, player: PlayerId) {
    let Some(dir) = toward_chest(state, player).into_iter().flatten().next() else {
        return;
    };

    if state.step(player, dir) {
        return;
    }
    if try_rotate_self(state, player, dir, Turn::Right) {
        state.step(player, dir);
        return;
    }
    if rotate_adjacent(state, player) {
        state.step(player, dir);
    }
}

/// Pawn is diagonally next to the chest, so the lines through it are never
/// pinned. Shift one of them to bring the pawn level with the chest and
/// step in.
fn diagonal(state: &mut GameState, player: PlayerId) {
    let [Some(xdir), Some(ydir)] = toward_chest(state, player) else {
        return;
    };
    let pos = state.position(player);
    let (column, row) = (pos.x as usize, pos.y as usize);

    // Column along y, then step x; or row along x, then step y.
    let via_column = state.can_exit(player, xdir);
    let via_row = state.can_exit(player, ydir);
    let use_row = match (via_column, via_row) {
        (true, true) => row_shift_hurts_more(state, player, (row, xdir), (column, ydir)),
        (false, true) => true,
        _ => false,
    };

    if use_row {
        state.shift(row, xdir);
        state.step(player, ydir);
    } else {
        state.shift(column, ydir);
        if via_column {
            state.step(player, xdir);
        }
    }
}

/// Whether the row option leaves the nearest opponent farther from the
/// chest than the column option.
fn row_shift_hurts_more(
    state: &GameState,
    player: PlayerId,
    (row, row_dir): (usize, Direction),
    (column, column_dir): (usize, Direction),
) -> bool {
    let Some(&(nearest, _)) = rank_opponents(state, player).first() else {
        return false;
    };
    let pos = state.position(nearest);
    let after = |index, dir| state.distance_to_chest(state.board.shifted_position(pos, index, dir));
    after(row, row_dir) > after(column, column_dir)
}

/// Pawn is two or more cells from the chest on some axis.
fn far(state: &mut GameState, player: PlayerId, tier: Tier) {
    let (dx, dy) = state.offset_to_chest(player);
    let (Some(xdir), Some(ydir)) = (Direction::toward_x(dx), Direction::toward_y(dy)) else {
        return;
    };
    let pos = state.position(player);
    // (step direction, remaining distance, the pawn's line along it)
    let axes = [
        (xdir, dx.unsigned_abs(), pos.y as usize),
        (ydir, dy.unsigned_abs(), pos.x as usize),
    ];

    // Ride the own line one cell, then step: two cells of progress.
    for (dir, distance, line) in axes {
        if distance > 1 && try_shift_and_step(state, player, line, dir) {
            return;
        }
    }
    if tier == Tier::Safe {
        return;
    }

    for (dir, distance, line) in axes {
        if distance > 1 && state.board.can_shift_line(line) {
            state.shift(line, dir);
            return;
        }
    }
    rotate_adjacent(state, player);
}

fn try_shift_and_step(state: &mut GameState, player: PlayerId, line: usize, dir: Direction) -> bool {
    if !state.board.can_shift_line(line) || !state.can_move(player, dir) {
        return false;
    }
    state.shift(line, dir);
    state.step(player, dir);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PawnColor, Player, Position, SimRng};
    use crate::maze::{Board, Piece, Shape};
    use crate::record::{GameLog, MoveKind};

    fn state_with(board: Board, positions: &[(i32, i32)]) -> GameState {
        let players = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                Player::new(PlayerId::new(i as u8), format!("P{}", i), PawnColor::default_for(i), Position::new(x, y))
            })
            .collect();
        GameState::from_parts(board, players, GameLog::recording(), SimRng::new(8))
    }

    fn chests() -> Board {
        // Cross pieces everywhere: every step is open.
        Board::uniform(7, 2, Piece::new(Shape::Chest, 0)).unwrap()
    }

    fn tsplits() -> Board {
        Board::uniform(7, 2, Piece::new(Shape::TSplit, 0)).unwrap()
    }

    #[test]
    fn test_wrong_answer_never_moves_pawn() {
        let mut state = state_with(chests(), &[(3, 1)]);
        let engine = DecisionEngine::new();
        let id = PlayerId::new(0);

        assert_eq!(engine.play_turn(&mut state, id, 0), Stage::Weak);
        assert_eq!(state.position(id), Position::new(3, 1));
        assert_eq!(state.answers[id].incorrect, 1);
    }

    #[test]
    fn test_aligned_steps_toward_chest() {
        let mut state = state_with(chests(), &[(3, 1)]);
        let id = PlayerId::new(0);
        assert_eq!(DecisionEngine::new().select_move(&mut state, id), Stage::Search(Tier::Safe));
        assert_eq!(state.position(id), Position::new(3, 2));
    }

    #[test]
    fn test_aligned_probes_own_cell() {
        // TSplit 0 does not open right; turning it once does.
        let mut state = state_with(tsplits(), &[(1, 3)]);
        let id = PlayerId::new(0);
        state.board.rotate(Position::new(2, 3), Turn::Right, 1, false, &mut GameLog::counting());

        assert!(DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
        assert_eq!(state.position(id), Position::new(2, 3));
        assert_eq!(state.log.counters().blocks_rotated, 1);
        assert_eq!(state.log.counters().pawns_moved, 1);
    }

    #[test]
    fn test_diagonal_reaches_chest() {
        for (x, y) in [(2, 2), (4, 2), (4, 4), (2, 4)] {
            let mut state = state_with(chests(), &[(x, y)]);
            let id = PlayerId::new(0);
            assert!(DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
            assert!(state.has_won(id), "from {},{}", x, y);
            assert_eq!(state.log.counters().rows_shifted, 1);
        }
    }

    #[test]
    fn test_diagonal_uses_row_for_vertical_exit() {
        let mut state = state_with(Board::uniform(7, 1, Piece::new(Shape::Straight, 0)).unwrap(), &[(2, 2)]);
        let id = PlayerId::new(0);
        assert!(!state.can_exit(id, Direction::Right));

        assert!(DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
        // Row 2 shifted right carried the pawn to (3,2), then it stepped down.
        assert!(state.has_won(id));
    }

    #[test]
    fn test_diagonal_without_exits_shifts_column() {
        // Corner 3 opens up and left: away from the chest on both axes.
        let mut grid = vec![Piece::new(Shape::Straight, 1); 49];
        grid[2 * 7 + 2] = Piece::new(Shape::Corner, 3);
        let board = Board::from_parts(7, grid, vec![Piece::new(Shape::Straight, 0)]).unwrap();
        let mut state = state_with(board, &[(2, 2)]);
        let id = PlayerId::new(0);

        assert!(DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
        assert_eq!(state.position(id), Position::new(2, 3));
        assert_eq!(state.log.counters().rows_shifted, 1);
        assert_eq!(state.log.counters().pawns_moved, 0);
    }

    #[test]
    fn test_far_rides_own_line() {
        let mut state = state_with(chests(), &[(0, 1)]);
        let id = PlayerId::new(0);
        // dx = 3: shift row 1 right, then step right.
        assert!(DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
        assert_eq!(state.position(id), Position::new(2, 1));
        let kinds: Vec<MoveKind> = state.log.moves().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MoveKind::HallShifted, MoveKind::PawnMoved]);
    }

    #[test]
    fn test_safe_tier_gives_up_without_shift_and_step() {
        // Corner cell: row 0 and column 0 are pinned lines.
        let mut state = state_with(chests(), &[(0, 0)]);
        let id = PlayerId::new(0);
        assert!(!DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
        assert_eq!(state.action_count(), 0);

        // The aggressive tier simply steps.
        assert!(DecisionEngine::new().run_tier(&mut state, id, Tier::Aggressive));
        assert_eq!(state.position(id), Position::new(1, 0));
    }

    #[test]
    fn test_aggressive_opens_step_before_shifting() {
        // Own cell opens up and left only. Both neighbours toward the chest
        // face away, so neither cell alone can be turned to connect.
        let mut grid = vec![Piece::new(Shape::Straight, 0); 49];
        grid[7 + 1] = Piece::new(Shape::Corner, 3);
        grid[2 * 7 + 1] = Piece::new(Shape::Straight, 1);
        let board = Board::from_parts(7, grid, vec![Piece::new(Shape::Straight, 0)]).unwrap();
        let mut state = state_with(board, &[(1, 1)]);
        let id = PlayerId::new(0);

        assert!(!DecisionEngine::new().run_tier(&mut state, id, Tier::Safe));
        assert_eq!(DecisionEngine::new().select_move(&mut state, id), Stage::Search(Tier::Aggressive));
        assert_eq!(state.position(id), Position::new(2, 1));
        assert_eq!(state.log.counters().rows_shifted, 0);
        assert_eq!(state.log.counters().blocks_rotated, 2);
        assert_eq!(state.log.counters().pawns_moved, 1);
    }

    #[test]
    fn test_aggressive_counters_before_open_step() {
        // The runner sits in row 2, which the actor does not use.
        let mut state = state_with(chests(), &[(0, 1), (2, 2)]);
        let actor = PlayerId::new(0);
        let runner = PlayerId::new(1);
        let before = state.player_distance(runner);

        assert!(DecisionEngine::new().run_tier(&mut state, actor, Tier::Aggressive));
        assert_eq!(state.position(actor), Position::new(1, 1));
        assert!(state.player_distance(runner) > before);
    }

    #[test]
    fn test_threat_is_countered_first() {
        // Opponent two cells above the chest in a shiftable row.
        let mut state = state_with(chests(), &[(0, 0), (2, 2)]);
        let actor = PlayerId::new(0);
        let threat = PlayerId::new(1);
        let before = state.player_distance(threat);

        assert_eq!(DecisionEngine::new().select_move(&mut state, actor), Stage::Threat(threat));
        assert!(state.player_distance(threat) > before);
        assert_eq!(state.position(actor), Position::new(1, 0));
    }

    #[test]
    fn test_shared_cell_steps_away() {
        let mut state = state_with(chests(), &[(0, 0), (0, 0)]);
        let actor = PlayerId::new(0);
        assert_eq!(DecisionEngine::new().select_move(&mut state, actor), Stage::SharedCell);
        assert_eq!(state.position(actor), Position::new(1, 0));
        assert_eq!(state.position(PlayerId::new(1)), Position::new(0, 0));
    }

    #[test]
    fn test_execute_returns_true_on_arrival() {
        let mut state = state_with(chests(), &[(3, 2)]);
        let id = PlayerId::new(0);
        assert!(DecisionEngine::new().execute_next_move(&mut state, id, 100));
        assert_eq!(state.answers[id].correct, 1);
    }
}
