//! Transactional rotation probes.
//!
//! A probe rotates one cell a step, tests a goal, then tries the other
//! side with a double step back. If neither orientation satisfies the goal
//! the cell's saved orientation is restored, so a failed probe has no net
//! effect on the board or the action counters.

use crate::core::{Direction, GameState, PlayerId, Position, Turn};

/// Probe `cell`, turning toward `first` before the opposite side.
///
/// Returns true and keeps the rotation if `goal` holds after either trial.
pub fn probe_rotation(
    state: &mut GameState,
    cell: Position,
    first: Turn,
    goal: impl Fn(&GameState) -> bool,
) -> bool {
    if state.board.is_pinned(cell) {
        return false;
    }
    let Some(snapshot) = state.board.orientation(cell) else {
        return false;
    };

    state.rotate(cell, first);
    if goal(&*state) {
        return true;
    }
    state.rotate_back(cell, first.reverse());
    if goal(&*state) {
        return true;
    }
    state.restore_orientation(cell, snapshot);
    false
}

/// Rotate the player's own cell until it can step toward `dir`.
pub fn try_rotate_self(state: &mut GameState, id: PlayerId, dir: Direction, first: Turn) -> bool {
    let cell = state.position(id);
    probe_rotation(state, cell, first, |s| s.can_move(id, dir))
}

/// Rotate the neighbour toward `dir` until the player can step onto it.
pub fn try_rotate_adjacent(state: &mut GameState, id: PlayerId, dir: Direction) -> bool {
    let cell = state.position(id).step(dir);
    probe_rotation(state, cell, Turn::Right, |s| s.can_move(id, dir))
}

/// Open a step toward `dir` that needs both the own cell and the neighbour
/// turned. The own cell is turned to face `dir` first, then the neighbour
/// is probed. If the neighbour cannot be matched the own cell is restored.
pub fn try_open_step(state: &mut GameState, id: PlayerId, dir: Direction) -> bool {
    let cell = state.position(id);
    if state.can_exit(id, dir) || !state.board.in_bounds(cell.step(dir)) {
        return false;
    }
    let Some(snapshot) = state.board.orientation(cell) else {
        return false;
    };
    if !probe_rotation(state, cell, Turn::Left, |s| s.can_exit(id, dir)) {
        return false;
    }
    if try_rotate_adjacent(state, id, dir) {
        return true;
    }
    state.restore_orientation(cell, snapshot);
    false
}

/// Rotate a neighbour on the way to the chest.
///
/// Probes the neighbour on each axis toward the chest (x first) and keeps a
/// rotation that opens the step. When none does, the neighbour that does
/// not face back toward the player is turned once anyway: on an aligned
/// axis unconditionally, off-axis as a second pass. Returns whether the
/// step toward the chest is now open.
pub fn rotate_adjacent(state: &mut GameState, id: PlayerId) -> bool {
    let (dx, dy) = state.offset_to_chest(id);
    let here = state.position(id);

    if dx == 0 || dy == 0 {
        let Some(dir) = Direction::toward_x(dx).or_else(|| Direction::toward_y(dy)) else {
            return false;
        };
        if try_rotate_adjacent(state, id, dir) {
            return true;
        }
        let next = here.step(dir);
        if !state.board.can_player_exit(next, dir.opposite()) {
            state.rotate(next, Turn::Right);
        }
        return false;
    }

    let dirs = [Direction::toward_x(dx), Direction::toward_y(dy)];
    for dir in dirs.into_iter().flatten() {
        if try_rotate_adjacent(state, id, dir) {
            return true;
        }
    }
    for dir in dirs.into_iter().flatten() {
        let next = here.step(dir);
        if !state.board.can_player_exit(next, dir.opposite()) && state.rotate(next, Turn::Right) {
            return state.can_move(id, dir);
        }
    }
    false
}
