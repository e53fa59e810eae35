//! Counter-moves: actions chosen to delay an opponent.
//!
//! Opponents are ranked by distance to the chest, nearest first. A line
//! shift through a target's row or column is accepted only if it is
//! non-regressive: the target ends up strictly farther from the chest and
//! no other ranked opponent ends up closer. Post-shift positions come from
//! [`Board::shifted_position`](crate::maze::Board::shifted_position), so
//! pawns off the line and pawns on the ejected edge cell count as unmoved.
//!
//! When no shift qualifies, the target's own cell is probed so that none of
//! its steps toward the chest stay open.

use smallvec::SmallVec;

use crate::core::{Direction, GameState, PlayerId, Position, Turn};

use super::probe::probe_rotation;

/// Opponents of `actor` with their current distance, nearest first.
pub type Ranking = SmallVec<[(PlayerId, u32); 4]>;

/// Rank every player except `actor` by distance to the chest. Ties keep
/// seat order.
#[must_use]
pub fn rank_opponents(state: &GameState, actor: PlayerId) -> Ranking {
    let mut ranked: Ranking = state
        .player_ids()
        .filter(|&id| id != actor)
        .map(|id| (id, state.player_distance(id)))
        .collect();
    ranked.sort_by_key(|&(_, distance)| distance);
    ranked
}

/// Whether shifting `index` toward `dir` pushes `target` away without
/// helping anyone else in `ranked`.
#[must_use]
pub fn is_non_regressive(state: &GameState, target: PlayerId, ranked: &Ranking, index: usize, dir: Direction) -> bool {
    ranked.iter().all(|&(id, before)| {
        let after = state.distance_to_chest(state.board.shifted_position(state.position(id), index, dir));
        if id == target {
            after > before
        } else {
            after >= before
        }
    })
}

/// Whether the actor can still take its step toward `step` after the shift.
///
/// Rejects shifts that would carry the actor, and shifts where the piece
/// sliding onto the actor's destination would not face the actor.
#[must_use]
pub fn preserves_step(state: &GameState, actor: PlayerId, step: Direction, index: usize, dir: Direction) -> bool {
    let here = state.position(actor);
    if state.board.on_line(here, index, dir) {
        return false;
    }
    let dest = here.step(step);
    if !state.board.on_line(dest, index, dir) {
        return true;
    }
    // The destination receives its upstream neighbour, or a reserve piece
    // when it is the entry edge.
    let upstream = dest.step(dir.opposite());
    state.board.in_bounds(upstream) && state.board.can_player_exit(upstream, step.opposite())
}

/// Shift a line through `target` if a non-regressive choice exists.
///
/// Candidates: the target's row right then left, its column down then up.
/// With `preserve` set, the actor's pending step toward that direction must
/// survive the shift.
pub fn try_shift_counter(
    state: &mut GameState,
    actor: PlayerId,
    target: PlayerId,
    ranked: &Ranking,
    preserve: Option<Direction>,
) -> bool {
    let pos = state.position(target);
    let (row, column) = (pos.y as usize, pos.x as usize);
    let candidates = [
        (row, Direction::Right),
        (row, Direction::Left),
        (column, Direction::Down),
        (column, Direction::Up),
    ];

    for (index, dir) in candidates {
        if !state.board.can_shift_line(index) || !is_non_regressive(state, target, ranked, index, dir) {
            continue;
        }
        if let Some(step) = preserve {
            if !preserves_step(state, actor, step, index, dir) {
                continue;
            }
        }
        log::trace!("{} shifts line {} {} against {}", actor, index, dir, target);
        return state.shift(index, dir);
    }
    false
}

/// Rotate the target's cell so it loses every open step toward the chest.
///
/// Fails without side effects if the target has no such step, or if its
/// cell is one of `avoid` (cells the actor still relies on).
pub fn try_rotate_counter(state: &mut GameState, target: PlayerId, avoid: &[Position]) -> bool {
    let cell = state.position(target);
    if avoid.contains(&cell) {
        return false;
    }
    let (dx, dy) = state.offset_to_chest(target);
    let toward: SmallVec<[Direction; 2]> = [Direction::toward_x(dx), Direction::toward_y(dy)]
        .into_iter()
        .flatten()
        .collect();
    if !toward.iter().any(|&dir| state.can_move(target, dir)) {
        return false;
    }
    let blocked = |s: &GameState| toward.iter().all(|&dir| !s.can_move(target, dir));
    if probe_rotation(state, cell, Turn::Left, blocked) {
        log::trace!("rotated {} against {}", cell, target);
        return true;
    }
    false
}

/// Counter one specific opponent, shifting first, then rotating.
pub fn counter_target(state: &mut GameState, actor: PlayerId, target: PlayerId) -> bool {
    let ranked = rank_opponents(state, actor);
    let avoid = [state.position(actor)];
    try_shift_counter(state, actor, target, &ranked, None) || try_rotate_counter(state, target, &avoid)
}

/// Counter the nearest opponent that can be countered at all.
pub fn counter_any(state: &mut GameState, actor: PlayerId) -> bool {
    let ranked = rank_opponents(state, actor);
    let avoid = [state.position(actor)];
    ranked.iter().any(|&(target, _)| {
        try_shift_counter(state, actor, target, &ranked, None) || try_rotate_counter(state, target, &avoid)
    })
}

/// Counter the nearest opponent while keeping the actor's step toward
/// `step` open.
pub fn counter_preserving(state: &mut GameState, actor: PlayerId, step: Direction) -> bool {
    let ranked = rank_opponents(state, actor);
    let here = state.position(actor);
    let avoid = [here, here.step(step)];
    ranked.iter().any(|&(target, _)| {
        try_shift_counter(state, actor, target, &ranked, Some(step)) || try_rotate_counter(state, target, &avoid)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PawnColor, Player, SimRng};
    use crate::maze::{Board, Piece, Shape};
    use crate::record::GameLog;

    fn state_with(board: Board, positions: &[(i32, i32)]) -> GameState {
        let players = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                Player::new(PlayerId::new(i as u8), format!("P{}", i), PawnColor::default_for(i), Position::new(x, y))
            })
            .collect();
        GameState::from_parts(board, players, GameLog::recording(), SimRng::new(4))
    }

    fn tsplit_board() -> Board {
        Board::uniform(7, 2, Piece::new(Shape::TSplit, 0)).unwrap()
    }

    #[test]
    fn test_rank_opponents() {
        let state = state_with(tsplit_board(), &[(0, 0), (3, 1), (6, 6), (2, 3)]);
        let ranked = rank_opponents(&state, PlayerId::new(0));
        let ids: Vec<u8> = ranked.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(ranked[0].1, 1);
    }

    #[test]
    fn test_non_regressive_rejects_helping_others() {
        // Target at (2,1); a bystander at (1,1) on the same row.
        let state = state_with(tsplit_board(), &[(0, 0), (2, 1), (1, 1)]);
        let ranked = rank_opponents(&state, PlayerId::new(0));
        let target = PlayerId::new(1);

        // Right moves both toward the center column: rejected.
        assert!(!is_non_regressive(&state, target, &ranked, 1, Direction::Right));
        // Left pushes both away.
        assert!(is_non_regressive(&state, target, &ranked, 1, Direction::Left));
        // Up on column 2: target to the top edge, bystander untouched.
        assert!(is_non_regressive(&state, target, &ranked, 2, Direction::Up));
    }

    #[test]
    fn test_non_regressive_ignores_edge_clamp() {
        // Target on the far edge stays put, so the shift gains nothing.
        let state = state_with(tsplit_board(), &[(0, 0), (6, 1)]);
        let ranked = rank_opponents(&state, PlayerId::new(0));
        assert!(!is_non_regressive(&state, PlayerId::new(1), &ranked, 1, Direction::Right));
    }

    #[test]
    fn test_shift_counter_pushes_target_away() {
        let mut state = state_with(tsplit_board(), &[(0, 0), (2, 2)]);
        let target = PlayerId::new(1);
        let before = state.player_distance(target);

        assert!(counter_target(&mut state, PlayerId::new(0), target));

        assert!(state.player_distance(target) > before);
        assert_eq!(state.log.counters().rows_shifted, 1);
        assert_eq!(state.position(PlayerId::new(0)), Position::new(0, 0));
    }

    #[test]
    fn test_preserving_rejects_moving_the_actor() {
        // Actor shares row 2 with the target; row shifts would carry it.
        let state = state_with(tsplit_board(), &[(1, 2), (2, 2)]);
        assert!(!preserves_step(&state, PlayerId::new(0), Direction::Down, 2, Direction::Left));
        assert!(preserves_step(&state, PlayerId::new(0), Direction::Down, 2, Direction::Up));
    }

    #[test]
    fn test_preserving_checks_incoming_piece() {
        // Actor at (1,4) stepping right onto (2,4); column 2 shifts down, so
        // (2,4) receives the piece from (2,3).
        let mut board = tsplit_board();
        let mut quiet = GameLog::counting();
        // TSplit 2 opens up, right, down: no opening to the left.
        board.rotate(Position::new(2, 3), Turn::Right, 2, false, &mut quiet);
        let state = state_with(board, &[(1, 4), (2, 2)]);
        assert!(!preserves_step(&state, PlayerId::new(0), Direction::Right, 2, Direction::Down));

        // Column 2 up brings (2,5) onto the destination: TSplit 0 opens left.
        assert!(preserves_step(&state, PlayerId::new(0), Direction::Right, 2, Direction::Up));
    }

    #[test]
    fn test_preserving_rejects_reserve_entry() {
        // Destination on the entry edge gets a reserve piece.
        let state = state_with(tsplit_board(), &[(1, 0), (2, 3)]);
        assert!(!preserves_step(&state, PlayerId::new(0), Direction::Right, 2, Direction::Down));
    }

    #[test]
    fn test_rotate_counter_blocks_open_step() {
        // Target in the chest column with an open step down.
        let mut state = state_with(tsplit_board(), &[(0, 0), (3, 1)]);
        let target = PlayerId::new(1);
        assert!(state.can_move(target, Direction::Down));

        assert!(try_rotate_counter(&mut state, target, &[]));
        assert!(!state.can_move(target, Direction::Down));
        assert_eq!(state.board.orientation(Position::new(3, 1)), Some(1));
        assert_eq!(state.log.counters().blocks_rotated, 1);
    }

    #[test]
    fn test_rotate_counter_needs_open_step() {
        // TSplit 0 never opens right, so a target in the chest row west of
        // the chest is already stuck.
        let mut state = state_with(tsplit_board(), &[(0, 0), (1, 3)]);
        let before = state.board.clone();

        assert!(!try_rotate_counter(&mut state, PlayerId::new(1), &[]));
        assert_eq!(state.board, before);
        assert_eq!(state.action_count(), 0);
    }

    #[test]
    fn test_rotate_counter_respects_avoid() {
        let mut state = state_with(tsplit_board(), &[(1, 3), (1, 3)]);
        assert!(!try_rotate_counter(&mut state, PlayerId::new(1), &[Position::new(1, 3)]));
        assert_eq!(state.action_count(), 0);
    }

    #[test]
    fn test_counter_any_without_opponents() {
        let mut state = state_with(tsplit_board(), &[(0, 0)]);
        assert!(!counter_any(&mut state, PlayerId::new(0)));
    }
}
