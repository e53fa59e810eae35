//! Players and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe player identifier for the 1-4 pawns of a race.
//!
//! ## PlayerMap
//!
//! Per-player data backed by a `Vec` for O(1) access, indexable by
//! `PlayerId`.
//!
//! ## Player
//!
//! A pawn on the board: identity, color, position and a move mutator that
//! reports voluntary steps to the instance's data collector.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::geometry::{Direction, Position};
use crate::record::{CounterKind, DataCollector, MoveDirection, MoveKind, MoveRecord, MoveTarget};

/// Player identifier. Indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a race with `player_count` players.
    ///
    /// ```
    /// use amaze_sim::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use amaze_sim::core::{PlayerId, PlayerMap};
///
/// let mut wins: PlayerMap<u32> = PlayerMap::with_value(4, 0);
/// wins[PlayerId::new(1)] += 1;
/// assert_eq!(wins[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Pawn color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PawnColor {
    Purple,
    Blue,
    Red,
    Orange,
    Green,
    Yellow,
    Black,
    White,
}

impl PawnColor {
    /// Default color for the player seated at `index`.
    #[must_use]
    pub fn default_for(index: usize) -> Self {
        const DEFAULTS: [PawnColor; 4] = [PawnColor::Purple, PawnColor::Blue, PawnColor::Red, PawnColor::Orange];
        DEFAULTS[index % DEFAULTS.len()]
    }

    /// Parse a color name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "purple" => PawnColor::Purple,
            "blue" => PawnColor::Blue,
            "red" => PawnColor::Red,
            "orange" => PawnColor::Orange,
            "green" => PawnColor::Green,
            "yellow" => PawnColor::Yellow,
            "black" => PawnColor::Black,
            "white" => PawnColor::White,
            _ => return None,
        };
        Some(color)
    }
}

/// A pawn racing to the chest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: PawnColor,
    pub position: Position,
    /// Voluntary steps taken. Forced moves from line shifts are not counted.
    pub move_count: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, color: PawnColor, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            position,
            move_count: 0,
        }
    }

    /// Starting corner for seat `index` on a `size`×`size` board, clockwise
    /// from the top-left. Returns `None` for seats beyond the fourth.
    #[must_use]
    pub fn starting_corner(index: usize, size: usize) -> Option<Position> {
        let far = size as i32 - 1;
        match index {
            0 => Some(Position::new(0, 0)),
            1 => Some(Position::new(far, 0)),
            2 => Some(Position::new(far, far)),
            3 => Some(Position::new(0, far)),
            _ => None,
        }
    }

    /// Take a voluntary step. Legality is the caller's concern.
    pub fn step(&mut self, dir: Direction, log: &mut dyn DataCollector) {
        log.increment_move_data(CounterKind::PawnMoved);
        if log.is_receiving_data() {
            log.send_move_data(MoveRecord {
                kind: MoveKind::PawnMoved,
                target: MoveTarget::Player(self.id),
                direction: MoveDirection::Step(dir),
            });
        }
        self.move_count += 1;
        self.position = self.position.step(dir);
    }

    /// Move one cell because the line underneath was shifted. Not reported
    /// as a pawn move; the shift record lists displaced players instead.
    pub(crate) fn carry(&mut self, dir: Direction) {
        self.position = self.position.step(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GameLog;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert_eq!(map.player_count(), 4);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<i32> = PlayerMap::with_value(2, 0);

        map[PlayerId::new(0)] = 10;
        map[PlayerId::new(1)] = 20;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &10), (PlayerId::new(1), &20)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }

    #[test]
    fn test_starting_corners_clockwise() {
        assert_eq!(Player::starting_corner(0, 7), Some(Position::new(0, 0)));
        assert_eq!(Player::starting_corner(1, 7), Some(Position::new(6, 0)));
        assert_eq!(Player::starting_corner(2, 7), Some(Position::new(6, 6)));
        assert_eq!(Player::starting_corner(3, 7), Some(Position::new(0, 6)));
        assert_eq!(Player::starting_corner(4, 7), None);
    }

    #[test]
    fn test_step_records_and_counts() {
        let mut log = GameLog::recording();
        let mut player = Player::new(PlayerId::new(1), "Ann", PawnColor::Blue, Position::new(1, 1));

        player.step(Direction::Right, &mut log);

        assert_eq!(player.position, Position::new(2, 1));
        assert_eq!(player.move_count, 1);
        assert_eq!(log.counters().pawns_moved, 1);
        assert_eq!(log.moves().count(), 1);
    }

    #[test]
    fn test_carry_is_not_reported() {
        let mut player = Player::new(PlayerId::new(0), "Bo", PawnColor::Red, Position::new(2, 2));
        player.carry(Direction::Up);
        assert_eq!(player.position, Position::new(2, 1));
        assert_eq!(player.move_count, 0);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(PawnColor::parse("Purple"), Some(PawnColor::Purple));
        assert_eq!(PawnColor::parse("ORANGE"), Some(PawnColor::Orange));
        assert_eq!(PawnColor::parse("mauve"), None);
        assert_eq!(PawnColor::default_for(2), PawnColor::Red);
    }
}
