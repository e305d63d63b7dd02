use rkyv::{Archive, Deserialize, Serialize};

pub const PROTOCOL_VERSION: Version = Version {
    major: 0,
    minor: 0,
    patch: 28,
};

pub type PlayerId = i32;
pub type MapId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum Direction {
    #[default]
    Down,
    Left,
    Up,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
        }
    }

    /// Tile-space offset of a single step, y growing downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
        }
    }
}

/// Inclusive upper bounds of a map, as stored in the map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapBounds {
    pub width: i32,
    pub height: i32,
}

impl MapBounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, coords: Coords) -> bool {
        (0..=self.width).contains(&coords.x) && (0..=self.height).contains(&coords.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring tile in `direction`, clamped to `bounds`.
    ///
    /// Returns `None` when clamping would leave the character in place,
    /// so a step is always exactly one tile long.
    pub fn step(self, direction: Direction, bounds: MapBounds) -> Option<Coords> {
        let (dx, dy) = direction.offset();
        let next = Coords {
            x: (self.x + dx).clamp(0, bounds.width.max(0)),
            y: (self.y + dy).clamp(0, bounds.height.max(0)),
        };

        if next == self { None } else { Some(next) }
    }

    pub fn is_adjacent(&self, other: &Coords) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct EncryptionMultiples {
    pub client: i32,
    pub server: i32,
}

/// Starting value of the packet sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceStart(i32);

impl SequenceStart {
    pub fn from_init_values(seq1: i32, seq2: i32) -> Self {
        Self(seq1 * 7 + seq2 - 13)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum FileKind {
    Class,
    Item,
    Npc,
    Spell,
    Map,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Class => "class",
            FileKind::Item => "item",
            FileKind::Npc => "npc",
            FileKind::Spell => "spell",
            FileKind::Map => "map",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum BanType {
    Permanent,
    Temporary { minutes_remaining: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct InitOk {
    pub challenge_response: i32,
    pub player_id: PlayerId,
    pub encryption: EncryptionMultiples,
    pub seq1: i32,
    pub seq2: i32,
}

/// Reply to the connection hello, carrying a code-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum InitReply {
    Ok(InitOk),
    OutOfDate { version: Version },
    Banned(BanType),
    File { kind: FileKind, content: Vec<u8> },
    WarpMap { content: Vec<u8> },
}

impl InitReply {
    pub fn code(&self) -> &'static str {
        match self {
            InitReply::Ok(_) => "ok",
            InitReply::OutOfDate { .. } => "out_of_date",
            InitReply::Banned(_) => "banned",
            InitReply::File { kind, .. } => match kind {
                FileKind::Class => "file_class",
                FileKind::Item => "file_item",
                FileKind::Npc => "file_npc",
                FileKind::Spell => "file_spell",
                FileKind::Map => "file_map",
            },
            InitReply::WarpMap { .. } => "warp_map",
        }
    }
}

/// Every inbound packet the client runtime reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum ServerEvent {
    Init(InitReply),
    TalkPlayer { player_id: PlayerId, message: String },
    TalkServer { message: String },
    TalkAnnounce { player_name: String, message: String },
    MessageOpen { message: String },
    MessagePong,
    DoorOpen { coords: Coords },
    DoorClose { coords: Coords },
    NpcAttack { index: i32, direction: Direction },
}

/// Outbound message describing something the local player wants to do.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum ClientIntent {
    Init {
        challenge: i32,
        version: Version,
    },
    ConnectionAccept {
        encryption: EncryptionMultiples,
        player_id: PlayerId,
    },
    RequestFile {
        kind: FileKind,
        id: i32,
    },
    EnterGame,
    Attack {
        direction: Direction,
        timestamp: i32,
    },
    Walk {
        direction: Direction,
        coords: Coords,
        timestamp: i32,
    },
    Face {
        direction: Direction,
    },
    Sit,
    Stand,
    OpenDoor {
        coords: Coords,
    },
    SitChair {
        coords: Coords,
    },
    Ping,
}

impl ClientIntent {
    /// True for intents that change the character's visible state.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            ClientIntent::Attack { .. }
                | ClientIntent::Walk { .. }
                | ClientIntent::Face { .. }
                | ClientIntent::Sit
                | ClientIntent::Stand
                | ClientIntent::OpenDoor { .. }
                | ClientIntent::SitChair { .. }
        )
    }
}

/// Hash the server must answer a connection challenge with.
pub fn server_verification_hash(challenge: i32) -> i32 {
    let challenge = i64::from(challenge) + 1;
    let hash = 110_905
        + (challenge.rem_euclid(9) + 1)
            * (11_092_004 - challenge).rem_euclid((challenge.rem_euclid(11) + 1) * 119)
            * 119
        + challenge.rem_euclid(2004);
    hash as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_exactly_one_tile() {
        let bounds = MapBounds::new(10, 10);
        let origin = Coords::new(5, 5);

        for direction in Direction::ALL {
            let next = origin.step(direction, bounds).unwrap();
            assert!(origin.is_adjacent(&next));
        }
    }

    #[test]
    fn step_is_clamped_at_map_edge() {
        let bounds = MapBounds::new(3, 3);
        assert_eq!(Coords::new(0, 2).step(Direction::Left, bounds), None);
        assert_eq!(Coords::new(3, 3).step(Direction::Down, bounds), None);
        assert_eq!(
            Coords::new(3, 3).step(Direction::Up, bounds),
            Some(Coords::new(3, 2))
        );
    }

    #[test]
    fn sequence_start_from_init_values() {
        assert_eq!(SequenceStart::from_init_values(10, 5).value(), 62);
    }

    #[test]
    fn verification_hash_is_deterministic() {
        let a = server_verification_hash(12_345);
        let b = server_verification_hash(12_345);
        assert_eq!(a, b);
        assert_ne!(a, server_verification_hash(12_346));
    }

    #[test]
    fn verification_hash_known_value() {
        // challenge 0 -> c = 1: 110905 + 2 * (11092003 % 238) * 119 + 1
        let expected = 110_905 + 2 * (11_092_003 % 238) * 119 + 1;
        assert_eq!(server_verification_hash(0), expected);
    }
}
