use std::collections::HashSet;

use tilesync::asset::{
    ClassFile, ClassRecord, ItemFile, ItemKind, ItemRecord, ItemSubtype, MapTile, NpcFile,
    NpcRecord, SpellFile, SpellRecord, WarpTile,
};
use tilesync::net::{
    server_verification_hash, BanType, CodecError, EncryptionMultiples, InitOk, MapId, PlayerId,
    Version,
};
use tilesync::{
    AssetValue, ClientIntent, Coords, Direction, FileKind, InitReply, MapFile, RkyvCodec,
    ServerEvent, TileSpec,
};

pub const START_MAP: MapId = 1;
pub const WARP_MAP: MapId = 2;
pub const PLAYER_ID: PlayerId = 7;
pub const SPAWN: Coords = Coords::new(2, 2);
pub const SPAWN_DIRECTION: Direction = Direction::Right;
// Short Bow in the served item file.
pub const SPAWN_WEAPON: i32 = 2;

const DOOR: Coords = Coords::new(2, 5);
const WARP_DESTINATION: Coords = Coords::new(4, 4);

/// How the in-process server answers the hello.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServerMode {
    Honest,
    BadChallenge,
    Banned,
    OutOfDate,
}

/// Something the loopback server wants the client to see.
#[derive(Debug)]
pub enum Delivery {
    Packet(Vec<u8>),
    /// Server moved the player; the warp map follows as a packet.
    Warp { map_id: MapId, coords: Coords },
}

/// Scripted stand-in for a game server, answering client intents in process.
pub struct LoopbackServer {
    mode: ServerMode,
    version: Version,
    open_doors: HashSet<Coords>,
    warped: bool,
    received: u64,
}

impl LoopbackServer {
    pub fn new(mode: ServerMode, version: Version) -> Self {
        Self {
            mode,
            version,
            open_doors: HashSet::new(),
            warped: false,
            received: 0,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn respond(&mut self, intents: Vec<ClientIntent>) -> Result<Vec<Delivery>, CodecError> {
        let mut deliveries = Vec::new();
        for intent in intents {
            self.received += 1;
            log::debug!("server <- {:?}", intent);
            match intent {
                ClientIntent::Init { challenge, .. } => {
                    deliveries.push(packet(ServerEvent::Init(self.hello_reply(challenge)))?);
                }
                ClientIntent::RequestFile { kind, id } => {
                    let content = file_content(kind, id)?;
                    deliveries.push(packet(ServerEvent::Init(InitReply::File { kind, content }))?);
                }
                ClientIntent::EnterGame => {
                    deliveries.push(packet(ServerEvent::TalkServer {
                        message: "Welcome to the loopback server".to_string(),
                    })?);
                }
                ClientIntent::OpenDoor { coords } => {
                    if self.open_doors.insert(coords) {
                        deliveries.push(packet(ServerEvent::DoorOpen { coords })?);
                    }
                }
                ClientIntent::Walk { coords, .. } if coords == DOOR && !self.warped => {
                    self.warped = true;
                    deliveries.push(Delivery::Warp {
                        map_id: WARP_MAP,
                        coords: WARP_DESTINATION,
                    });
                    let content = encode(&AssetValue::Map(demo_map(WARP_MAP)))?;
                    deliveries.push(packet(ServerEvent::Init(InitReply::WarpMap { content }))?);
                }
                ClientIntent::Ping => deliveries.push(packet(ServerEvent::MessagePong)?),
                _ => {}
            }
        }
        Ok(deliveries)
    }

    fn hello_reply(&self, challenge: i32) -> InitReply {
        match self.mode {
            ServerMode::Honest | ServerMode::BadChallenge => {
                let mut challenge_response = server_verification_hash(challenge);
                if self.mode == ServerMode::BadChallenge {
                    challenge_response += 1;
                }
                InitReply::Ok(InitOk {
                    challenge_response,
                    player_id: PLAYER_ID,
                    encryption: EncryptionMultiples {
                        client: 6,
                        server: 10,
                    },
                    seq1: 12,
                    seq2: 4,
                })
            }
            ServerMode::Banned => InitReply::Banned(BanType::Temporary {
                minutes_remaining: 15,
            }),
            ServerMode::OutOfDate => InitReply::OutOfDate {
                version: Version {
                    minor: self.version.minor + 1,
                    ..self.version
                },
            },
        }
    }
}

/// Files the server tells a fresh client to fetch before entering.
pub fn required_files() -> Vec<(FileKind, i32)> {
    vec![
        (FileKind::Map, START_MAP),
        (FileKind::Item, 1),
        (FileKind::Npc, 1),
        (FileKind::Spell, 1),
        (FileKind::Class, 1),
    ]
}

fn packet(event: ServerEvent) -> Result<Delivery, CodecError> {
    RkyvCodec::encode_event(&event).map(Delivery::Packet)
}

fn encode(asset: &AssetValue) -> Result<Vec<u8>, CodecError> {
    RkyvCodec::encode_asset(asset)
}

fn file_content(kind: FileKind, id: i32) -> Result<Vec<u8>, CodecError> {
    let asset = match kind {
        FileKind::Map => AssetValue::Map(demo_map(id)),
        FileKind::Item => AssetValue::Item(ItemFile {
            rid: 1,
            records: vec![
                item("Wooden Sword", ItemKind::Weapon, ItemSubtype::None),
                item("Short Bow", ItemKind::Weapon, ItemSubtype::Ranged),
                item("Arrows", ItemKind::General, ItemSubtype::Arrows),
            ],
        }),
        FileKind::Npc => AssetValue::Npc(NpcFile {
            rid: 1,
            records: vec![NpcRecord {
                name: "Crow".to_string(),
                graphic_id: 3,
                hp: 10,
            }],
        }),
        FileKind::Spell => AssetValue::Spell(SpellFile {
            rid: 1,
            records: vec![SpellRecord {
                name: "Heal".to_string(),
                icon_id: 1,
                tp_cost: 4,
            }],
        }),
        FileKind::Class => AssetValue::Class(ClassFile {
            rid: 1,
            records: vec![ClassRecord {
                name: "Peasant".to_string(),
                parent_type: 0,
                stat_group: 0,
            }],
        }),
    };
    encode(&asset)
}

fn item(name: &str, kind: ItemKind, subtype: ItemSubtype) -> ItemRecord {
    ItemRecord {
        name: name.to_string(),
        graphic_id: 1,
        kind,
        subtype,
    }
}

fn demo_map(id: MapId) -> MapFile {
    let mut tiles = vec![
        MapTile {
            coords: Coords::new(6, 2),
            spec: TileSpec::ChairLeft,
        },
        MapTile {
            coords: Coords::new(4, 3),
            spec: TileSpec::Wall,
        },
    ];

    let mut warps = Vec::new();
    if id == START_MAP {
        warps.push(WarpTile {
            coords: DOOR,
            destination_map: WARP_MAP,
            destination: WARP_DESTINATION,
            door: true,
        });
    } else {
        tiles.clear();
    }

    MapFile {
        rid: id,
        name: format!("Loopback {}", id),
        width: 9,
        height: 9,
        tiles,
        warps,
    }
}
