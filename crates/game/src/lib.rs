pub mod asset;
pub mod chat;
pub mod client;
pub mod error;
pub mod input;
pub mod net;
pub mod player;
pub mod session;
pub mod simulation;
pub mod world;

pub use asset::{AssetKey, AssetStore, AssetValue, MapFile, MemoryAssetStore, TileSpec};
pub use chat::{ChatEntry, ChatLog, ChatTab};
pub use client::{random_challenge, ClientConfig, DEFAULT_TICK_RATE, GameClient};
pub use error::{ClientError, Result};
pub use input::{HeldInputs, Input, InputSampler};
pub use net::{
    ClientIntent, Clock, Coords, Direction, FileKind, InitReply, NetworkSender, Outbox,
    PROTOCOL_VERSION, ProtocolCodec, RkyvCodec, ServerEvent,
};
pub use player::{
    CharacterAnimation, CharacterAnimations, MovementConfig, MovementController, TickOutcome,
};
pub use session::{HandshakeMachine, Session, SessionSignal, SessionState};
pub use simulation::{FixedTimestep, TickClock};
pub use world::{Character, World, WorldView};
