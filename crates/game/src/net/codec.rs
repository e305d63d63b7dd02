use rkyv::rancor;
use rkyv::util::AlignedVec;

use crate::asset::{AssetValue, ClassFile, ItemFile, MapFile, NpcFile, SpellFile};

use super::protocol::{server_verification_hash, FileKind, InitReply, ServerEvent};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("serialization failed: {0}")]
    Serialize(rancor::Error),
    #[error("deserialization failed: {0}")]
    Deserialize(rancor::Error),
    #[error("expected an init reply, got {0}")]
    UnexpectedEvent(&'static str),
}

/// Wire-format collaborator: turns raw packet and file bytes into typed values.
pub trait ProtocolCodec {
    fn decode_event(&self, data: &[u8]) -> Result<ServerEvent, CodecError>;

    fn decode_asset(&self, kind: FileKind, data: &[u8]) -> Result<AssetValue, CodecError>;

    /// Value an honest server answers `challenge` with.
    fn verify_challenge(&self, challenge: i32) -> i32;

    fn decode_reply(&self, data: &[u8]) -> Result<InitReply, CodecError> {
        match self.decode_event(data)? {
            ServerEvent::Init(reply) => Ok(reply),
            other => Err(CodecError::UnexpectedEvent(event_name(&other))),
        }
    }
}

fn event_name(event: &ServerEvent) -> &'static str {
    match event {
        ServerEvent::Init(_) => "init",
        ServerEvent::TalkPlayer { .. } => "talk_player",
        ServerEvent::TalkServer { .. } => "talk_server",
        ServerEvent::TalkAnnounce { .. } => "talk_announce",
        ServerEvent::MessageOpen { .. } => "message_open",
        ServerEvent::MessagePong => "message_pong",
        ServerEvent::DoorOpen { .. } => "door_open",
        ServerEvent::DoorClose { .. } => "door_close",
        ServerEvent::NpcAttack { .. } => "npc_attack",
    }
}

/// Codec backed by rkyv archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct RkyvCodec;

impl RkyvCodec {
    pub fn encode_event(event: &ServerEvent) -> Result<Vec<u8>, CodecError> {
        rkyv::to_bytes::<rancor::Error>(event)
            .map(|aligned| aligned.into_vec())
            .map_err(CodecError::Serialize)
    }

    pub fn encode_asset(asset: &AssetValue) -> Result<Vec<u8>, CodecError> {
        let bytes = match asset {
            AssetValue::Class(file) => rkyv::to_bytes::<rancor::Error>(file),
            AssetValue::Item(file) => rkyv::to_bytes::<rancor::Error>(file),
            AssetValue::Npc(file) => rkyv::to_bytes::<rancor::Error>(file),
            AssetValue::Spell(file) => rkyv::to_bytes::<rancor::Error>(file),
            AssetValue::Map(file) => rkyv::to_bytes::<rancor::Error>(file),
        };
        bytes
            .map(|aligned| aligned.into_vec())
            .map_err(CodecError::Serialize)
    }
}

// Archives must be read from aligned memory; packet buffers carry no such guarantee.
fn aligned(data: &[u8]) -> AlignedVec {
    let mut buffer = AlignedVec::with_capacity(data.len());
    buffer.extend_from_slice(data);
    buffer
}

impl ProtocolCodec for RkyvCodec {
    fn decode_event(&self, data: &[u8]) -> Result<ServerEvent, CodecError> {
        rkyv::from_bytes::<ServerEvent, rancor::Error>(&aligned(data))
            .map_err(CodecError::Deserialize)
    }

    fn decode_asset(&self, kind: FileKind, data: &[u8]) -> Result<AssetValue, CodecError> {
        let buffer = aligned(data);
        let value = match kind {
            FileKind::Class => {
                rkyv::from_bytes::<ClassFile, rancor::Error>(&buffer).map(AssetValue::Class)
            }
            FileKind::Item => {
                rkyv::from_bytes::<ItemFile, rancor::Error>(&buffer).map(AssetValue::Item)
            }
            FileKind::Npc => {
                rkyv::from_bytes::<NpcFile, rancor::Error>(&buffer).map(AssetValue::Npc)
            }
            FileKind::Spell => {
                rkyv::from_bytes::<SpellFile, rancor::Error>(&buffer).map(AssetValue::Spell)
            }
            FileKind::Map => {
                rkyv::from_bytes::<MapFile, rancor::Error>(&buffer).map(AssetValue::Map)
            }
        };
        value.map_err(CodecError::Deserialize)
    }

    fn verify_challenge(&self, challenge: i32) -> i32 {
        server_verification_hash(challenge)
    }
}
