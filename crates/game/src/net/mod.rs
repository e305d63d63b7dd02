mod bus;
mod codec;
mod protocol;
mod timestamp;

pub use bus::{NetworkSender, Outbox};
pub use codec::{CodecError, ProtocolCodec, RkyvCodec};
pub use protocol::{
    server_verification_hash, BanType, ClientIntent, Coords, Direction, EncryptionMultiples,
    FileKind, InitOk, InitReply, MapBounds, MapId, PlayerId, SequenceStart, ServerEvent, Version,
    PROTOCOL_VERSION,
};
pub use timestamp::{encode_time_of_day, Clock, FixedClock, LocalClock};
