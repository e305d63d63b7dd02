use crate::asset::AssetKey;
use crate::net::{FileKind, MapId, PlayerId, Version};

/// Things the UI layer reacts to while the handshake runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    Connected { player_id: PlayerId },
    /// Server wants a different client version; reconnect with it.
    Reconnect { version: Version },
    Error { title: String, message: String },
    Disconnect,
    AssetLoaded(AssetKey),
    FileRequested { kind: FileKind, id: i32 },
    EnterGame,
    WarpReady { map_id: MapId },
}

impl SessionSignal {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        SessionSignal::Error {
            title: title.into(),
            message: message.into(),
        }
    }
}
