use crate::asset::{AssetKey, AssetStore};
use crate::error::{ClientError, Result};
use crate::net::{
    BanType, ClientIntent, FileKind, InitOk, InitReply, NetworkSender, ProtocolCodec,
    SequenceStart, Version,
};

use super::signal::SessionSignal;
use super::state::{Session, SessionState};

pub const CHALLENGE_FAILED_TITLE: &str = "Connection Refused";
pub const BLOCKED_TITLE: &str = "Connection is blocked";

/// Collaborators a handshake reply may touch.
pub struct HandshakeContext<'a> {
    pub codec: &'a dyn ProtocolCodec,
    pub store: &'a mut dyn AssetStore,
    pub bus: &'a mut dyn NetworkSender,
}

/// Drives a [`Session`] from the initial hello to `InGame`.
#[derive(Debug, Clone)]
pub struct HandshakeMachine {
    version: Version,
}

impl HandshakeMachine {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Sends the hello carrying our challenge.
    pub fn begin(&self, session: &mut Session, bus: &mut dyn NetworkSender) {
        if session.state() != SessionState::Unstarted {
            log::warn!("Handshake already started ({:?})", session.state());
            return;
        }

        bus.send(ClientIntent::Init {
            challenge: session.challenge,
            version: self.version,
        });
        session.transition(SessionState::AwaitingReply);
    }

    pub fn handle(
        &self,
        session: &mut Session,
        reply: InitReply,
        ctx: HandshakeContext<'_>,
    ) -> Result<Vec<SessionSignal>> {
        if session.state().is_terminal() {
            log::debug!("Ignoring {} reply on ended session", reply.code());
            return Ok(Vec::new());
        }

        log::debug!("<- init reply {}", reply.code());
        match reply {
            InitReply::Ok(data) => self.handle_ok(session, data, ctx),
            InitReply::OutOfDate { version } => Ok(self.handle_out_of_date(session, version)),
            InitReply::Banned(ban) => self.handle_banned(session, ban),
            InitReply::File { kind, content } => self.handle_file(session, kind, &content, ctx),
            InitReply::WarpMap { content } => self.handle_warp_map(session, &content, ctx),
        }
    }

    /// Requests the next queued file, or enters the game when nothing is left.
    /// Only runs once the server has accepted the connection.
    pub fn advance_downloads(
        &self,
        session: &mut Session,
        bus: &mut dyn NetworkSender,
    ) -> Option<SessionSignal> {
        if !session.state().accepts_files() {
            log::warn!("Not downloading files in {:?}", session.state());
            return None;
        }

        if let Some(download) = session.downloads.pop() {
            log::info!("Requesting {} file {}", download.kind.as_str(), download.id);
            bus.send(ClientIntent::RequestFile {
                kind: download.kind,
                id: download.id,
            });
            return Some(SessionSignal::FileRequested {
                kind: download.kind,
                id: download.id,
            });
        }

        bus.send(ClientIntent::EnterGame);
        session.transition(SessionState::InGame);
        Some(SessionSignal::EnterGame)
    }

    /// Adopts the pending warp map once the server confirms the transfer.
    pub fn complete_warp(&self, session: &mut Session) -> Option<SessionSignal> {
        if !session.warp_queued {
            return None;
        }

        session.warp_queued = false;
        session.map_id = session.warp_map_id;
        log::info!("Warp to map {} complete", session.map_id);
        Some(SessionSignal::WarpReady {
            map_id: session.map_id,
        })
    }

    fn handle_ok(
        &self,
        session: &mut Session,
        data: InitOk,
        ctx: HandshakeContext<'_>,
    ) -> Result<Vec<SessionSignal>> {
        if session.state() != SessionState::AwaitingReply {
            log::warn!("Unexpected ok reply in {:?}", session.state());
            return Ok(Vec::new());
        }

        let expected = ctx.codec.verify_challenge(session.challenge);
        if data.challenge_response != expected {
            log::warn!(
                "Challenge response {} does not match {}",
                data.challenge_response,
                expected
            );
            session.transition(SessionState::Failed);
            return Err(ClientError::ProtocolViolation(
                "Server failed challenge verification".to_string(),
            ));
        }

        let sequence = SequenceStart::from_init_values(data.seq1, data.seq2);
        session.player_id = Some(data.player_id);
        session.encryption = Some(data.encryption);
        session.sequence_start = Some(sequence);

        ctx.bus.set_encryption(data.encryption);
        ctx.bus.set_sequence(sequence);
        ctx.bus.send(ClientIntent::ConnectionAccept {
            encryption: data.encryption,
            player_id: data.player_id,
        });

        session.transition(SessionState::Connected);
        Ok(vec![SessionSignal::Connected {
            player_id: data.player_id,
        }])
    }

    fn handle_out_of_date(&self, session: &mut Session, version: Version) -> Vec<SessionSignal> {
        log::warn!("Server requires client version {}", version);
        session.server_version = Some(version);
        vec![SessionSignal::Reconnect { version }]
    }

    fn handle_banned(&self, session: &mut Session, ban: BanType) -> Result<Vec<SessionSignal>> {
        session.transition(SessionState::Failed);
        let message = match ban {
            BanType::Permanent => {
                "The server dropped the connection, reason: permanent ip ban".to_string()
            }
            BanType::Temporary { minutes_remaining } => format!(
                "The server dropped the connection, reason: temporary ip ban. {} minutes",
                minutes_remaining
            ),
        };
        Err(ClientError::ServerRejection(message))
    }

    fn handle_file(
        &self,
        session: &mut Session,
        kind: FileKind,
        content: &[u8],
        ctx: HandshakeContext<'_>,
    ) -> Result<Vec<SessionSignal>> {
        if !session.state().accepts_files() {
            log::warn!("Unexpected {} file in {:?}", kind.as_str(), session.state());
            return Ok(Vec::new());
        }

        let value = ctx.codec.decode_asset(kind, content)?;
        let key = AssetKey::for_kind(value.kind(), session.map_id);
        ctx.store.persist(key, value);

        let mut signals = vec![SessionSignal::AssetLoaded(key)];
        signals.extend(self.advance_downloads(session, ctx.bus));
        Ok(signals)
    }

    fn handle_warp_map(
        &self,
        session: &mut Session,
        content: &[u8],
        ctx: HandshakeContext<'_>,
    ) -> Result<Vec<SessionSignal>> {
        if !session.state().accepts_files() {
            log::warn!("Unexpected warp map in {:?}", session.state());
            return Ok(Vec::new());
        }

        let value = ctx.codec.decode_asset(FileKind::Map, content)?;
        let key = AssetKey::Map(session.warp_map_id);
        ctx.store.persist(key, value);

        session.warp_queued = true;
        log::info!("Warp map {} downloaded, warp queued", session.warp_map_id);
        Ok(vec![SessionSignal::AssetLoaded(key)])
    }
}

/// Title shown for a handshake error, matching the message the server caused.
pub fn error_title(error: &ClientError) -> &'static str {
    match error {
        ClientError::ServerRejection(_) => BLOCKED_TITLE,
        ClientError::ProtocolViolation(_) => CHALLENGE_FAILED_TITLE,
        ClientError::MissingCollaborator(_) | ClientError::Codec(_) => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetValue, ItemFile, MemoryAssetStore};
    use crate::net::{EncryptionMultiples, Outbox, RkyvCodec, PROTOCOL_VERSION};

    fn ok_reply(challenge_response: i32) -> InitReply {
        InitReply::Ok(InitOk {
            challenge_response,
            player_id: 42,
            encryption: EncryptionMultiples {
                client: 6,
                server: 9,
            },
            seq1: 10,
            seq2: 5,
        })
    }

    #[test]
    fn begin_sends_hello_once() {
        let machine = HandshakeMachine::new(PROTOCOL_VERSION);
        let mut session = Session::new(77);
        let mut bus = Outbox::new();

        machine.begin(&mut session, &mut bus);
        machine.begin(&mut session, &mut bus);

        assert_eq!(session.state(), SessionState::AwaitingReply);
        assert_eq!(bus.queued().len(), 1);
    }

    #[test]
    fn ok_reply_ignored_after_connect() {
        let machine = HandshakeMachine::new(PROTOCOL_VERSION);
        let codec = RkyvCodec;
        let mut store = MemoryAssetStore::new();
        let mut bus = Outbox::new();
        let mut session = Session::new(77);
        machine.begin(&mut session, &mut bus);

        let response = codec.verify_challenge(77);
        for _ in 0..2 {
            let ctx = HandshakeContext {
                codec: &codec,
                store: &mut store,
                bus: &mut bus,
            };
            machine.handle(&mut session, ok_reply(response), ctx).unwrap();
        }

        let accepts = bus
            .queued()
            .iter()
            .filter(|i| matches!(i, ClientIntent::ConnectionAccept { .. }))
            .count();
        assert_eq!(accepts, 1);
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn codec_failure_leaves_queue_untouched() {
        let machine = HandshakeMachine::new(PROTOCOL_VERSION);
        let codec = RkyvCodec;
        let mut store = MemoryAssetStore::new();
        let mut bus = Outbox::new();
        let mut session = Session::new(1);
        session.transition(SessionState::Connected);
        session.downloads.push(FileKind::Spell, 1);

        let ctx = HandshakeContext {
            codec: &codec,
            store: &mut store,
            bus: &mut bus,
        };
        let result = machine.handle(
            &mut session,
            InitReply::File {
                kind: FileKind::Item,
                content: vec![0xff],
            },
            ctx,
        );

        assert!(matches!(result, Err(ClientError::Codec(_))));
        assert_eq!(session.downloads.len(), 1);
        assert!(store.is_empty());
        assert!(bus.queued().is_empty());
    }

    #[test]
    fn replies_after_close_are_ignored() {
        let machine = HandshakeMachine::new(PROTOCOL_VERSION);
        let codec = RkyvCodec;
        let mut store = MemoryAssetStore::new();
        let mut bus = Outbox::new();
        let mut session = Session::new(1);
        session.close();

        let content =
            RkyvCodec::encode_asset(&AssetValue::Item(ItemFile::default())).unwrap();
        let ctx = HandshakeContext {
            codec: &codec,
            store: &mut store,
            bus: &mut bus,
        };
        let signals = machine
            .handle(
                &mut session,
                InitReply::File {
                    kind: FileKind::Item,
                    content,
                },
                ctx,
            )
            .unwrap();

        assert!(signals.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn file_before_accept_is_ignored() {
        let machine = HandshakeMachine::new(PROTOCOL_VERSION);
        let codec = RkyvCodec;
        let mut store = MemoryAssetStore::new();
        let mut bus = Outbox::new();
        let mut session = Session::new(1);
        machine.begin(&mut session, &mut bus);
        bus.drain();

        let content =
            RkyvCodec::encode_asset(&AssetValue::Item(ItemFile::default())).unwrap();
        let ctx = HandshakeContext {
            codec: &codec,
            store: &mut store,
            bus: &mut bus,
        };
        let signals = machine
            .handle(
                &mut session,
                InitReply::File {
                    kind: FileKind::Item,
                    content,
                },
                ctx,
            )
            .unwrap();

        assert!(signals.is_empty());
        assert!(store.is_empty());
        assert!(bus.queued().is_empty());
        assert_eq!(session.state(), SessionState::AwaitingReply);
        assert_eq!(machine.advance_downloads(&mut session, &mut bus), None);
    }

    #[test]
    fn error_titles() {
        assert_eq!(
            error_title(&ClientError::ServerRejection("x".into())),
            BLOCKED_TITLE
        );
        assert_eq!(
            error_title(&ClientError::ProtocolViolation("x".into())),
            CHALLENGE_FAILED_TITLE
        );
    }
}
