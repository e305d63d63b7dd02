mod config;

use std::time::Instant;

use crate::asset::{AssetKey, AssetStore, AssetValue, MemoryAssetStore};
use crate::chat::ChatLog;
use crate::error::{ClientError, Result};
use crate::input::InputSampler;
use crate::net::{
    ClientIntent, Clock, Direction, FileKind, InitReply, LocalClock, MapId, NetworkSender, Outbox,
    ProtocolCodec, RkyvCodec, ServerEvent,
};
use crate::player::{
    CharacterAnimations, MovementController, NpcAnimation, NpcAnimations, TickContext,
    TickOutcome,
};
use crate::session::{error_title, HandshakeContext, HandshakeMachine, Session, SessionSignal};
use crate::simulation::TickClock;
use crate::world::World;

pub use config::{random_challenge, ClientConfig, DEFAULT_TICK_RATE};

/// Owns every piece of client state and runs it from one execution context.
pub struct GameClient<C = RkyvCodec, S = MemoryAssetStore, B = Outbox> {
    config: ClientConfig,
    codec: C,
    store: S,
    bus: B,
    clock: Box<dyn Clock>,
    handshake: HandshakeMachine,
    session: Session,
    world: World,
    animations: CharacterAnimations,
    npc_animations: NpcAnimations,
    input: InputSampler,
    controller: MovementController,
    chat: ChatLog,
    ticker: TickClock,
    signals: Vec<SessionSignal>,
}

impl GameClient {
    pub fn local(config: ClientConfig) -> Self {
        Self::new(config, RkyvCodec, MemoryAssetStore::new(), Outbox::new())
    }
}

impl<C, S, B> GameClient<C, S, B>
where
    C: ProtocolCodec,
    S: AssetStore,
    B: NetworkSender,
{
    pub fn new(config: ClientConfig, codec: C, store: S, bus: B) -> Self {
        Self {
            handshake: HandshakeMachine::new(config.version),
            session: Session::new(config.challenge),
            world: World::new(),
            animations: CharacterAnimations::new(),
            npc_animations: NpcAnimations::new(),
            input: InputSampler::new(),
            controller: MovementController::new(config.movement.clone()),
            chat: ChatLog::new(config.chat_history),
            ticker: TickClock::new(config.tick_rate),
            clock: Box::new(LocalClock),
            signals: Vec::new(),
            codec,
            store,
            bus,
            config,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn animations(&self) -> &CharacterAnimations {
        &self.animations
    }

    pub fn npc_animations(&self) -> &NpcAnimations {
        &self.npc_animations
    }

    pub fn input(&self) -> &InputSampler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputSampler {
        &mut self.input
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MovementController {
        &mut self.controller
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn tick_count(&self) -> u64 {
        self.ticker.tick()
    }

    pub fn take_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Starts a fresh session and sends the hello.
    pub fn connect(&mut self) {
        if !self.session.state().is_terminal() && self.session.player_id.is_some() {
            log::warn!("Reconnecting over a live session");
        }
        self.session = Session::new(self.config.challenge);
        self.ticker.reset();
        self.handshake.begin(&mut self.session, &mut self.bus);
    }

    pub fn disconnect(&mut self) {
        log::info!("Disconnecting");
        self.session.close();
        self.input.release_all();
        self.animations.clear();
        self.npc_animations.clear();
    }

    /// Sets the map the session is on; map files download under this id.
    pub fn set_map_id(&mut self, map_id: MapId) {
        self.session.map_id = map_id;
    }

    /// Marks `map_id` as the destination of a pending warp.
    pub fn set_warp_map_id(&mut self, map_id: MapId) {
        self.session.warp_map_id = map_id;
    }

    /// Queues the files the server said we need and requests the first one.
    pub fn begin_downloads(&mut self, files: &[(FileKind, i32)]) {
        for (kind, id) in files {
            self.session.downloads.push(*kind, *id);
        }
        if let Some(signal) = self
            .handshake
            .advance_downloads(&mut self.session, &mut self.bus)
        {
            self.signals.push(signal);
        }
    }

    pub fn handle_packet(&mut self, data: &[u8]) -> Result<()> {
        let event = self.codec.decode_event(data)?;
        self.handle_event(event)
    }

    pub fn handle_event(&mut self, event: ServerEvent) -> Result<()> {
        match event {
            ServerEvent::Init(reply) => self.handle_reply(reply),
            ServerEvent::DoorOpen { coords } => {
                self.world.set_door_open(coords, true);
                Ok(())
            }
            ServerEvent::DoorClose { coords } => {
                self.world.set_door_open(coords, false);
                Ok(())
            }
            ServerEvent::NpcAttack { index, direction } => {
                self.npc_attack(index, direction);
                Ok(())
            }
            other => {
                self.chat
                    .handle(&other, &self.world, self.session.player_id, Instant::now());
                Ok(())
            }
        }
    }

    pub fn handle_reply(&mut self, reply: InitReply) -> Result<()> {
        let ctx = HandshakeContext {
            codec: &self.codec,
            store: &mut self.store,
            bus: &mut self.bus,
        };

        match self.handshake.handle(&mut self.session, reply, ctx) {
            Ok(signals) => {
                for signal in signals {
                    if let SessionSignal::AssetLoaded(key) = signal {
                        self.install_asset(key)?;
                    }
                    self.signals.push(signal);
                }
                Ok(())
            }
            Err(error) => {
                log::error!("Handshake failed: {}", error);
                self.signals
                    .push(SessionSignal::error(error_title(&error), error.to_string()));
                if error.is_fatal() {
                    self.signals.push(SessionSignal::Disconnect);
                    self.disconnect();
                }
                Err(error)
            }
        }
    }

    /// Switches to the downloaded warp map once the server moves us there.
    pub fn complete_warp(&mut self) -> Result<()> {
        let Some(signal) = self.handshake.complete_warp(&mut self.session) else {
            return Ok(());
        };

        let key = AssetKey::Map(self.session.map_id);
        match self.store.get(&key) {
            Some(AssetValue::Map(map)) => self.world.set_map(map.clone()),
            _ => return Err(ClientError::MissingCollaborator("warp map not in asset store")),
        }
        self.animations.clear();
        self.signals.push(signal);
        Ok(())
    }

    pub fn ping(&mut self) {
        self.bus.send(ClientIntent::Ping);
        self.chat.start_ping(Instant::now());
    }

    /// Runs one logical tick: controller first, then every animation advances.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.controller.tick(TickContext {
            session: &self.session,
            world: &mut self.world,
            animations: &mut self.animations,
            input: &self.input,
            bus: &mut self.bus,
            clock: self.clock.as_ref(),
        });

        self.animations.tick();
        self.npc_animations.tick();
        self.chat.tick();
        outcome
    }

    /// Feeds elapsed wall-clock seconds and runs every tick that became due.
    pub fn update(&mut self, delta: f32) -> Vec<TickOutcome> {
        self.ticker.accumulate(delta);

        let mut outcomes = Vec::new();
        while self.ticker.next_due().is_some() {
            outcomes.push(self.tick());
        }
        outcomes
    }

    fn npc_attack(&mut self, index: i32, direction: Direction) {
        let Some(npc) = self.world.npc_mut(index) else {
            log::debug!("Attack from unknown npc {}", index);
            return;
        };
        npc.direction = direction;

        let ticks = self.config.movement.attack_ticks.clamp(0, i32::from(u8::MAX)) as u8;
        self.npc_animations
            .insert(index, NpcAnimation::attack(npc.coords, direction, ticks));
    }

    fn install_asset(&mut self, key: AssetKey) -> Result<()> {
        let value = self
            .store
            .get(&key)
            .ok_or(ClientError::MissingCollaborator("asset store dropped a persisted file"))?;

        match (key, value) {
            (AssetKey::Item, AssetValue::Item(items)) => self.world.set_items(items.clone()),
            (AssetKey::Map(id), AssetValue::Map(map))
                if id == self.session.map_id && !self.session.warp_queued =>
            {
                self.world.set_map(map.clone());
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{ItemFile, MapFile};
    use crate::net::{Coords, EncryptionMultiples, InitOk};
    use crate::world::Npc;
    use crate::session::SessionState;

    fn encoded(asset: AssetValue) -> Vec<u8> {
        RkyvCodec::encode_asset(&asset).unwrap()
    }

    fn connected_client() -> GameClient {
        let mut client = GameClient::local(ClientConfig::default());
        client.connect();
        let response = RkyvCodec.verify_challenge(client.config().challenge);
        client
            .handle_reply(InitReply::Ok(InitOk {
                challenge_response: response,
                player_id: 3,
                encryption: EncryptionMultiples {
                    client: 5,
                    server: 8,
                },
                seq1: 1,
                seq2: 2,
            }))
            .unwrap();
        client
    }

    #[test]
    fn map_download_installs_into_world() {
        let mut client = connected_client();
        client.set_map_id(4);
        client
            .handle_reply(InitReply::File {
                kind: FileKind::Map,
                content: encoded(AssetValue::Map(MapFile {
                    name: "Aeven".into(),
                    width: 30,
                    height: 30,
                    ..Default::default()
                })),
            })
            .unwrap();

        assert_eq!(client.world().map().map(|m| m.name.as_str()), Some("Aeven"));
        assert_eq!(client.session().state(), SessionState::InGame);
        assert!(client.take_signals().contains(&SessionSignal::EnterGame));
    }

    #[test]
    fn item_download_feeds_weapon_lookup() {
        let mut client = connected_client();
        client
            .handle_reply(InitReply::File {
                kind: FileKind::Item,
                content: encoded(AssetValue::Item(ItemFile {
                    rid: 9,
                    records: Vec::new(),
                })),
            })
            .unwrap();

        assert!(client.store().get(&AssetKey::Item).is_some());
    }

    #[test]
    fn fatal_error_disconnects() {
        let mut client = GameClient::local(ClientConfig::default());
        client.connect();
        let result = client.handle_reply(InitReply::Ok(InitOk {
            challenge_response: 0,
            player_id: 3,
            encryption: EncryptionMultiples {
                client: 5,
                server: 8,
            },
            seq1: 1,
            seq2: 2,
        }));

        assert!(matches!(result, Err(ClientError::ProtocolViolation(_))));
        let signals = client.take_signals();
        assert!(signals.contains(&SessionSignal::Disconnect));
        assert_eq!(client.session().state(), SessionState::Failed);
    }

    #[test]
    fn update_runs_due_ticks() {
        let mut client = GameClient::local(ClientConfig {
            tick_rate: 8,
            ..Default::default()
        });

        assert_eq!(client.update(0.25).len(), 2);
        assert_eq!(client.tick_count(), 2);
        assert!(client.update(0.0).is_empty());
    }

    #[test]
    fn npc_attack_starts_animation() {
        let mut client = connected_client();
        client.world_mut().add_npc(Npc {
            index: 2,
            id: 14,
            coords: Coords::new(3, 3),
            direction: Direction::Down,
        });

        client
            .handle_event(ServerEvent::NpcAttack {
                index: 2,
                direction: Direction::Left,
            })
            .unwrap();
        client
            .handle_event(ServerEvent::NpcAttack {
                index: 9,
                direction: Direction::Up,
            })
            .unwrap();

        assert_eq!(client.npc_animations().len(), 1);
        assert_eq!(
            client.world().npc(2).map(|n| n.direction),
            Some(Direction::Left)
        );
        for _ in 0..3 {
            client.tick();
        }
        assert!(client.npc_animations().is_empty());
    }

    #[test]
    fn warp_completion_without_map_is_an_error() {
        let mut client = connected_client();
        client.session.warp_queued = true;
        client.set_warp_map_id(11);

        assert!(matches!(
            client.complete_warp(),
            Err(ClientError::MissingCollaborator(_))
        ));
    }
}
