mod loopback;
mod script;

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;

use loopback::{Delivery, LoopbackServer, ServerMode};
use script::InputScript;
use tilesync::world::Character;
use tilesync::{
    random_challenge, AssetKey, ClientConfig, Coords, GameClient, MovementConfig,
    SessionSignal, DEFAULT_TICK_RATE,
};

#[derive(Parser)]
#[command(name = "tilesync-client")]
#[command(about = "Tile game client runtime driven by a loopback server")]
struct Args {
    #[arg(short, long, default_value_t = DEFAULT_TICK_RATE)]
    tick_rate: u32,

    #[arg(long, help = "Hello challenge (random when omitted)")]
    challenge: Option<i32>,

    #[arg(long, value_enum, default_value_t = ServerMode::Honest)]
    server: ServerMode,

    #[arg(long, default_value_t = 120, help = "Frames to run before exiting")]
    frames: u64,

    #[arg(long, default_value_t = 4, help = "Ticks between steps while walking")]
    walk_ticks: i32,

    #[arg(long, default_value_t = 40, help = "Frames between pings once in game")]
    ping_interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ClientConfig {
        tick_rate: args.tick_rate.max(1),
        challenge: args.challenge.unwrap_or_else(random_challenge),
        movement: MovementConfig {
            walk_ticks: args.walk_ticks,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut server = LoopbackServer::new(args.server, config.version);
    let mut client = GameClient::local(config);
    client.set_map_id(loopback::START_MAP);
    client.connect();

    run(&mut client, &mut server, &args).await?;

    log::info!(
        "Stopped after {} ticks, server saw {} intents",
        client.tick_count(),
        server.received()
    );
    Ok(())
}

async fn run(client: &mut GameClient, server: &mut LoopbackServer, args: &Args) -> Result<()> {
    let tick_duration = Duration::from_secs_f32(1.0 / client.config().tick_rate as f32);
    let mut interval = tokio::time::interval(tick_duration);
    let mut script = InputScript::demo();
    let mut entered_at: Option<u64> = None;
    let mut warp_destination: Option<Coords> = None;
    let mut last_frame = Instant::now();

    for frame in 0..args.frames {
        interval.tick().await;

        let intents = client.bus_mut().drain();
        for intent in intents.iter().filter(|i| i.is_action()) {
            log::info!("-> {:?}", intent);
        }

        for delivery in server.respond(intents)? {
            match delivery {
                Delivery::Packet(bytes) => {
                    if let Err(e) = client.handle_packet(&bytes) {
                        log::warn!("Packet rejected: {}", e);
                    }
                }
                Delivery::Warp { map_id, coords } => {
                    client.set_warp_map_id(map_id);
                    warp_destination = Some(coords);
                }
            }
        }

        for signal in client.take_signals() {
            match signal {
                SessionSignal::Connected { player_id } => {
                    log::info!("Connected as player {}", player_id);
                    client.begin_downloads(&loopback::required_files());
                }
                SessionSignal::EnterGame if entered_at.is_none() => {
                    log::info!("Entering game");
                    client.world_mut().add_character(
                        Character::new(loopback::PLAYER_ID, "Loopback", loopback::SPAWN)
                            .with_direction(loopback::SPAWN_DIRECTION)
                            .with_weapon(loopback::SPAWN_WEAPON),
                    );
                    entered_at = Some(client.tick_count());
                }
                SessionSignal::AssetLoaded(AssetKey::Map(map_id))
                    if client.session().warp_queued =>
                {
                    log::info!("Warp map {} ready", map_id);
                    client.complete_warp()?;
                }
                SessionSignal::WarpReady { map_id } => {
                    let world = client.world_mut();
                    if let (Some(coords), Some(character)) = (
                        warp_destination.take(),
                        world.character_mut(loopback::PLAYER_ID),
                    ) {
                        character.coords = coords;
                    }
                    log::info!("Arrived on map {}", map_id);
                }
                SessionSignal::Reconnect { version } => {
                    log::warn!("Server wants client version {}, giving up", version);
                    return Ok(());
                }
                SessionSignal::Error { title, message } => {
                    log::error!("{}: {}", title, message);
                }
                SessionSignal::Disconnect => return Ok(()),
                SessionSignal::EnterGame
                | SessionSignal::AssetLoaded(_)
                | SessionSignal::FileRequested { .. } => {}
            }
        }

        if client.session().state().is_terminal() {
            log::info!("Session ended ({:?})", client.session().state());
            return Ok(());
        }

        if let Some(entered) = entered_at {
            let tick = client.tick_count().saturating_sub(entered);
            script.apply(tick, client.input_mut());
            if args.ping_interval > 0 && frame % args.ping_interval == 0 {
                client.ping();
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        for outcome in client.update(delta) {
            if outcome.sent_intent() {
                log::debug!("tick {} sent {:?}", client.tick_count(), outcome);
            }
        }
    }

    Ok(())
}
