use crate::input::{Input, InputSampler};
use crate::net::{ClientIntent, Clock, Coords, Direction, NetworkSender, PlayerId};
use crate::session::Session;
use crate::world::{AttackKind, World, WorldView};

use super::animation::{CharacterAnimation, CharacterAnimations};
use super::config::MovementConfig;

/// Everything one controller tick reads or writes.
pub struct TickContext<'a> {
    pub session: &'a Session,
    pub world: &'a mut World,
    pub animations: &'a mut CharacterAnimations,
    pub input: &'a InputSampler,
    pub bus: &'a mut dyn NetworkSender,
    pub clock: &'a dyn Clock,
}

/// What the controller decided this tick. At most one intent is sent per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not in game, frozen, typing, or nothing held.
    Idle,
    /// An animation owns the tick, or the attempted action was rejected locally.
    Blocked,
    Attacked,
    Faced,
    OpenedDoor,
    SatInChair,
    Walked,
    ToggledSit,
}

impl TickOutcome {
    pub fn sent_intent(&self) -> bool {
        !matches!(self, TickOutcome::Idle | TickOutcome::Blocked)
    }
}

// Copy of the fields the decision needs, so the world can be mutated afterwards.
#[derive(Debug, Clone, Copy)]
struct Pose {
    player_id: PlayerId,
    coords: Coords,
    direction: Direction,
    standing: bool,
    weapon: i32,
}

#[derive(Debug)]
pub struct MovementController {
    config: MovementConfig,
    walk_ticks: i32,
    face_ticks: i32,
    sit_ticks: i32,
    attack_ticks: i32,
    direction_expire_ticks: i32,
    last_direction_held: Option<Direction>,
    frozen: bool,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            walk_ticks: config.walk_ticks,
            face_ticks: config.face_ticks,
            sit_ticks: config.sit_ticks,
            attack_ticks: config.attack_ticks,
            direction_expire_ticks: config.direction_memory_ticks,
            last_direction_held: None,
            frozen: false,
            config,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn walk_ticks(&self) -> i32 {
        self.walk_ticks
    }

    pub fn face_ticks(&self) -> i32 {
        self.face_ticks
    }

    pub fn sit_ticks(&self) -> i32 {
        self.sit_ticks
    }

    pub fn attack_ticks(&self) -> i32 {
        self.attack_ticks
    }

    pub fn last_direction_held(&self) -> Option<Direction> {
        self.last_direction_held
    }

    pub fn tick(&mut self, ctx: TickContext<'_>) -> TickOutcome {
        self.tick_timers();

        if self.frozen || !ctx.session.is_in_game() || ctx.input.is_typing() {
            return TickOutcome::Idle;
        }

        let Some(pose) = ctx
            .session
            .player_id
            .and_then(|id| ctx.world.character(id))
            .map(|c| Pose {
                player_id: c.player_id,
                coords: c.coords,
                direction: c.direction,
                standing: c.is_standing(),
                weapon: c.equipment.weapon,
            })
        else {
            return TickOutcome::Idle;
        };

        let direction_held = ctx.input.latest_direction();
        if let Some(direction) = direction_held {
            self.last_direction_held = Some(direction);
            self.direction_expire_ticks = self.config.direction_memory_ticks;
        }

        let animation = ctx.animations.get(pose.player_id);
        let walking = animation.is_some_and(CharacterAnimation::is_walking);
        let walk_on_last_frame = animation.is_some_and(CharacterAnimation::is_walk_on_last_frame);
        let attack_ticks_left = animation.and_then(CharacterAnimation::attack_ticks);

        if attack_ticks_left.is_some_and(|t| t > self.config.attack_hold_threshold) {
            return TickOutcome::Blocked;
        }

        if self.direction_expire_ticks == 0 {
            self.last_direction_held = None;
        }

        if self.attack_ticks <= 0 && ctx.input.is_held(Input::Attack) && pose.standing && !walking {
            return self.attack(pose, ctx);
        }

        if attack_ticks_left.is_some_and(|t| t > self.config.attack_release_threshold) {
            return TickOutcome::Blocked;
        }

        if let Some(held) = direction_held.filter(|_| pose.standing) {
            if !walking && self.face_ticks == 0 && pose.direction != held {
                return self.face(pose, held, ctx);
            }

            if ctx.session.warp_queued {
                log::trace!("Movement suspended until warp completes");
                return TickOutcome::Blocked;
            }

            let turning_mid_walk = walking && held != pose.direction && walk_on_last_frame;
            if self.walk_ticks == 0 || turning_mid_walk {
                return self.step(pose, held, ctx);
            }
        }

        if self.sit_ticks == 0 && ctx.input.is_held(Input::SitStand) {
            return self.toggle_sit(pose, ctx);
        }

        TickOutcome::Idle
    }

    fn tick_timers(&mut self) {
        self.face_ticks = (self.face_ticks - 1).max(0);
        self.walk_ticks = (self.walk_ticks - 1).max(0);
        self.sit_ticks = (self.sit_ticks - 1).max(0);
        self.attack_ticks = (self.attack_ticks - 1).max(-1);
        self.direction_expire_ticks = (self.direction_expire_ticks - 1).max(0);
    }

    fn attack(&mut self, pose: Pose, ctx: TickContext<'_>) -> TickOutcome {
        let kind = ctx.world.weapon_attack_kind(pose.weapon);
        // The animation keeps the facing from before the snap.
        let ticks = animation_ticks(self.config.attack_ticks);
        let animation = match kind {
            AttackKind::Melee => CharacterAnimation::melee(pose.direction, ticks),
            AttackKind::Ranged => CharacterAnimation::ranged(pose.direction, ticks),
        };
        ctx.animations.insert(pose.player_id, animation);

        let direction = self.last_direction_held.unwrap_or(pose.direction);
        if let Some(character) = ctx.world.character_mut(pose.player_id) {
            character.direction = direction;
        }

        ctx.bus.send(ClientIntent::Attack {
            direction,
            timestamp: ctx.clock.timestamp(),
        });
        self.attack_ticks = self.config.attack_ticks;
        log::trace!("Attack {:?} ({:?})", direction, kind);
        TickOutcome::Attacked
    }

    fn face(&mut self, pose: Pose, direction: Direction, ctx: TickContext<'_>) -> TickOutcome {
        if let Some(character) = ctx.world.character_mut(pose.player_id) {
            character.direction = direction;
        }
        ctx.bus.send(ClientIntent::Face { direction });
        self.face_ticks = self.config.face_ticks;
        TickOutcome::Faced
    }

    fn step(&mut self, pose: Pose, direction: Direction, ctx: TickContext<'_>) -> TickOutcome {
        let Some(to) = pose.coords.step(direction, ctx.world.bounds()) else {
            return TickOutcome::Blocked;
        };

        if ctx.world.door_at(to).is_some_and(|door| !door.open) {
            ctx.bus.send(ClientIntent::OpenDoor { coords: to });
            self.walk_ticks = self.config.walk_ticks;
            return TickOutcome::OpenedDoor;
        }

        if ctx.world.is_facing_chair_at(to, pose.direction) && !ctx.world.occupied(to) {
            ctx.bus.send(ClientIntent::SitChair { coords: to });
            return TickOutcome::SatInChair;
        }

        if !ctx.world.can_walk(to) {
            log::trace!("Cannot walk to {:?}", to);
            return TickOutcome::Blocked;
        }

        ctx.animations.insert(
            pose.player_id,
            CharacterAnimation::walk(
                pose.coords,
                to,
                direction,
                animation_ticks(self.config.walk_ticks),
            ),
        );
        if let Some(character) = ctx.world.character_mut(pose.player_id) {
            character.direction = direction;
            character.coords = to;
        }

        ctx.bus.send(ClientIntent::Walk {
            direction,
            coords: to,
            timestamp: ctx.clock.timestamp(),
        });
        self.walk_ticks = self.config.walk_ticks;
        self.face_ticks = self.config.face_ticks;
        self.sit_ticks = self.config.sit_ticks;
        TickOutcome::Walked
    }

    fn toggle_sit(&mut self, pose: Pose, ctx: TickContext<'_>) -> TickOutcome {
        let intent = if pose.standing {
            ClientIntent::Sit
        } else {
            ClientIntent::Stand
        };
        ctx.bus.send(intent);
        self.sit_ticks = self.config.sit_ticks;
        TickOutcome::ToggledSit
    }
}

fn animation_ticks(ticks: i32) -> u8 {
    ticks.clamp(0, i32::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MapFile;
    use crate::net::{FixedClock, Outbox};
    use crate::session::SessionState;
    use crate::world::{Character, SitState};

    struct Harness {
        controller: MovementController,
        session: Session,
        world: World,
        animations: CharacterAnimations,
        input: InputSampler,
        bus: Outbox,
    }

    impl Harness {
        fn new() -> Self {
            let mut session = Session::new(1);
            session.player_id = Some(1);
            session.transition(SessionState::InGame);

            let mut world = World::with_map(MapFile {
                width: 9,
                height: 9,
                ..Default::default()
            });
            world.add_character(Character::new(1, "me", Coords::new(5, 5)));

            Self {
                controller: MovementController::default(),
                session,
                world,
                animations: CharacterAnimations::new(),
                input: InputSampler::new(),
                bus: Outbox::new(),
            }
        }

        fn tick(&mut self) -> TickOutcome {
            let outcome = self.controller.tick(TickContext {
                session: &self.session,
                world: &mut self.world,
                animations: &mut self.animations,
                input: &self.input,
                bus: &mut self.bus,
                clock: &FixedClock(100),
            });
            self.animations.tick();
            outcome
        }
    }

    #[test]
    fn timers_clamp() {
        let mut harness = Harness::new();
        for _ in 0..10 {
            harness.tick();
        }
        assert_eq!(harness.controller.walk_ticks(), 0);
        assert_eq!(harness.controller.face_ticks(), 0);
        assert_eq!(harness.controller.sit_ticks(), 0);
        assert_eq!(harness.controller.attack_ticks(), -1);
    }

    #[test]
    fn idle_outside_game() {
        let mut harness = Harness::new();
        harness.session.close();
        harness.input.press(Input::Attack);

        for _ in 0..5 {
            assert_eq!(harness.tick(), TickOutcome::Idle);
        }
        assert!(harness.bus.queued().is_empty());
    }

    #[test]
    fn frozen_controller_sends_nothing() {
        let mut harness = Harness::new();
        harness.controller.freeze();
        harness.input.press(Input::Down);

        for _ in 0..5 {
            assert_eq!(harness.tick(), TickOutcome::Idle);
        }

        harness.controller.unfreeze();
        assert_eq!(harness.tick(), TickOutcome::Walked);
    }

    #[test]
    fn sit_toggle_after_cooldown() {
        let mut harness = Harness::new();
        harness.input.press(Input::SitStand);

        let outcomes: Vec<_> = (0..4).map(|_| harness.tick()).collect();
        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Idle,
                TickOutcome::Idle,
                TickOutcome::ToggledSit,
                TickOutcome::Idle,
            ]
        );
        assert_eq!(harness.bus.queued(), &[ClientIntent::Sit]);
    }

    #[test]
    fn seated_character_stands_instead_of_walking() {
        let mut harness = Harness::new();
        if let Some(c) = harness.world.character_mut(1) {
            c.sit_state = SitState::Floor;
        }
        harness.input.press(Input::Up);
        harness.input.press(Input::SitStand);

        for _ in 0..4 {
            harness.tick();
        }
        assert_eq!(harness.bus.queued(), &[ClientIntent::Stand]);
    }

    #[test]
    fn attack_uses_recently_released_direction() {
        let mut harness = Harness::new();
        harness.controller.attack_ticks = 0;
        harness.controller.walk_ticks = 100;
        harness.controller.face_ticks = 100;

        harness.input.press(Input::Left);
        assert_eq!(harness.tick(), TickOutcome::Idle);
        harness.input.release(Input::Left);
        harness.input.press(Input::Attack);

        assert_eq!(harness.tick(), TickOutcome::Attacked);
        assert_eq!(
            harness.world.character(1).map(|c| c.direction),
            Some(Direction::Left)
        );
        assert_eq!(
            harness.animations.get(1).map(CharacterAnimation::direction),
            Some(Direction::Down)
        );
        assert!(matches!(
            harness.bus.queued(),
            [ClientIntent::Attack {
                direction: Direction::Left,
                timestamp: 100
            }]
        ));
    }

    #[test]
    fn remembered_direction_expires() {
        let mut harness = Harness::new();
        harness.controller.walk_ticks = 100;
        harness.controller.face_ticks = 100;

        harness.input.press(Input::Left);
        harness.tick();
        harness.input.release(Input::Left);
        for _ in 0..3 {
            harness.tick();
        }
        harness.input.press(Input::Attack);

        assert_eq!(harness.tick(), TickOutcome::Attacked);
        assert_eq!(harness.controller.last_direction_held(), None);
        assert_eq!(
            harness.world.character(1).map(|c| c.direction),
            Some(Direction::Down)
        );
    }
}
