use std::collections::HashMap;
use std::hash::Hash;

use crate::net::{Coords, Direction, PlayerId};

pub const WALK_ANIMATION_FRAMES: u8 = 4;
pub const ATTACK_ANIMATION_FRAMES: u8 = 2;

/// Counts the remaining ticks of an animation and cycles its visual frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    ticks: u8,
    frame: u8,
    frame_count: u8,
}

impl FrameClock {
    pub fn new(ticks: u8, frame_count: u8) -> Self {
        Self {
            ticks,
            frame: 0,
            frame_count: frame_count.max(1),
        }
    }

    pub fn ticks(&self) -> u8 {
        self.ticks
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn is_on_last_frame(&self) -> bool {
        self.frame == self.frame_count - 1
    }

    pub fn is_finished(&self) -> bool {
        self.ticks == 0
    }

    pub fn advance(&mut self) {
        if self.ticks == 0 {
            return;
        }
        self.frame = (self.frame + 1) % self.frame_count;
        self.ticks -= 1;
    }
}

pub trait Animation {
    fn clock(&self) -> &FrameClock;

    fn clock_mut(&mut self) -> &mut FrameClock;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterAnimation {
    Walking {
        from: Coords,
        to: Coords,
        direction: Direction,
        clock: FrameClock,
    },
    MeleeAttack {
        direction: Direction,
        clock: FrameClock,
    },
    RangedAttack {
        direction: Direction,
        clock: FrameClock,
    },
}

impl CharacterAnimation {
    pub fn walk(from: Coords, to: Coords, direction: Direction, ticks: u8) -> Self {
        Self::Walking {
            from,
            to,
            direction,
            clock: FrameClock::new(ticks, WALK_ANIMATION_FRAMES),
        }
    }

    pub fn melee(direction: Direction, ticks: u8) -> Self {
        Self::MeleeAttack {
            direction,
            clock: FrameClock::new(ticks, ATTACK_ANIMATION_FRAMES),
        }
    }

    pub fn ranged(direction: Direction, ticks: u8) -> Self {
        Self::RangedAttack {
            direction,
            clock: FrameClock::new(ticks, ATTACK_ANIMATION_FRAMES),
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Walking { direction, .. }
            | Self::MeleeAttack { direction, .. }
            | Self::RangedAttack { direction, .. } => *direction,
        }
    }

    pub fn is_walking(&self) -> bool {
        matches!(self, Self::Walking { .. })
    }

    /// Remaining ticks when this is an attack of either kind.
    pub fn attack_ticks(&self) -> Option<u8> {
        match self {
            Self::MeleeAttack { clock, .. } | Self::RangedAttack { clock, .. } => {
                Some(clock.ticks())
            }
            Self::Walking { .. } => None,
        }
    }

    pub fn is_walk_on_last_frame(&self) -> bool {
        match self {
            Self::Walking { clock, .. } => clock.is_on_last_frame(),
            _ => false,
        }
    }
}

impl Animation for CharacterAnimation {
    fn clock(&self) -> &FrameClock {
        match self {
            Self::Walking { clock, .. }
            | Self::MeleeAttack { clock, .. }
            | Self::RangedAttack { clock, .. } => clock,
        }
    }

    fn clock_mut(&mut self) -> &mut FrameClock {
        match self {
            Self::Walking { clock, .. }
            | Self::MeleeAttack { clock, .. }
            | Self::RangedAttack { clock, .. } => clock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpcAnimation {
    Attack {
        coords: Coords,
        direction: Direction,
        clock: FrameClock,
    },
}

impl NpcAnimation {
    pub fn attack(coords: Coords, direction: Direction, ticks: u8) -> Self {
        Self::Attack {
            coords,
            direction,
            clock: FrameClock::new(ticks, ATTACK_ANIMATION_FRAMES),
        }
    }
}

impl Animation for NpcAnimation {
    fn clock(&self) -> &FrameClock {
        match self {
            Self::Attack { clock, .. } => clock,
        }
    }

    fn clock_mut(&mut self) -> &mut FrameClock {
        match self {
            Self::Attack { clock, .. } => clock,
        }
    }
}

/// At most one running animation per owner. Inserting replaces.
#[derive(Debug, Clone)]
pub struct AnimationTable<K, A> {
    running: HashMap<K, A>,
}

pub type CharacterAnimations = AnimationTable<PlayerId, CharacterAnimation>;
pub type NpcAnimations = AnimationTable<i32, NpcAnimation>;

impl<K, A> Default for AnimationTable<K, A> {
    fn default() -> Self {
        Self {
            running: HashMap::new(),
        }
    }
}

impl<K, A> AnimationTable<K, A>
where
    K: Copy + Eq + Hash,
    A: Animation,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, owner: K, animation: A) -> Option<A> {
        self.running.insert(owner, animation)
    }

    pub fn get(&self, owner: K) -> Option<&A> {
        self.running.get(&owner)
    }

    pub fn remove(&mut self, owner: K) -> Option<A> {
        self.running.remove(&owner)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn clear(&mut self) {
        self.running.clear();
    }

    /// Advances every animation one tick and drops the ones that ran out.
    pub fn tick(&mut self) {
        self.running.retain(|_, animation| {
            animation.clock_mut().advance();
            !animation.clock().is_finished()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_reaches_last_frame_before_finishing() {
        let mut clock = FrameClock::new(4, WALK_ANIMATION_FRAMES);
        for _ in 0..3 {
            assert!(!clock.is_on_last_frame());
            clock.advance();
        }
        assert!(clock.is_on_last_frame());
        assert_eq!(clock.ticks(), 1);

        clock.advance();
        assert!(clock.is_finished());
        clock.advance();
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn table_replaces_and_expires() {
        let mut table = CharacterAnimations::new();
        table.insert(
            1,
            CharacterAnimation::walk(Coords::new(0, 0), Coords::new(0, 1), Direction::Down, 4),
        );
        let previous = table.insert(1, CharacterAnimation::melee(Direction::Up, 2));
        assert!(previous.is_some_and(|a| a.is_walking()));
        assert_eq!(table.len(), 1);

        table.tick();
        assert_eq!(table.get(1).and_then(|a| a.attack_ticks()), Some(1));
        table.tick();
        assert!(table.is_empty());
    }

    #[test]
    fn attack_ticks_only_for_attacks() {
        let walk = CharacterAnimation::walk(Coords::new(0, 0), Coords::new(1, 0), Direction::Right, 4);
        assert_eq!(walk.attack_ticks(), None);
        assert_eq!(CharacterAnimation::ranged(Direction::Left, 3).attack_ticks(), Some(3));
        assert_eq!(walk.direction(), Direction::Right);
    }

    #[test]
    fn npc_attack_expires() {
        let mut table = NpcAnimations::new();
        table.insert(7, NpcAnimation::attack(Coords::new(2, 2), Direction::Left, 1));
        table.tick();
        assert!(table.get(7).is_none());
    }
}
