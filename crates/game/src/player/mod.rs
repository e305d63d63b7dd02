mod animation;
mod config;
mod controller;

pub use animation::{
    Animation, AnimationTable, CharacterAnimation, CharacterAnimations, FrameClock, NpcAnimation,
    NpcAnimations, ATTACK_ANIMATION_FRAMES, WALK_ANIMATION_FRAMES,
};
pub use config::MovementConfig;
pub use controller::{MovementController, TickContext, TickOutcome};
