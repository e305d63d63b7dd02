/// Tick durations of the movement controller.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MovementConfig {
    pub walk_ticks: i32,
    pub face_ticks: i32,
    pub sit_ticks: i32,
    pub attack_ticks: i32,

    /// How long a released direction is still used to aim an attack.
    pub direction_memory_ticks: i32,

    /// While an attack animation has more ticks left than this, it owns the tick.
    pub attack_hold_threshold: u8,
    /// While more ticks than this remain, movement stays locked.
    pub attack_release_threshold: u8,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_ticks: 4,
            face_ticks: 3,
            sit_ticks: 3,
            attack_ticks: 3,

            direction_memory_ticks: 2,

            attack_hold_threshold: 2,
            attack_release_threshold: 1,
        }
    }
}
