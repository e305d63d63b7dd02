use crate::net::{Version, PROTOCOL_VERSION};
use crate::player::MovementConfig;

pub const DEFAULT_TICK_RATE: u32 = 8;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub tick_rate: u32,
    pub version: Version,
    /// Nonce sent in the hello; the server must answer with its hash.
    pub challenge: i32,
    pub movement: MovementConfig,
    pub chat_history: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            version: PROTOCOL_VERSION,
            challenge: 1_234_567,
            movement: MovementConfig::default(),
            chat_history: 200,
        }
    }
}

// Upper bound of a hello challenge.
const MAX_CHALLENGE: u64 = 11_092_003;

/// Fresh hello challenge, seeded from the current instant.
pub fn random_challenge() -> i32 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::time::Instant;

    let mut hasher = DefaultHasher::new();
    Instant::now().hash(&mut hasher);
    (hasher.finish() % MAX_CHALLENGE + 1) as i32
}
