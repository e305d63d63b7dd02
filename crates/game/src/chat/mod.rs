use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::net::{PlayerId, ServerEvent};
use crate::world::World;

/// Ticks a speech bubble stays above a character.
pub const CHAT_BUBBLE_TICKS: u32 = 40;
const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChatTab {
    Local,
    Global,
    Group,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatEntry {
    pub name: String,
    pub tab: ChatTab,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub message: String,
    pub ticks: u32,
}

impl ChatBubble {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ticks: CHAT_BUBBLE_TICKS,
        }
    }
}

/// Chat history and speech bubbles fed by talk and message packets.
#[derive(Debug)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
    capacity: usize,
    bubbles: HashMap<PlayerId, ChatBubble>,
    ping_started: Option<Instant>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            bubbles: HashMap::new(),
            ping_started: None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.back()
    }

    pub fn bubble(&self, player_id: PlayerId) -> Option<&ChatBubble> {
        self.bubbles.get(&player_id)
    }

    pub fn start_ping(&mut self, now: Instant) {
        self.ping_started = Some(now);
    }

    /// Applies a chat-related event. Returns false for events this log ignores.
    pub fn handle(
        &mut self,
        event: &ServerEvent,
        world: &World,
        local_player: Option<PlayerId>,
        now: Instant,
    ) -> bool {
        match event {
            ServerEvent::TalkPlayer { player_id, message } => {
                let Some(character) = world.character(*player_id) else {
                    log::debug!("Talk from unknown player {}", player_id);
                    return true;
                };
                self.bubbles.insert(*player_id, ChatBubble::new(message.clone()));
                let name = character.name.clone();
                self.push(name, ChatTab::Local, message.clone());
            }
            ServerEvent::TalkServer { message } => {
                self.push("Server".to_string(), ChatTab::Local, message.clone());
            }
            ServerEvent::TalkAnnounce {
                player_name,
                message,
            } => {
                if let Some(player_id) = local_player {
                    self.bubbles.insert(player_id, ChatBubble::new(message.clone()));
                }
                self.push(player_name.clone(), ChatTab::Local, message.clone());
            }
            ServerEvent::MessageOpen { message } => {
                self.push("System".to_string(), ChatTab::Local, message.clone());
            }
            ServerEvent::MessagePong => {
                let Some(started) = self.ping_started.take() else {
                    return true;
                };
                let delta = now.saturating_duration_since(started).as_millis();
                self.push(String::new(), ChatTab::System, format!("{}ms ping", delta));
            }
            _ => return false,
        }
        true
    }

    /// Expires speech bubbles.
    pub fn tick(&mut self) {
        self.bubbles.retain(|_, bubble| {
            bubble.ticks = bubble.ticks.saturating_sub(1);
            bubble.ticks > 0
        });
    }

    fn push(&mut self, name: String, tab: ChatTab, message: String) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        log::info!("[{:?}] {}: {}", tab, name, message);
        self.entries.push_back(ChatEntry { name, tab, message });
    }
}
