use crate::net::{EncryptionMultiples, FileKind, MapId, PlayerId, SequenceStart, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unstarted,
    AwaitingReply,
    Connected,
    InGame,
    Failed,
    Closed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Closed)
    }

    /// File replies are only meaningful after the server accepted us.
    pub fn accepts_files(&self) -> bool {
        matches!(self, SessionState::Connected | SessionState::InGame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDownload {
    pub kind: FileKind,
    pub id: i32,
}

/// Files the server told us to fetch. At most one request is in flight.
#[derive(Debug, Clone, Default)]
pub struct DownloadQueue {
    pending: Vec<PendingDownload>,
}

impl DownloadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: FileKind, id: i32) {
        self.pending.push(PendingDownload { kind, id });
    }

    /// Takes the most recently queued download.
    pub fn pop(&mut self) -> Option<PendingDownload> {
        self.pending.pop()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingDownload> {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub challenge: i32,
    pub player_id: Option<PlayerId>,
    pub encryption: Option<EncryptionMultiples>,
    pub sequence_start: Option<SequenceStart>,
    pub server_version: Option<Version>,
    pub map_id: MapId,
    pub warp_map_id: MapId,
    pub warp_queued: bool,
    pub downloads: DownloadQueue,
    state: SessionState,
}

impl Session {
    pub fn new(challenge: i32) -> Self {
        Self {
            challenge,
            player_id: None,
            encryption: None,
            sequence_start: None,
            server_version: None,
            map_id: 0,
            warp_map_id: 0,
            warp_queued: false,
            downloads: DownloadQueue::new(),
            state: SessionState::Unstarted,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_in_game(&self) -> bool {
        self.state == SessionState::InGame
    }

    pub(crate) fn transition(&mut self, next: SessionState) {
        if self.state != next {
            log::info!("Session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Ends the session. Later replies and controller ticks become no-ops.
    pub fn close(&mut self) {
        if !self.state.is_terminal() {
            self.transition(SessionState::Closed);
        }
        self.downloads.clear();
        self.warp_queued = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_pops_most_recent_first() {
        let mut queue = DownloadQueue::new();
        queue.push(FileKind::Item, 1);
        queue.push(FileKind::Npc, 1);

        assert_eq!(queue.pop().map(|d| d.kind), Some(FileKind::Npc));
        assert_eq!(queue.pop().map(|d| d.kind), Some(FileKind::Item));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn close_keeps_failed_state() {
        let mut session = Session::new(1);
        session.transition(SessionState::Failed);
        session.close();
        assert_eq!(session.state(), SessionState::Failed);

        let mut session = Session::new(1);
        session.transition(SessionState::InGame);
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!session.is_in_game());
    }
}
