mod handshake;
mod signal;
mod state;

pub use handshake::{
    error_title, HandshakeContext, HandshakeMachine, BLOCKED_TITLE, CHALLENGE_FAILED_TITLE,
};
pub use signal::SessionSignal;
pub use state::{DownloadQueue, PendingDownload, Session, SessionState};
