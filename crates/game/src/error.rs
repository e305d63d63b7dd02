use crate::net::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server broke the handshake contract. The session is torn down.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    /// The server refused the session (ban, outdated client).
    #[error("server rejected the connection: {0}")]
    ServerRejection(String),
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ClientError {
    /// Fatal errors abort the session; the rest only halt progression.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::ProtocolViolation(_) | ClientError::MissingCollaborator(_)
        )
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
