//! Player error taxonomy
//!
//! Fatal errors end the playback session: the loop tears down, buffers are
//! released and the player returns to `Stopped`. Recoverable errors never
//! cross the API; the loop absorbs them, logs them and counts them in
//! [`PlaybackStats`](crate::player::PlaybackStats).

use crate::decoder::DecodeError;
use std::io;
use thiserror::Error;

/// Errors produced while creating a player or starting a playback session.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Required configuration is missing or inconsistent. Nothing is spawned.
    #[error("invalid configuration: {0}")]
    Config(&'static str),

    /// The media source failed to open, size, read or seek. Fatal to the session.
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),

    /// A buffer of the given size could not be taken from frame memory. Fatal.
    #[error("out of frame memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// The first-frame probe read produced no bytes to size buffers from. Fatal.
    #[error("cannot determine video size from the stream head")]
    InvalidSize,

    /// The decode engine could not start or rejected the first frame's
    /// header. Fatal, the session never reaches `Playing`.
    #[error("video header rejected: {0}")]
    DecodeHeader(DecodeError),

    /// A frame failed to decode mid-stream. Recoverable, the frame is skipped.
    #[error("frame decode failed: {0}")]
    DecodeFrame(DecodeError),

    /// No end-of-image marker in the current chunk. Recoverable, treated as
    /// a zero-length frame for that iteration.
    #[error("no frame boundary in current chunk")]
    BoundaryNotFound,
}

impl PlayerError {
    /// Recoverable errors are absorbed by the playback loop; fatal ones end
    /// the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlayerError::DecodeFrame(_) | PlayerError::BoundaryNotFound
        )
    }
}
