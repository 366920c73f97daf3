//! Decode engine seam
//!
//! The playback core never decodes JPEG itself; it drives an external engine
//! (on the target hardware, the JPEG codec peripheral) through these traits.
//! Shells bind the real accelerator, tests bind stubs.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Frame geometry parsed from a JPEG header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Encoded width in pixels, before any stride alignment
    pub width: u32,
    /// Encoded height in pixels
    pub height: u32,
}

/// Decode engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long one decode may run before the engine gives up on the frame
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10),
        }
    }
}

/// Errors surfaced by a decode engine.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The engine did not finish within its configured timeout
    #[error("decode timed out")]
    Timeout,

    /// The compressed data could not be parsed
    #[error("malformed JPEG data: {0}")]
    Malformed(String),

    /// The caller's output buffer cannot hold the decoded frame
    #[error("output buffer too small for decoded frame")]
    OutputTooSmall,
}

/// One decode engine instance.
///
/// Engines are stateful (the hardware unit keeps per-stream context), so the
/// playback loop creates one per session and drops it to release the unit.
pub trait JpegDecoder: Send {
    /// Parse the header of the frame at the start of `data` without
    /// producing pixels.
    fn header_info(&mut self, data: &[u8]) -> Result<FrameInfo, DecodeError>;

    /// Decode one frame from `data` into RGB565 pixels in `output`.
    ///
    /// Returns the number of bytes written. `data` may extend past the frame;
    /// the engine stops at the end-of-image marker it parses itself.
    fn decode(&mut self, data: &[u8], output: &mut [u8]) -> Result<usize, DecodeError>;
}

/// Factory for decode engines.
pub trait DecoderProvider: Send + Sync {
    /// Create a fresh engine.
    fn new_engine(&self, config: &EngineConfig) -> Result<Box<dyn JpegDecoder>, DecodeError>;
}
