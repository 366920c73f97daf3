//! Frame discovery and decoding
//!
//! Finds JPEG frame boundaries in the raw stream and defines the seam to the
//! hardware decode engine that turns them into pixels.

pub mod boundary;
pub mod engine;

pub use boundary::{EOI_MARKER, FRAME_ALIGN, align_up, find_frame_end};
pub use engine::{DecodeError, DecoderProvider, EngineConfig, FrameInfo, JpegDecoder};
