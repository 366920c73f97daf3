//! Playback observability counters
//!
//! Recoverable playback problems (skipped frames, missing boundaries) never
//! cross the API as errors; they land here instead. All fields use atomic
//! operations so the decode loop and the shell can share one instance.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one player, accumulated across playback sessions.
pub struct PlaybackStats {
    /// Frames decoded and presented
    pub frames_decoded: AtomicU64,

    /// Frames lost to a decoder failure (including its internal timeout)
    pub decode_failures: AtomicU64,

    /// Chunks in which no end-of-image marker was found
    pub boundary_misses: AtomicU64,

    /// Compressed bytes consumed by presented frames
    pub bytes_consumed: AtomicU64,

    /// Completed passes over the stream while repeat was enabled
    pub passes_completed: AtomicU64,
}

impl PlaybackStats {
    pub fn new() -> Self {
        Self {
            frames_decoded: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            boundary_misses: AtomicU64::new(0),
            bytes_consumed: AtomicU64::new(0),
            passes_completed: AtomicU64::new(0),
        }
    }

    /// Record a decoded and presented frame of `compressed_len` bytes
    pub fn record_frame(&self, compressed_len: usize) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_consumed
            .fetch_add(compressed_len as u64, Ordering::Relaxed);
    }

    /// Record a frame lost to a decoder failure
    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a chunk with no frame boundary
    pub fn record_boundary_miss(&self) {
        self.boundary_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed pass over the stream
    pub fn record_pass(&self) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of frames decoded
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded.load(Ordering::Relaxed)
    }

    /// Get the number of decode failures
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// Get the number of chunks without a boundary
    pub fn boundary_misses(&self) -> u64 {
        self.boundary_misses.load(Ordering::Relaxed)
    }

    /// Get the compressed bytes consumed
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed.load(Ordering::Relaxed)
    }

    /// Get the number of completed passes
    pub fn passes_completed(&self) -> u64 {
        self.passes_completed.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counters
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            frames_decoded: self.frames_decoded(),
            decode_failures: self.decode_failures(),
            boundary_misses: self.boundary_misses(),
            bytes_consumed: self.bytes_consumed(),
            passes_completed: self.passes_completed(),
        }
    }
}

impl Default for PlaybackStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of playback counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSummary {
    pub frames_decoded: u64,
    pub decode_failures: u64,
    pub boundary_misses: u64,
    pub bytes_consumed: u64,
    pub passes_completed: u64,
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames ({} decode failures, {} boundary misses), {} bytes, {} passes",
            self.frames_decoded,
            self.decode_failures,
            self.boundary_misses,
            self.bytes_consumed,
            self.passes_completed
        )
    }
}
