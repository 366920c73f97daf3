//! The decode/render loop
//!
//! One [`PlaybackSession`] is owned by one spawned task. It opens the
//! stream, sizes the buffers from the first frame's header, then repeats
//! read / scan / decode / present until the shared state cell says stop.
//! Teardown runs on every exit path and releases everything the session
//! acquired.
//!
//! The loop body is synchronous ([`step`](PlaybackSession::step)); the task
//! wrapper only adds the paused polling wait and a yield between frames, so
//! tests drive the session step by step without a runtime.

use crate::config::Backend;
use crate::decoder::{EngineConfig, FRAME_ALIGN, JpegDecoder, align_up, find_frame_end};
use crate::display::surface::present_stopped;
use crate::display::{FrameBuffer, Overlay, PROGRESS_SCALE, SharedTarget, SurfaceLayout, frame_bytes};
use crate::error::PlayerError;
use crate::player::state::{PlayerState, StateCell};
use crate::player::stats::PlaybackStats;
use crate::source::MediaSource;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How long the loop sleeps between state polls while paused.
const PAUSE_POLL: Duration = Duration::from_millis(500);

/// Cells shared between the command layer and the loop task. Commands only
/// ever flip these; the session's buffers are never touched from outside.
#[derive(Clone)]
pub(crate) struct SessionContext {
    pub(crate) state: StateCell,
    /// Read once per end-of-stream
    pub(crate) looping: Arc<AtomicBool>,
    /// Stop arrived while the session was still starting up
    pub(crate) halt: Arc<AtomicBool>,
    /// Single-session latch; cleared as the very last act of teardown
    pub(crate) active: Arc<AtomicBool>,
    pub(crate) stats: Arc<PlaybackStats>,
}

impl SessionContext {
    pub(crate) fn new() -> SessionContext {
        SessionContext {
            state: StateCell::new(),
            looping: Arc::new(AtomicBool::new(false)),
            halt: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(PlaybackStats::new()),
        }
    }

    /// Win the single-session latch. Only the winner may spawn a loop.
    pub(crate) fn activate(&self) -> bool {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// A frame was decoded and presented
    Presented,
    /// No frame this iteration: missing boundary or failed decode
    Dropped,
    /// End of stream reached and the stream was rewound for another pass
    Rewound,
    /// The session is done; the state cell is now `Stopped`
    Finished,
}

/// One playback run over one stream, owned by the loop task.
pub(crate) struct PlaybackSession {
    path: PathBuf,
    backend: Backend,
    ctx: SessionContext,
    target: SharedTarget,
    layout: SurfaceLayout,
    chunk_size: usize,
    engine_config: EngineConfig,

    source: Option<Box<dyn MediaSource>>,
    engine: Option<Box<dyn JpegDecoder>>,
    input: Option<Box<[u8]>>,
    total_size: u64,
    consumed: u64,

    paused_overlay: bool,
    frames: u64,
    dropped: u64,
}

impl PlaybackSession {
    pub(crate) fn new(
        path: PathBuf,
        backend: Backend,
        ctx: SessionContext,
        target: SharedTarget,
        layout: SurfaceLayout,
        chunk_size: usize,
        engine_config: EngineConfig,
    ) -> PlaybackSession {
        PlaybackSession {
            path,
            backend,
            ctx,
            target,
            layout,
            chunk_size,
            engine_config,
            source: None,
            engine: None,
            input: None,
            total_size: 0,
            consumed: 0,
            paused_overlay: false,
            frames: 0,
            dropped: 0,
        }
    }

    /// Run the session to completion. Teardown happens on every exit path.
    pub(crate) async fn run(mut self) {
        info!("PlaybackSession: started");

        match self.open_stream() {
            Ok(()) => loop {
                match self.ctx.state.get() {
                    PlayerState::Stopped => break,
                    PlayerState::Paused => self.pause_poll().await,
                    PlayerState::Playing => {
                        self.step();
                        // step() never awaits; yield so other tasks on this
                        // runtime get polled between frames.
                        tokio::task::yield_now().await;
                    }
                }
            },
            Err(e) => error!("PlaybackSession: startup failed: {e}"),
        }

        self.teardown();
    }

    /// Open the stream, size the buffers from the first frame's header and
    /// hand the output frame to the render target. On success the state is
    /// `Playing` unless a stop already arrived.
    fn open_stream(&mut self) -> Result<(), PlayerError> {
        info!("PlaybackSession: opening {}", self.path.display());

        let source = self.source.insert(self.backend.storage.open(&self.path)?);
        self.total_size = source.byte_len()?;

        let input = match self.backend.memory.alloc(self.chunk_size) {
            Some(buf) => self.input.insert(buf),
            None => return Err(PlayerError::OutOfMemory(self.chunk_size)),
        };

        let engine = self.engine.insert(
            self.backend
                .decoder
                .new_engine(&self.engine_config)
                .map_err(PlayerError::DecodeHeader)?,
        );

        let probed = match source.read_chunk(input) {
            Ok(n) => n,
            Err(e) => {
                warn!("PlaybackSession: probe read failed: {e}");
                0
            }
        };
        if probed == 0 {
            return Err(PlayerError::InvalidSize);
        }

        let header = engine
            .header_info(&input[..probed])
            .map_err(PlayerError::DecodeHeader)?;
        info!(
            "PlaybackSession: video size {}x{}",
            header.width, header.height
        );

        // The decoder writes whole 16-pixel-aligned rows, so the frame is
        // allocated and attached at the aligned width.
        let width = align_up(header.width as usize, FRAME_ALIGN) as u32;
        let len = frame_bytes(header.width, header.height);
        let pixels = match self.backend.memory.alloc(len) {
            Some(buf) => buf,
            None => return Err(PlayerError::OutOfMemory(len)),
        };

        {
            let mut target = self.target.lock().unwrap();
            target.attach(FrameBuffer::new(pixels, width, header.height));
            target.invalidate();
            target.apply_controls(PlayerState::Playing);
            target.clear_overlay();
        }

        if self.ctx.halt.load(Ordering::SeqCst) {
            info!("PlaybackSession: stop requested during startup");
            return Ok(());
        }

        self.ctx.state.try_set(PlayerState::Playing);
        // A stop can land between the check above and the transition; its
        // try_set would be a no-op on the still-stopped cell. Re-read the
        // latch and revert so that stop is not lost.
        if self.ctx.halt.load(Ordering::SeqCst) {
            info!("PlaybackSession: stop requested during startup");
            self.ctx.state.set(PlayerState::Stopped);
            return Ok(());
        }

        source.seek_to(0)?;
        self.consumed = 0;
        Ok(())
    }

    /// One read / scan / decode / present iteration.
    fn step(&mut self) -> StepOutcome {
        self.paused_overlay = false;

        let (Some(source), Some(input), Some(engine)) = (
            self.source.as_mut(),
            self.input.as_mut(),
            self.engine.as_mut(),
        ) else {
            return StepOutcome::Finished;
        };

        let n = match source.read_chunk(input) {
            Ok(n) => n,
            Err(e) => {
                warn!("PlaybackSession: read failed: {e}");
                0
            }
        };

        if n == 0 {
            // End of stream: rewind for another pass or stop the session.
            if self.ctx.looping.load(Ordering::SeqCst) {
                match source.seek_to(0) {
                    Ok(()) => {
                        self.consumed = 0;
                        self.ctx.stats.record_pass();
                        info!("PlaybackSession: end of stream, playing again");
                        return StepOutcome::Rewound;
                    }
                    Err(e) => error!("PlaybackSession: rewind failed: {e}"),
                }
            } else {
                info!("PlaybackSession: playback finished");
            }
            self.ctx.state.set(PlayerState::Stopped);
            return StepOutcome::Finished;
        }

        let frame_len = find_frame_end(&input[..n]).unwrap_or(0);
        // The engine consumes aligned extents; never hand it more than was
        // actually read.
        let aligned_len = align_up(frame_len, FRAME_ALIGN).min(n);

        let mut presented = false;
        {
            let mut target = self.target.lock().unwrap();
            if aligned_len == 0 {
                self.ctx.stats.record_boundary_miss();
                debug!("PlaybackSession: no frame boundary in chunk");
            } else if let Some(frame) = target.frame() {
                match engine.decode(&input[..aligned_len], frame.pixels_mut()) {
                    Ok(_) => presented = true,
                    Err(e) => {
                        warn!("PlaybackSession: frame decode failed: {e}");
                        self.ctx.stats.record_decode_failure();
                    }
                }
            }

            if presented {
                // Advance by the true frame length, not the aligned one;
                // the seek below re-syncs the stream to the frame boundary.
                self.consumed += frame_len as u64;
                self.ctx.stats.record_frame(frame_len);
                self.frames += 1;
            } else {
                self.dropped += 1;
            }

            target.invalidate();
            target.set_progress(progress_permille(self.consumed, self.total_size));
        }

        if presented {
            if let Err(e) = source.seek_to(self.consumed) {
                error!("PlaybackSession: seek failed: {e}");
                self.ctx.state.set(PlayerState::Stopped);
                return StepOutcome::Finished;
            }
            StepOutcome::Presented
        } else {
            StepOutcome::Dropped
        }
    }

    /// Paused branch: show the glyph once, then sleep and re-check.
    async fn pause_poll(&mut self) {
        if !self.paused_overlay {
            self.paused_overlay = true;
            if !self.layout.hide_status {
                self.target.lock().unwrap().show_overlay(Overlay::Paused);
            }
        }
        tokio::time::sleep(PAUSE_POLL).await;
    }

    /// Blank the display, give every buffer back and clear the latch.
    fn teardown(&mut self) {
        let detached = {
            let mut target = self.target.lock().unwrap();
            if let Some(frame) = target.frame() {
                frame.clear();
            }
            target.invalidate();
            target.set_progress(0);
            present_stopped(&mut *target, self.layout.hide_status);
            target.detach()
        };

        if let Some(frame) = detached {
            self.backend.memory.release(frame.into_pixels());
        }
        if let Some(input) = self.input.take() {
            self.backend.memory.release(input);
        }
        self.engine = None;
        self.source = None;

        self.ctx.state.set(PlayerState::Stopped);
        info!(
            "PlaybackSession: finished ({} frames, {} dropped)",
            self.frames, self.dropped
        );
        self.ctx.active.store(false, Ordering::SeqCst);
    }
}

fn progress_permille(consumed: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (consumed * PROGRESS_SCALE / total).min(PROGRESS_SCALE)
}
