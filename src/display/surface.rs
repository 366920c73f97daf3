//! Presentation surface seam
//!
//! Everything the player does to the screen goes through one trait behind
//! one mutex: frame attach, redraw, progress, status glyphs and control
//! affordances. The shell implements it over its widget tree; the playback
//! loop and the command layer both lock the same mutex, so no pixel or
//! widget is ever mutated by two tasks at once.

use crate::display::FrameBuffer;
use crate::player::PlayerState;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Scale of the progress track: reported values are permille of the stream.
pub const PROGRESS_SCALE: u64 = 1000;

/// Status glyph shown over the video area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Paused,
    Stopped,
}

/// Static presentation settings, applied once at player creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceLayout {
    /// Presentation width in pixels
    pub width: u32,
    /// Presentation height in pixels
    pub height: u32,
    /// Resize the surface to the decoded frame width once it is known
    pub auto_width: bool,
    /// Resize the surface to the decoded frame height once it is known
    pub auto_height: bool,
    /// Do not show transport buttons
    pub hide_controls: bool,
    /// Do not show the progress track
    pub hide_slider: bool,
    /// Do not show the paused/stopped glyphs
    pub hide_status: bool,
}

/// The player's view of the screen.
///
/// Attached frames are owned by the target until detached, so every pixel
/// write happens under the same lock as the widget updates.
pub trait RenderTarget: Send {
    /// Apply static layout before playback ever starts.
    fn configure(&mut self, layout: &SurfaceLayout);

    /// Present `frame` from now on. Replaces any previously attached frame.
    fn attach(&mut self, frame: FrameBuffer);

    /// Access the attached frame. `None` when nothing is attached.
    fn frame(&mut self) -> Option<&mut FrameBuffer>;

    /// Stop presenting and hand the frame back.
    fn detach(&mut self) -> Option<FrameBuffer>;

    /// Schedule a redraw of the video area.
    fn invalidate(&mut self);

    /// Move the progress track. `permille` is `0..=PROGRESS_SCALE`.
    fn set_progress(&mut self, permille: u64);

    /// Show a status glyph over the video.
    fn show_overlay(&mut self, overlay: Overlay);

    /// Hide any status glyph.
    fn clear_overlay(&mut self);

    /// Apply the control affordances for `state` (which buttons respond).
    fn apply_controls(&mut self, state: PlayerState);

    /// Hide or show the whole control row.
    fn set_controls_hidden(&mut self, hidden: bool);
}

/// The render lock. Every surface and pixel mutation is bracketed by it.
pub type SharedTarget = Arc<Mutex<dyn RenderTarget>>;

/// Put the surface into its stopped shape: controls for [`PlayerState::Stopped`]
/// and the stopped glyph unless status glyphs are hidden.
pub(crate) fn present_stopped(target: &mut dyn RenderTarget, hide_status: bool) {
    target.apply_controls(PlayerState::Stopped);
    if !hide_status {
        target.show_overlay(Overlay::Stopped);
    }
}
