//! Transport commands
//!
//! [`Player`] is the cloneable handle the shell keeps: it validates the
//! configuration, owns the shared cells and spawns one [`PlaybackSession`]
//! task per playback run. Commands are cheap flag flips plus surface
//! updates under the render lock; the session notices them on its next
//! iteration.

use crate::config::{Backend, PlayerConfig};
use crate::decoder::EngineConfig;
use crate::display::surface::present_stopped;
use crate::display::{SharedTarget, SurfaceLayout};
use crate::error::PlayerError;
use crate::player::session::{PlaybackSession, SessionContext};
use crate::player::state::PlayerState;
use crate::player::stats::PlaybackStats;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

struct Paths {
    current: PathBuf,
    /// Replacement requested while a session was active; applied on stop
    pending: Option<PathBuf>,
}

struct PlayerInner {
    ctx: SessionContext,
    target: SharedTarget,
    backend: Backend,
    layout: SurfaceLayout,
    chunk_size: usize,
    engine_config: EngineConfig,
    paths: Mutex<Paths>,
}

/// Handle to one playback engine. Clones share the same engine.
#[derive(Clone)]
pub struct Player {
    inner: Arc<PlayerInner>,
}

impl Player {
    /// Build a player over `config` and put the surface into its stopped
    /// shape. No stream is touched until [`play`](Player::play).
    pub fn create(config: PlayerConfig) -> Result<Player, PlayerError> {
        config.validate()?;

        let PlayerConfig {
            source_path,
            render_target,
            backend,
            input_buffer_size,
            layout,
            engine,
        } = config;

        {
            let mut target = render_target.lock().unwrap();
            target.configure(&layout);
            target.set_progress(0);
            present_stopped(&mut *target, layout.hide_status);
        }

        info!("Player: created for {}", source_path.display());
        Ok(Player {
            inner: Arc::new(PlayerInner {
                ctx: SessionContext::new(),
                target: render_target,
                backend,
                layout,
                chunk_size: input_buffer_size,
                engine_config: engine,
                paths: Mutex::new(Paths {
                    current: source_path,
                    pending: None,
                }),
            }),
        })
    }

    /// Start playback, or resume it when paused. Idempotent while a
    /// session is already playing.
    pub fn play(&self) {
        let inner = &self.inner;

        if inner.ctx.state.get() == PlayerState::Paused {
            if inner.ctx.state.try_set(PlayerState::Playing) {
                info!("Player: resumed");
                let mut target = inner.target.lock().unwrap();
                target.clear_overlay();
                target.apply_controls(PlayerState::Playing);
            }
            return;
        }

        // One session at a time: only the latch winner spawns.
        if !inner.ctx.activate() {
            debug!("Player: play ignored, session already active");
            return;
        }
        inner.ctx.halt.store(false, Ordering::SeqCst);

        let path = inner.paths.lock().unwrap().current.clone();
        let session = PlaybackSession::new(
            path,
            inner.backend.clone(),
            inner.ctx.clone(),
            inner.target.clone(),
            inner.layout.clone(),
            inner.chunk_size,
            inner.engine_config.clone(),
        );

        info!("Player: starting playback");
        tokio::spawn(session.run());
    }

    /// Toggle between playing and paused. Ignored while stopped.
    pub fn pause(&self) {
        let inner = &self.inner;
        match inner.ctx.state.get() {
            PlayerState::Playing => {
                if inner.ctx.state.try_set(PlayerState::Paused) {
                    info!("Player: paused");
                    inner
                        .target
                        .lock()
                        .unwrap()
                        .apply_controls(PlayerState::Paused);
                }
            }
            PlayerState::Paused => {
                if inner.ctx.state.try_set(PlayerState::Playing) {
                    info!("Player: resumed");
                    let mut target = inner.target.lock().unwrap();
                    target.clear_overlay();
                    target.apply_controls(PlayerState::Playing);
                }
            }
            PlayerState::Stopped => debug!("Player: pause ignored while stopped"),
        }
    }

    /// Stop playback. The session blanks the display and releases its
    /// buffers before it exits; a pending source change is applied now.
    pub fn stop(&self) {
        let inner = &self.inner;

        // Latch first so a session still inside startup sees it.
        inner.ctx.halt.store(true, Ordering::SeqCst);
        inner.ctx.state.try_set(PlayerState::Stopped);

        {
            let mut paths = inner.paths.lock().unwrap();
            if let Some(path) = paths.pending.take() {
                info!("Player: source changed to {}", path.display());
                paths.current = path;
            }
        }

        // The stopped shape is applied right away; an exiting session
        // repeats it harmlessly during teardown.
        {
            let mut target = inner.target.lock().unwrap();
            present_stopped(&mut *target, inner.layout.hide_status);
        }
        info!("Player: stopped");
    }

    /// Play the stream again from the start whenever it ends.
    pub fn set_repeat(&self, repeat: bool) {
        self.inner.ctx.looping.store(repeat, Ordering::SeqCst);
        if repeat {
            info!("Player: repeat enabled");
        } else {
            info!("Player: repeat disabled");
        }
    }

    /// Switch to another source. Takes effect immediately while stopped,
    /// otherwise it is remembered and applied by the next [`stop`](Player::stop).
    pub fn change_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let inner = &self.inner;
        let mut paths = inner.paths.lock().unwrap();

        if inner.ctx.state.get() == PlayerState::Stopped && !inner.ctx.is_active() {
            info!("Player: source changed to {}", path.display());
            paths.current = path;
            paths.pending = None;
        } else {
            warn!(
                "Player: change_file while active, {} will apply after stop",
                path.display()
            );
            paths.pending = Some(path);
        }
    }

    pub fn get_state(&self) -> PlayerState {
        self.inner.ctx.state.get()
    }

    /// Show or hide the transport controls at runtime.
    pub fn set_controls_visible(&self, visible: bool) {
        self.inner
            .target
            .lock()
            .unwrap()
            .set_controls_hidden(!visible);
    }

    /// Counters for the lifetime of this player, across sessions.
    pub fn stats(&self) -> Arc<PlaybackStats> {
        self.inner.ctx.stats.clone()
    }

    /// Whether a session task currently holds the stream and buffers.
    /// Stays true for a short moment after [`stop`](Player::stop) while the
    /// task tears down.
    pub fn is_session_active(&self) -> bool {
        self.inner.ctx.is_active()
    }

    /// Stop playback and drop this handle. Buffers are released by the
    /// session's teardown; poll [`is_session_active`](Player::is_session_active)
    /// on another clone to observe it finish.
    pub fn destroy(self) {
        self.stop();
        info!("Player: destroyed");
    }
}
