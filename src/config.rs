//! Player configuration
//!
//! One struct carries everything [`Player::create`](crate::player::Player::create)
//! needs: the media path, the presentation surface, backend wiring and the
//! layout flags. The plain-data parts ([`SurfaceLayout`], [`EngineConfig`])
//! are serde types so shells can persist them alongside their own settings.

use crate::decoder::{DecoderProvider, EngineConfig};
use crate::display::{FrameMemory, HeapMemory, SharedTarget, SurfaceLayout};
use crate::error::PlayerError;
use crate::source::{FileStorage, MediaStorage};
use std::path::PathBuf;
use std::sync::Arc;

/// Default compressed input chunk size when the caller does not pick one.
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 512 * 1024;

/// External backends the player drives.
#[derive(Clone)]
pub struct Backend {
    /// Opens media streams by path
    pub storage: Arc<dyn MediaStorage>,
    /// Creates decode engines
    pub decoder: Arc<dyn DecoderProvider>,
    /// Allocates decoder-reachable buffers
    pub memory: Arc<dyn FrameMemory>,
}

/// Everything needed to create a [`Player`](crate::player::Player).
#[derive(Clone)]
pub struct PlayerConfig {
    /// Path of the MJPEG stream to play
    pub source_path: PathBuf,
    /// The surface frames are presented on
    pub render_target: SharedTarget,
    /// Backend wiring; defaults to host filesystem and heap
    pub backend: Backend,
    /// Size of the compressed input chunk in bytes. Must hold at least one
    /// whole frame plus the next frame's marker tail.
    pub input_buffer_size: usize,
    /// Presentation geometry and visibility flags
    pub layout: SurfaceLayout,
    /// Decode engine settings
    pub engine: EngineConfig,
}

impl PlayerConfig {
    /// Config with host-side defaults. The decode engine has no default and
    /// must be supplied; the presentation size in `layout` starts at zero
    /// and must be filled (or auto-sized) before `create`.
    pub fn new(
        source_path: impl Into<PathBuf>,
        render_target: SharedTarget,
        decoder: Arc<dyn DecoderProvider>,
    ) -> PlayerConfig {
        PlayerConfig {
            source_path: source_path.into(),
            render_target,
            backend: Backend {
                storage: Arc::new(FileStorage),
                decoder,
                memory: Arc::new(HeapMemory),
            },
            input_buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
            layout: SurfaceLayout::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Check everything creation depends on.
    pub(crate) fn validate(&self) -> Result<(), PlayerError> {
        if self.source_path.as_os_str().is_empty() {
            return Err(PlayerError::Config("source_path must be set"));
        }
        if self.input_buffer_size == 0 {
            return Err(PlayerError::Config("input_buffer_size must be non-zero"));
        }
        // A zero dimension is fine when the surface adopts the video's size
        if self.layout.width == 0 && !self.layout.auto_width {
            return Err(PlayerError::Config("presentation width must be non-zero"));
        }
        if self.layout.height == 0 && !self.layout.auto_height {
            return Err(PlayerError::Config("presentation height must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{DecodeError, JpegDecoder};
    use crate::display::{FrameBuffer, Overlay, RenderTarget};
    use crate::player::PlayerState;
    use std::sync::Mutex;

    struct NullTarget;

    impl RenderTarget for NullTarget {
        fn configure(&mut self, _layout: &SurfaceLayout) {}
        fn attach(&mut self, _frame: FrameBuffer) {}
        fn frame(&mut self) -> Option<&mut FrameBuffer> {
            None
        }
        fn detach(&mut self) -> Option<FrameBuffer> {
            None
        }
        fn invalidate(&mut self) {}
        fn set_progress(&mut self, _permille: u64) {}
        fn show_overlay(&mut self, _overlay: Overlay) {}
        fn clear_overlay(&mut self) {}
        fn apply_controls(&mut self, _state: PlayerState) {}
        fn set_controls_hidden(&mut self, _hidden: bool) {}
    }

    struct NullProvider;

    impl DecoderProvider for NullProvider {
        fn new_engine(
            &self,
            _config: &EngineConfig,
        ) -> Result<Box<dyn JpegDecoder>, DecodeError> {
            Err(DecodeError::Malformed("no engine in this test".into()))
        }
    }

    fn base_config() -> PlayerConfig {
        let target: SharedTarget = Arc::new(Mutex::new(NullTarget));
        let mut config = PlayerConfig::new("movie.mjpeg", target, Arc::new(NullProvider));
        config.layout.width = 320;
        config.layout.height = 240;
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_missing_path_rejected() {
        let mut config = base_config();
        config.source_path = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(PlayerError::Config("source_path must be set"))
        ));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let mut config = base_config();
        config.input_buffer_size = 0;
        assert!(matches!(config.validate(), Err(PlayerError::Config(_))));
    }

    #[test]
    fn test_zero_presentation_size_rejected() {
        let mut config = base_config();
        config.layout.height = 0;
        assert!(matches!(config.validate(), Err(PlayerError::Config(_))));
    }

    #[test]
    fn test_auto_size_allows_zero_dimension() {
        let mut config = base_config();
        config.layout.width = 0;
        config.layout.auto_width = true;
        assert!(config.validate().is_ok());
    }
}
