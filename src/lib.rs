//! cinereel
//!
//! An MJPEG playback engine for small displays backed by a hardware JPEG
//! decoder. The stream is raw concatenated JPEG frames with no container:
//! the engine reads fixed-size chunks, finds each frame's end-of-image
//! marker, decodes into a shared frame buffer and advances by exactly the
//! bytes it presented, so a bad chunk never derails the stream.
//!
//! The host supplies three seams: a [`source::MediaStorage`] to open
//! streams (any `Read + Seek` works), a [`decoder::DecoderProvider`] over
//! the decode hardware, and a [`display::RenderTarget`] over the screen.
//! One background task per playback run does all the decoding; commands
//! from the shell are flag flips that the task picks up on its next pass.
//!
//! ```ignore
//! let target: SharedTarget = Arc::new(Mutex::new(MyScreen::new()));
//! let config = PlayerConfig::new("/media/clip.mjpeg", target, Arc::new(MyDecoder));
//!
//! let player = Player::create(config)?;
//! player.set_repeat(true);
//! player.play();
//! // ... later, from any clone of the handle:
//! player.stop();
//! ```

pub mod config;
pub mod decoder;
pub mod display;
pub mod error;
pub mod player;
pub mod source;

pub use config::{Backend, PlayerConfig};
pub use display::{RenderTarget, SharedTarget, SurfaceLayout};
pub use error::PlayerError;
pub use player::{PlaybackStats, Player, PlayerState};
