//! Playback engine: state machine, counters, the loop task and the
//! transport commands that drive it.

pub mod state;
pub mod stats;
pub mod transport;

mod session;

pub use state::PlayerState;
pub use stats::{PlaybackStats, StatsSummary};
pub use transport::Player;
