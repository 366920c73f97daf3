//! Presentation-side types: frame buffers, frame memory and the surface seam

pub mod frame;
pub mod surface;

pub use frame::{BYTES_PER_PIXEL, FrameBuffer, FrameMemory, HeapMemory, frame_bytes};
pub use surface::{Overlay, PROGRESS_SCALE, RenderTarget, SharedTarget, SurfaceLayout};
