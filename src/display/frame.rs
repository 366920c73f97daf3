//! Decoded frame buffers and the frame memory seam
//!
//! Output frames must live in memory the decode engine can reach (on the
//! target, DMA-capable external RAM), so every playback buffer is taken from
//! a [`FrameMemory`] provider instead of the global allocator and handed
//! back to it exactly once.

use crate::decoder::{FRAME_ALIGN, align_up};

/// Bytes per pixel of the 16-bit color format frames are decoded into.
pub const BYTES_PER_PIXEL: usize = 2;

/// Allocator for decoder-reachable buffers.
pub trait FrameMemory: Send + Sync {
    /// Allocate a zeroed buffer of `len` bytes, or `None` when the pool
    /// cannot satisfy the request.
    fn alloc(&self, len: usize) -> Option<Box<[u8]>>;

    /// Return a buffer to the pool.
    fn release(&self, buf: Box<[u8]>);
}

/// Host-side default: plain heap allocations.
pub struct HeapMemory;

impl FrameMemory for HeapMemory {
    fn alloc(&self, len: usize) -> Option<Box<[u8]>> {
        Some(vec![0u8; len].into_boxed_slice())
    }

    fn release(&self, buf: Box<[u8]>) {
        drop(buf);
    }
}

/// Size in bytes of the presentation buffer for a `width` x `height` video,
/// with the width rounded up to the decoder's stride alignment.
pub fn frame_bytes(width: u32, height: u32) -> usize {
    align_up(width as usize, FRAME_ALIGN) * height as usize * BYTES_PER_PIXEL
}

/// One decoded video frame in the 16-bit presentation format.
pub struct FrameBuffer {
    pixels: Box<[u8]>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub(crate) fn new(pixels: Box<[u8]>, width: u32, height: u32) -> FrameBuffer {
        FrameBuffer {
            pixels,
            width,
            height,
        }
    }

    /// Stride-aligned width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Zero every pixel, blanking the frame
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub(crate) fn into_pixels(self) -> Box<[u8]> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_memory_zeroed() {
        let memory = HeapMemory;
        let buf = memory.alloc(64).expect("heap alloc");
        assert_eq!(buf.len(), 64);
        assert!(buf.iter().all(|&b| b == 0));
        memory.release(buf);
    }

    #[test]
    fn test_frame_bytes_aligns_width() {
        // 800 is already a multiple of 16
        assert_eq!(frame_bytes(800, 450), 800 * 450 * 2);
        // 100 rounds up to 112
        assert_eq!(frame_bytes(100, 10), 112 * 10 * 2);
    }

    #[test]
    fn test_frame_buffer_clear() {
        let pixels = vec![0xAB; 32].into_boxed_slice();
        let mut frame = FrameBuffer::new(pixels, 4, 4);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 4);
        assert!(frame.pixels().iter().all(|&b| b == 0xAB));

        frame.clear();
        assert!(frame.pixels().iter().all(|&b| b == 0));
        assert_eq!(frame.into_pixels().len(), 32);
    }
}
