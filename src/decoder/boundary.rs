//! JPEG frame boundary scanning
//!
//! A raw MJPEG stream carries no container index; the only way to find where
//! one frame ends is to scan the compressed bytes for the JPEG end-of-image
//! marker. The hardware decode engine additionally consumes its input in
//! 16-byte extents, so frame lengths get rounded up before being handed over.

/// JPEG end-of-image marker bytes.
pub const EOI_MARKER: [u8; 2] = [0xFF, 0xD9];

/// Input extent alignment of the hardware decode engine, in bytes.
pub const FRAME_ALIGN: usize = 16;

/// Find the end of the first complete JPEG frame in `chunk`.
///
/// Returns the frame length in bytes, marker included, or `None` when the
/// chunk ends mid-frame and the marker has not been read yet.
pub fn find_frame_end(chunk: &[u8]) -> Option<usize> {
    chunk
        .windows(EOI_MARKER.len())
        .position(|window| window == EOI_MARKER)
        .map(|offset| offset + EOI_MARKER.len())
}

/// Round `len` up to the next multiple of `align`.
pub const fn align_up(len: usize, align: usize) -> usize {
    (len + align - 1) / align * align
}
