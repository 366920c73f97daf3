//! Media storage seam
//!
//! Playback reads from whatever the shell mounts (SD card, flash partition,
//! a plain file); the loop only needs sizing, chunked reads and absolute
//! seeks. Any `Read + Seek` stream qualifies, so files and in-memory cursors
//! work out of the box.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// An open media stream, positioned by the playback loop.
///
/// Closing and disconnecting happen on drop.
pub trait MediaSource: Send {
    /// Total stream length in bytes.
    fn byte_len(&mut self) -> io::Result<u64>;

    /// Read up to `buf.len()` bytes from the current position, advancing it.
    /// `Ok(0)` is end of stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reposition to `offset` bytes from the start.
    fn seek_to(&mut self, offset: u64) -> io::Result<()>;
}

impl<T: Read + Seek + Send> MediaSource for T {
    fn byte_len(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }
}

/// Opens media streams by path.
pub trait MediaStorage: Send + Sync {
    fn open(&self, path: &Path) -> io::Result<Box<dyn MediaSource>>;
}

/// Default storage: the host filesystem.
pub struct FileStorage;

impl MediaStorage for FileStorage {
    fn open(&self, path: &Path) -> io::Result<Box<dyn MediaSource>> {
        Ok(Box::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    #[test]
    fn test_cursor_is_a_media_source() {
        let mut source = Cursor::new(vec![1u8, 2, 3, 4, 5]);

        assert_eq!(source.byte_len().unwrap(), 5);

        let mut buf = [0u8; 3];
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        // byte_len must not disturb the position
        assert_eq!(source.byte_len().unwrap(), 5);
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 0);

        source.seek_to(1).unwrap();
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 3);
        assert_eq!(buf, [2, 3, 4]);
    }

    #[test]
    fn test_file_storage_reads_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[9u8, 8, 7, 6]).unwrap();
        file.flush().unwrap();

        let mut source = FileStorage.open(file.path()).unwrap();
        assert_eq!(source.byte_len().unwrap(), 4);

        let mut buf = [0u8; 8];
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[9, 8, 7, 6]);

        source.seek_to(2).unwrap();
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[7, 6]);
    }

    #[test]
    fn test_file_storage_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-video.mjpeg");
        assert!(FileStorage.open(&missing).is_err());
    }
}
