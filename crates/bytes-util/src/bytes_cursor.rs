use std::io;

use bytes::Bytes;

/// A cursor over a refcounted byte buffer, enabling zero-copy sub-slicing.
pub type BytesCursor = io::Cursor<Bytes>;

/// Zero-copy extraction helpers for [`BytesCursor`].
///
/// Extracted values are O(1) slices of the underlying [`Bytes`]; no byte is
/// copied, only reference counters move.
pub trait BytesCursorExt {
    /// Extracts `size` bytes starting at the cursor position and advances
    /// past them.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] when fewer than `size`
    /// bytes remain.
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes>;

    /// Extracts everything from the cursor position to the end of the
    /// buffer. Empty when the cursor is already at (or past) the end.
    fn extract_remaining(&mut self) -> Bytes;
}

impl BytesCursorExt for BytesCursor {
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes> {
        let len = self.get_ref().len();
        let start = (self.position() as usize).min(len);
        let end = start
            .checked_add(size)
            .filter(|&end| end <= len)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "not enough bytes"))?;

        self.set_position(end as u64);
        Ok(self.get_ref().slice(start..end))
    }

    fn extract_remaining(&mut self) -> Bytes {
        let len = self.get_ref().len();
        let start = (self.position() as usize).min(len);

        self.set_position(len as u64);
        self.get_ref().slice(start..len)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));

        assert_eq!(cursor.extract_bytes(3).unwrap(), Bytes::from_static(&[1, 2, 3]));
        assert_eq!(cursor.extract_bytes(2).unwrap(), Bytes::from_static(&[4, 5]));

        let err = cursor.extract_bytes(1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        assert_eq!(cursor.extract_bytes(0).unwrap(), Bytes::new());
    }

    #[test]
    fn test_extract_remaining() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));
        cursor.set_position(3);

        assert_eq!(cursor.extract_remaining(), Bytes::from_static(&[4, 5]));
        assert_eq!(cursor.extract_remaining(), Bytes::new());
    }

    #[test]
    fn test_position_past_end() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3]));
        cursor.set_position(10);

        assert_eq!(cursor.extract_remaining(), Bytes::new());
        assert!(cursor.extract_bytes(1).is_err());
        assert_eq!(cursor.extract_bytes(0).unwrap(), Bytes::new());
    }
}
