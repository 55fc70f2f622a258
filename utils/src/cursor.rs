//! Bounds-checked read head over a captured frame.
//!
//! All header reads go through `Cursor`; there is no unchecked path and no
//! reinterpret-cast of the buffer. Reading exactly up to the end of the
//! frame is legal, one byte past it is `Error::Truncated`.

use crate::dissectors::Error;

pub struct Cursor<'a> {
    frame: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self { frame, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes between the read head and the end of the frame
    #[inline]
    pub fn remaining(&self) -> usize {
        self.frame.len() - self.offset
    }

    /// Look at a single byte `rel` bytes ahead of the read head without
    /// advancing. Used to inspect length-determining fields (IPv4 IHL, TCP
    /// data offset) before committing to a full-header read.
    #[inline]
    pub fn peek_byte(&self, rel: usize) -> Result<u8, Error> {
        match self.frame.get(self.offset + rel) {
            Some(b) => Ok(*b),
            None => Err(Error::Truncated {
                offset: self.offset,
                needed: self.offset + rel + 1 - self.frame.len(),
            }),
        }
    }

    /// Take the next `len` bytes and advance. The offset moves only on
    /// success, so a failed read leaves the cursor where it was.
    #[inline]
    pub fn read_fixed(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self.offset + len;
        if end > self.frame.len() {
            return Err(Error::Truncated {
                offset: self.offset,
                needed: end - self.frame.len(),
            });
        }
        let data = &self.frame[self.offset..end];
        self.offset = end;
        Ok(data)
    }
}
