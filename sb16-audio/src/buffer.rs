//! Staging buffer between the write entry point and the DMA engine.
//!
//! A single fixed-capacity buffer accumulates user bytes; the moment the
//! last byte lands, a playback trigger fires over the full contents and
//! the fill offset returns to zero for the next cycle. Nothing here
//! allocates: the host hands in memory it has already placed where the
//! DMA controller can reach it.
//!
//! Single-writer by contract. There is no internal locking; concurrent
//! submissions are the host's responsibility to exclude.

use crate::Error;

/// Fixed-capacity DMA staging buffer with a fill offset.
pub struct StagingBuffer<'a> {
    data: &'a mut [u8],
    phys: u32,
    offset: usize,
}

impl<'a> StagingBuffer<'a> {
    /// Wrap `data`, which must reside at physical address `phys`.
    pub fn new(data: &'a mut [u8], phys: u32) -> Self {
        StagingBuffer {
            data,
            phys,
            offset: 0,
        }
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes currently staged and not yet played.
    pub fn len(&self) -> usize {
        self.offset
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    /// Physical address of the buffer's first byte.
    pub fn physical_address(&self) -> u32 {
        self.phys
    }

    /// Discard any staged bytes.
    pub fn clear(&mut self) {
        self.offset = 0;
    }

    /// Copy as much of `src` as fits, firing `trigger` once if the copy
    /// fills the buffer.
    ///
    /// `trigger` receives the physical address and the full length; after
    /// it succeeds the offset resets to zero. If it fails, the buffer
    /// stays full and the error propagates — a later submission then
    /// reports [`Error::OutOfSpace`] until the host clears or drops the
    /// buffer.
    ///
    /// Returns the number of bytes accepted, which may be less than
    /// `src.len()`; the caller resubmits the remainder.
    pub fn submit<F>(&mut self, src: &[u8], mut trigger: F) -> Result<usize, Error>
    where
        F: FnMut(u32, usize) -> Result<(), Error>,
    {
        if self.offset >= self.data.len() {
            return Err(Error::OutOfSpace);
        }

        let take = src.len().min(self.data.len() - self.offset);
        self.data[self.offset..self.offset + take].copy_from_slice(&src[..take]);
        self.offset += take;

        if self.offset == self.data.len() {
            trigger(self.phys, self.data.len())?;
            self.offset = 0;
        }

        Ok(take)
    }
}
