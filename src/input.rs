//! Zero-copy chunked input sources.
//!
//! The tokenizer pulls its bytes through [`InputStream`], a two-operation
//! seam modeled on zero-copy stream readers: `next_chunk` hands out a window
//! into the source's own storage, and `back_up` returns the unread tail of
//! the most recent window so a downstream reader can resume at byte
//! accuracy. Chunk boundaries may fall anywhere, including inside a lexeme;
//! the tokenizer's recorder is responsible for stitching token text back
//! together across them.

use std::io;

/// A pull-based source of byte chunks borrowed from storage that outlives
/// the reader.
///
/// `Ok(None)`, an empty chunk, and `Err(_)` all mean the same thing to the
/// tokenizer: the stream is over, and its end-of-input latch is set.
pub trait InputStream<'a> {
    /// Returns the next readable window of the source, or `None` at end of
    /// stream.
    fn next_chunk(&mut self) -> io::Result<Option<&'a [u8]>>;

    /// Ungets the last `count` bytes of the most recently returned chunk.
    ///
    /// `count` must not exceed the size of that chunk.
    fn back_up(&mut self, count: usize);
}

/// An [`InputStream`] over an in-memory slice, yielded as a single chunk.
#[derive(Debug)]
pub struct SliceInput<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceInput<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Byte offset one past the last byte handed out and not backed up.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> InputStream<'a> for SliceInput<'a> {
    fn next_chunk(&mut self) -> io::Result<Option<&'a [u8]>> {
        if self.position >= self.data.len() {
            return Ok(None);
        }
        let chunk = &self.data[self.position..];
        self.position = self.data.len();
        Ok(Some(chunk))
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.position);
        self.position -= count;
    }
}

/// An [`InputStream`] over an in-memory slice, yielded in fixed-size
/// chunks.
///
/// Mainly useful for exercising consumers against arbitrary buffer
/// boundaries; a chunk size of 1 puts a refill between every pair of
/// bytes.
#[derive(Debug)]
pub struct ChunkedSliceInput<'a> {
    data: &'a [u8],
    position: usize,
    chunk_size: usize,
}

impl<'a> ChunkedSliceInput<'a> {
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            data,
            position: 0,
            chunk_size,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> InputStream<'a> for ChunkedSliceInput<'a> {
    fn next_chunk(&mut self) -> io::Result<Option<&'a [u8]>> {
        if self.position >= self.data.len() {
            return Ok(None);
        }
        let end = usize::min(self.position + self.chunk_size, self.data.len());
        let chunk = &self.data[self.position..end];
        self.position = end;
        Ok(Some(chunk))
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.position);
        self.position -= count;
    }
}
