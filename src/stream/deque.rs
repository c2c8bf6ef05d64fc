use std::collections::VecDeque;

use crate::error::{BoardError, Result};
use crate::stream::chunk::Chunk;

/// Chunk capacity used by [`ChunkedByteBuffer::new`].
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// A byte FIFO built from fixed-capacity chunks.
///
/// Bytes are pushed onto the tail chunk, allocating a fresh chunk whenever the
/// tail fills up, and popped from the head chunk, discarding it once drained.
/// Because of that every interior chunk is always full, which lets
/// [`size`](Self::size) run in constant time:
///
/// ```text
/// size = head.len() + tail.len() + chunk_size * (chunks - 2)
/// ```
///
/// This type performs no locking; see
/// [`BlockingByteQueue`](crate::stream::BlockingByteQueue) for the
/// thread-safe wrapper.
#[derive(Debug)]
pub struct ChunkedByteBuffer {
    chunks: VecDeque<Chunk>,
    chunk_size: usize,
}

impl Default for ChunkedByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedByteBuffer {
    pub fn new() -> Self {
        Self {
            chunks: VecDeque::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a buffer whose chunks hold `chunk_size` bytes each.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidArgument`] if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(BoardError::InvalidArgument(
                "chunk size must be positive".to_string(),
            ));
        }
        Ok(Self {
            chunks: VecDeque::new(),
            chunk_size,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Total number of buffered bytes.
    pub fn size(&self) -> usize {
        match self.chunks.len() {
            0 => 0,
            1 => self.chunks[0].len(),
            n => {
                let head = self.chunks.front().map_or(0, Chunk::len);
                let tail = self.chunks.back().map_or(0, Chunk::len);
                head + tail + self.chunk_size * (n - 2)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Append all of `input` to the tail.
    pub fn push(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            let copied = match self.chunks.back_mut() {
                Some(tail) => tail.push(input),
                None => 0,
            };
            if copied == 0 {
                self.chunks.push_back(Chunk::new(self.chunk_size));
            } else {
                input = &input[copied..];
            }
        }
    }

    /// Move up to `out.len()` bytes from the head into `out`.
    ///
    /// Returns the number of bytes written, which is less than `out.len()`
    /// only when fewer bytes are buffered. Never blocks.
    pub fn pop(&mut self, out: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < out.len() {
            let Some(head) = self.chunks.front_mut() else {
                break;
            };
            let n = head.pop(&mut out[copied..]);
            let drained = head.is_drained();
            if drained {
                self.chunks.pop_front();
            }
            copied += n;
            if n == 0 && !drained {
                // Head is the active tail and holds nothing more.
                break;
            }
        }
        copied
    }

    /// Pop up to `max` bytes into a freshly allocated vector.
    pub fn pop_vec(&mut self, max: usize) -> Vec<u8> {
        let mut out = vec![0u8; max.min(self.size())];
        let n = self.pop(&mut out);
        out.truncate(n);
        out
    }
}
