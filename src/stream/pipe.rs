use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::error::{BoardError, Result};
use crate::stream::deque::ChunkedByteBuffer;
use crate::stream::queue::BlockingByteQueue;

/// Lifecycle of a pipe handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Bytes may still flow.
    Open,
    /// The consumer has seen the producer's close and drained everything.
    EndOfStream,
    /// The handle itself has been closed.
    Closed,
}

/// Create a connected producer/consumer pair backed by a default buffer.
pub fn pipe() -> (Producer, Consumer) {
    pipe_with_buffer(ChunkedByteBuffer::new())
}

/// Create a connected pair whose buffer uses `chunk_size`-byte chunks.
///
/// # Errors
///
/// Returns [`BoardError::InvalidArgument`] if `chunk_size` is zero.
pub fn pipe_with_chunk_size(chunk_size: usize) -> Result<(Producer, Consumer)> {
    Ok(pipe_with_buffer(ChunkedByteBuffer::with_chunk_size(
        chunk_size,
    )?))
}

fn pipe_with_buffer(buffer: ChunkedByteBuffer) -> (Producer, Consumer) {
    let queue = Arc::new(BlockingByteQueue::new(buffer));
    let producer = Producer {
        queue: Arc::clone(&queue),
        state: StreamState::Open,
    };
    let consumer = Consumer {
        queue,
        state: StreamState::Open,
    };
    (producer, consumer)
}

/// Write end of a pipe.
///
/// Closing the producer is the only completion signal: the consumer reads
/// whatever is still buffered and then sees end-of-stream. Dropping an open
/// producer closes it.
#[derive(Debug)]
pub struct Producer {
    queue: Arc<BlockingByteQueue>,
    state: StreamState,
}

impl Producer {
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Append `bytes` to the pipe.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Disposed`] if this producer has been closed.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if self.state != StreamState::Open {
            return Err(BoardError::Disposed);
        }
        self.queue.push(bytes)
    }

    /// Signal end-of-stream and release a blocked consumer. Idempotent.
    pub fn close(&mut self) {
        if self.state == StreamState::Open {
            self.state = StreamState::Closed;
            self.queue.dispose();
        }
    }
}

impl Write for Producer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(buf).map_err(into_io_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.state != StreamState::Open {
            return Err(into_io_error(BoardError::Disposed));
        }
        Ok(())
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read end of a pipe.
///
/// Reads block until bytes arrive. After the producer closes and the buffer
/// is drained, reads return `Ok(0)` without blocking. Closing the consumer
/// does not affect the shared buffer.
#[derive(Debug)]
pub struct Consumer {
    queue: Arc<BlockingByteQueue>,
    state: StreamState,
}

impl Consumer {
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Block until bytes are available and copy up to `out.len()` of them.
    ///
    /// Returns `Ok(0)` at end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Disposed`] if this consumer has been closed.
    pub fn recv(&mut self, out: &mut [u8]) -> Result<usize> {
        match self.state {
            StreamState::Closed => Err(BoardError::Disposed),
            StreamState::EndOfStream => Ok(0),
            StreamState::Open => match self.queue.pop(out) {
                Ok(n) => Ok(n),
                Err(BoardError::Disposed) => {
                    self.state = StreamState::EndOfStream;
                    Ok(0)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Stop reading. The producer keeps ownership of the buffer's lifetime.
    pub fn close(&mut self) {
        self.state = StreamState::Closed;
    }
}

impl Read for Consumer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.recv(buf).map_err(into_io_error)
    }
}

fn into_io_error(err: BoardError) -> io::Error {
    match err {
        BoardError::Io(e) => e,
        BoardError::Disposed => io::Error::new(io::ErrorKind::BrokenPipe, err),
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}
