use parking_lot::{Condvar, Mutex};

use crate::error::{BoardError, Result};
use crate::stream::deque::ChunkedByteBuffer;

#[derive(Debug)]
struct QueueState {
    buffer: ChunkedByteBuffer,
    disposed: bool,
}

impl QueueState {
    /// The gate is open while there is something for the consumer to observe:
    /// buffered bytes or the disposal itself.
    fn gate_open(&self) -> bool {
        self.buffer.size() > 0 || self.disposed
    }
}

/// A [`ChunkedByteBuffer`] shared between one producer and one consumer thread.
///
/// `pop` blocks until bytes are available or the queue is disposed. The gate
/// is level-triggered: the waiting consumer re-checks the buffer size under
/// the same mutex the producer pushes under, so a push that lands just before
/// the consumer starts waiting is never lost.
///
/// Only a single consumer may call [`pop`](Self::pop) at a time. Concurrent
/// consumers are not defended against.
#[derive(Debug)]
pub struct BlockingByteQueue {
    state: Mutex<QueueState>,
    gate: Condvar,
}

impl Default for BlockingByteQueue {
    fn default() -> Self {
        Self::new(ChunkedByteBuffer::new())
    }
}

impl BlockingByteQueue {
    pub fn new(buffer: ChunkedByteBuffer) -> Self {
        Self {
            state: Mutex::new(QueueState {
                buffer,
                disposed: false,
            }),
            gate: Condvar::new(),
        }
    }

    /// Buffered byte count.
    pub fn size(&self) -> usize {
        self.state.lock().buffer.size()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Append `input` and wake a waiting consumer.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Disposed`] once the queue has been disposed.
    pub fn push(&self, input: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(BoardError::Disposed);
        }

        state.buffer.push(input);
        if state.gate_open() {
            self.gate.notify_one();
        }
        Ok(())
    }

    /// Block until bytes are available, then move up to `out.len()` of them
    /// into `out`.
    ///
    /// After disposal the remaining bytes can still be drained; once the
    /// buffer is empty every call fails. An empty `out` returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Disposed`] if the queue is disposed and empty.
    pub fn pop(&self, out: &mut [u8]) -> Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.lock();
        while !state.gate_open() {
            self.gate.wait(&mut state);
        }

        if state.buffer.is_empty() {
            return Err(BoardError::Disposed);
        }
        Ok(state.buffer.pop(out))
    }

    /// Close the queue and release a blocked consumer. Idempotent.
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        if !state.disposed {
            state.disposed = true;
            self.gate.notify_all();
        }
    }
}
