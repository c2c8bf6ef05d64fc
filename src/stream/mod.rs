//! Bridge between an asynchronous byte source and a blocking reader.
//!
//! Test-data archives are produced by a repository task at its own pace and
//! consumed by the HTTP layer as a plain [`std::io::Read`]. The pieces, from
//! the bottom up:
//!
//! - [`ChunkedByteBuffer`]: unbounded FIFO of fixed-size chunks
//! - [`BlockingByteQueue`]: the buffer behind a mutex with a blocking `pop`
//! - [`pipe`]: a [`Producer`] / [`Consumer`] handle pair over one queue
//!
//! The buffer grows without bound; a slow consumer never stalls the producer.

mod chunk;
pub mod deque;
pub mod pipe;
pub mod queue;

pub use deque::{ChunkedByteBuffer, DEFAULT_CHUNK_SIZE};
pub use pipe::{pipe, pipe_with_chunk_size, Consumer, Producer, StreamState};
pub use queue::BlockingByteQueue;
