/// A fixed-capacity byte segment with independent read and write cursors.
///
/// Bytes are appended at `writer` and consumed from `reader`; the cursors only
/// move forward, so a chunk is never reused once its tail is full. The
/// invariant `0 <= reader <= writer <= capacity` holds at all times.
#[derive(Debug)]
pub(crate) struct Chunk {
    buf: Box<[u8]>,
    reader: usize,
    writer: usize,
}

impl Chunk {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            reader: 0,
            writer: 0,
        }
    }

    /// Number of readable bytes.
    pub(crate) fn len(&self) -> usize {
        self.writer - self.reader
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.reader == self.writer
    }

    /// Space left after the write cursor.
    fn free(&self) -> usize {
        self.buf.len() - self.writer
    }

    /// Empty with no room left to write, i.e. ready to be discarded.
    pub(crate) fn is_drained(&self) -> bool {
        self.is_empty() && self.free() == 0
    }

    /// Copy as much of `input` as fits. Returns the number of bytes taken.
    pub(crate) fn push(&mut self, input: &[u8]) -> usize {
        let n = input.len().min(self.free());
        self.buf[self.writer..self.writer + n].copy_from_slice(&input[..n]);
        self.writer += n;
        n
    }

    /// Move up to `out.len()` readable bytes into `out`. Returns the count.
    pub(crate) fn pop(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.len());
        out[..n].copy_from_slice(&self.buf[self.reader..self.reader + n]);
        self.reader += n;
        n
    }
}
