use std::collections::VecDeque;

use tracing::debug;

use super::error::StreamError;

/// A capacity-bounded, append-only byte stream.
///
/// A writer pushes bytes in at one end and a reader drains them from the
/// other; the buffer never holds more than `capacity` bytes at once, so a
/// writer can only make progress as fast as the reader frees room. `close`
/// marks the end of the stream; once the reader has drained a closed stream
/// it is finished.
#[derive(Debug)]
pub struct ByteStream {
    buffer: VecDeque<u8>,
    capacity: usize,
    closed: bool,
    bytes_pushed: u64,
    bytes_popped: u64,
}

impl ByteStream {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            closed: false,
            bytes_pushed: 0,
            bytes_popped: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.buffer.len()
    }

    /// Appends `data` to the stream.
    ///
    /// The push is all-or-nothing: if `data` does not fit in the remaining
    /// capacity, or the stream has been closed, nothing is written.
    pub fn push(&mut self, data: &[u8]) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::Closed);
        }
        let remaining = self.remaining_capacity();
        if data.len() > remaining {
            return Err(StreamError::CapacityExceeded {
                requested: data.len(),
                remaining,
            });
        }
        self.buffer.extend(data.iter().copied());
        self.bytes_pushed += data.len() as u64;
        Ok(())
    }

    /// Marks the end of the stream. Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            debug!(bytes_pushed = self.bytes_pushed, "stream closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True once the stream is closed and fully drained.
    pub fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }

    /// Total bytes ever accepted by `push`, drained or not.
    pub fn bytes_pushed(&self) -> u64 {
        self.bytes_pushed
    }

    pub fn bytes_popped(&self) -> u64 {
        self.bytes_popped
    }

    pub fn bytes_buffered(&self) -> usize {
        self.buffer.len()
    }

    /// All buffered bytes, front of the stream first, without consuming
    /// them. Re-linearizes the internal ring if a wrap has split it.
    pub fn peek(&mut self) -> &[u8] {
        self.buffer.make_contiguous()
    }

    /// Removes up to `len` bytes from the front of the stream.
    pub fn read(&mut self, len: usize) -> Vec<u8> {
        let take = len.min(self.buffer.len());
        let out: Vec<u8> = self.buffer.drain(..take).collect();
        self.bytes_popped += out.len() as u64;
        out
    }

    /// Drains every buffered byte.
    pub fn read_all(&mut self) -> Vec<u8> {
        self.read(self.buffer.len())
    }
}
