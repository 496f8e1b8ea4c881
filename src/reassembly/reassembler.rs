use tracing::{debug, trace};

use crate::stream::ByteStream;

/// Reassembles out-of-order, possibly overlapping substrings of a logical
/// byte stream and writes them to a [`ByteStream`] strictly in order.
///
/// Each inserted substring carries the absolute index of its first byte.
/// Bytes that cannot be written yet (earlier bytes are still missing) are
/// held in a fixed ring of slots sized to the output's capacity, indexed by
/// `offset % capacity`. Anything outside the window
/// `[next_index, next_index + output.remaining_capacity())` is discarded:
/// below it the bytes were already delivered, above it they could not be
/// written even once the gaps fill in. Recovering from that loss is the
/// sender's problem, so no insert ever reports an error.
#[derive(Debug, Default)]
pub struct Reassembler {
    slots: Vec<u8>,
    filled: Vec<bool>,
    next_index: Option<u64>,
    final_index: Option<u64>,
    pending: u64,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes held for reassembly but not yet written to the output.
    pub fn bytes_pending(&self) -> u64 {
        self.pending
    }

    /// Inserts the substring of the stream starting at `first_index`.
    ///
    /// Writes to `output` whatever contiguous run this substring completes,
    /// and closes `output` once the stream's final byte (the last byte of an
    /// `is_last` substring) has been written. Out-of-window bytes are
    /// silently dropped.
    pub fn insert(
        &mut self,
        first_index: u64,
        data: &[u8],
        is_last: bool,
        output: &mut ByteStream,
    ) {
        // The cursor starts wherever the output already is, so a reassembler
        // can be attached to a stream that holds prior bytes.
        let mut cursor = match self.next_index {
            Some(index) => index,
            None => output.bytes_pushed(),
        };

        // Terminal once the final byte has been written: close and ignore
        // everything that still arrives, last-marked or not.
        if self.final_index == Some(cursor) {
            output.close();
            self.next_index = Some(cursor);
            return;
        }

        if is_last {
            self.final_index = Some(first_index.saturating_add(data.len() as u64));
        }

        if self.slots.is_empty() && output.capacity() > 0 {
            self.slots = vec![0; output.capacity()];
            self.filled = vec![false; output.capacity()];
        }
        let ring = self.slots.len() as u64;

        let data_end = first_index.saturating_add(data.len() as u64);
        let window_end = cursor + output.remaining_capacity() as u64;
        let begin = first_index.max(cursor);
        let end = data_end.min(window_end);

        for offset in begin..end {
            let slot = (offset % ring) as usize;
            // First writer wins; overlapping substrings are assumed to agree.
            if self.filled[slot] {
                continue;
            }
            self.slots[slot] = data[(offset - first_index) as usize];
            self.filled[slot] = true;
            self.pending += 1;
        }

        if begin > first_index || end < data_end {
            trace!(
                first_index,
                len = data.len(),
                kept = end.saturating_sub(begin),
                "clipped substring to acceptance window"
            );
        }

        // Flush the contiguous run now available at the cursor.
        let mut run = Vec::new();
        while ring > 0 && self.filled[(cursor % ring) as usize] {
            let slot = (cursor % ring) as usize;
            run.push(self.slots[slot]);
            self.filled[slot] = false;
            self.pending -= 1;
            cursor += 1;
        }

        if !run.is_empty() {
            trace!(len = run.len(), next_index = cursor, "flushing in-order run");
            // Every held byte lies inside the acceptance window, so the run
            // always fits in the output's remaining capacity.
            if let Err(err) = output.push(&run) {
                debug!(%err, "output rejected in-order run");
            }
        }

        if self.final_index == Some(cursor) {
            output.close();
        }
        self.next_index = Some(cursor);
    }
}
