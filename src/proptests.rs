//! Property-based tests for reassembly invariants.
//!
//! These verify that for arbitrary chunkings and arrival orders:
//!
//! - The output stream reproduces the original byte sequence
//! - Re-inserting substrings never changes stream or pending state
//! - Delivered bytes are always a prefix of the stream, even with a small
//!   output capacity and a reader draining in between inserts
//! - Pending bytes plus buffered output never exceed the capacity

use proptest::prelude::*;

use crate::reassembly::Reassembler;
use crate::stream::ByteStream;

/// A random message split at random cut points into contiguous substrings,
/// delivered in a random order.
fn scattered_chunks() -> impl Strategy<Value = (Vec<u8>, Vec<(usize, Vec<u8>)>)> {
    prop::collection::vec(any::<u8>(), 1..64)
        .prop_flat_map(|message| {
            let len = message.len();
            (
                Just(message),
                prop::collection::vec(1..len.max(2), 0..6),
            )
        })
        .prop_map(|(message, mut cuts)| {
            cuts.retain(|&cut| cut < message.len());
            cuts.sort_unstable();
            cuts.dedup();

            let mut chunks = Vec::new();
            let mut start = 0;
            for cut in cuts.into_iter().chain(std::iter::once(message.len())) {
                chunks.push((start, message[start..cut].to_vec()));
                start = cut;
            }
            (message, chunks)
        })
        .prop_flat_map(|(message, chunks)| (Just(message), Just(chunks).prop_shuffle()))
}

proptest! {
    /// With capacity for the whole message, every chunking and arrival
    /// order reproduces the original bytes exactly, then closes the stream.
    #[test]
    fn any_arrival_order_reproduces_the_stream((message, chunks) in scattered_chunks()) {
        let mut stream = ByteStream::new(message.len());
        let mut reassembler = Reassembler::new();

        for (start, chunk) in &chunks {
            reassembler.insert(*start as u64, chunk, false, &mut stream);
        }
        reassembler.insert(message.len() as u64, b"", true, &mut stream);

        prop_assert_eq!(reassembler.bytes_pending(), 0);
        prop_assert!(stream.is_closed());
        prop_assert_eq!(stream.read_all(), message);
    }

    /// Replaying every substring after a first full pass changes neither
    /// the stream nor the pending count.
    #[test]
    fn reinsertion_is_idempotent((message, chunks) in scattered_chunks()) {
        let mut stream = ByteStream::new(message.len());
        let mut reassembler = Reassembler::new();

        for (start, chunk) in &chunks {
            reassembler.insert(*start as u64, chunk, false, &mut stream);
        }
        let pushed = stream.bytes_pushed();
        let pending = reassembler.bytes_pending();

        for (start, chunk) in &chunks {
            reassembler.insert(*start as u64, chunk, false, &mut stream);
        }

        prop_assert_eq!(stream.bytes_pushed(), pushed);
        prop_assert_eq!(reassembler.bytes_pending(), pending);
    }

    /// With a small capacity and a reader draining between inserts, the
    /// stream may lose clipped bytes but never reorders or corrupts: the
    /// delivered bytes are always a prefix of the original message, and
    /// held plus buffered bytes never exceed the capacity.
    #[test]
    fn delivered_bytes_are_always_a_stream_prefix(
        (message, chunks) in scattered_chunks(),
        capacity in 1usize..8,
        drains in prop::collection::vec(0usize..8, 0..16),
    ) {
        let mut stream = ByteStream::new(capacity);
        let mut reassembler = Reassembler::new();
        let mut delivered = Vec::new();
        let mut drains = drains.into_iter();

        for (start, chunk) in &chunks {
            reassembler.insert(*start as u64, chunk, false, &mut stream);
            prop_assert!(
                reassembler.bytes_pending() as usize + stream.bytes_buffered() <= capacity
            );
            if let Some(len) = drains.next() {
                delivered.extend(stream.read(len));
            }
        }
        delivered.extend(stream.read_all());

        prop_assert_eq!(&message[..delivered.len()], &delivered[..]);
    }
}
