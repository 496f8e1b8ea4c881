pub mod reassembly;
pub mod stream;

pub use reassembly::Reassembler;
pub use stream::{ByteStream, StreamError};

#[cfg(test)]
mod proptests;
