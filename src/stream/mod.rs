pub mod byte_stream;
pub mod error;

pub use byte_stream::ByteStream;
pub use error::StreamError;
