pub mod reassembler;

pub use reassembler::Reassembler;
