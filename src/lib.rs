pub mod cli;
pub mod common;
pub mod processing;
pub mod server;

pub use processing::{decode, decode_text, encode, PixelBuffer};
