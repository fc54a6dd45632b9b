pub mod block;
pub mod error;
pub mod image;
pub mod io;
pub mod ops;
pub mod word;

pub use block::MemoryBlock;
pub use error::Error;
pub use image::{FirmwareImage, ImageError};
pub use io::{
    BinaryWriteOptions, IntelHexReadOptions, IntelHexWriteOptions, ParseError, parse_binary,
    parse_intel_hex, parse_intel_hex_with, write_binary, write_intel_hex,
};
pub use ops::{LineBlock, OpsError};
pub use word::WordWidth;
