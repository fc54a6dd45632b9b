mod binary;
mod error;
mod intel_hex;

pub use binary::{BinaryWriteOptions, parse_binary, write_binary};
pub use error::ParseError;
pub use intel_hex::{
    IntelHexReadOptions, IntelHexWriteOptions, parse_intel_hex, parse_intel_hex_with,
    write_intel_hex,
};
