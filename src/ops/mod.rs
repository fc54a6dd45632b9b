mod error;
mod fill;
mod split;

pub use error::OpsError;
pub use split::LineBlock;
