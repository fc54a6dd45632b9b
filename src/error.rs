use thiserror::Error;

use crate::{ImageError, OpsError, ParseError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Ops(#[from] OpsError),
}
