use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("chunk size {chunk_size} is not a nonzero multiple of the {word_bytes}-byte word size")]
    InvalidChunkSize { chunk_size: usize, word_bytes: usize },
}
