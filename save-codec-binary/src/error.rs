//! Binary-crate error type: the core [`save_codec_core::CodecError`] plus the
//! I/O errors that can occur when a `ChunkCodec` write is streamed to a sink.

use thiserror::Error;

pub use save_codec_core::CodecError;

/// Result type alias for binary codec operations.
pub type Result<T> = std::result::Result<T, BinaryError>;

#[derive(Error, Debug)]
pub enum BinaryError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_converts() {
        let err: BinaryError = CodecError::unsupported_version("0.0.34").into();
        assert!(err.to_string().contains("0.0.34"));
    }
}
