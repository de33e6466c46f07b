//! Error types shared by the save/blueprint codec

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while decoding or encoding a save/blueprint stream
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Read past the end of the buffer
    #[error("unexpected end of stream at byte {position} (wanted {wanted} more bytes, {available} available)")]
    UnexpectedEndOfStream {
        position: u64,
        wanted: usize,
        available: usize,
    },

    /// A string length prefix was negative-zero, too large, or otherwise invalid
    #[error("malformed string at byte {position}: {message}")]
    MalformedString { position: u64, message: String },

    /// A GUID could not be read as 16 raw bytes
    #[error("malformed GUID at byte {position}: {message}")]
    MalformedGuid { position: u64, message: String },

    /// A chunk header failed its sentinel/flag validation
    #[error("malformed chunk header at byte {position}: {message}")]
    MalformedChunkHeader { position: u64, message: String },

    /// The save/header version predates the supported cutoff
    #[error(
        "unsupported version: save was written by a version older than this codec supports; \
         downgrade with package version {last_supported_version} before editing"
    )]
    UnsupportedVersion { last_supported_version: String },

    /// A declared byte length for a property or object body didn't match what was produced/consumed
    #[error(
        "body length mismatch at {at}: expected {expected} bytes, observed {observed} bytes \
         (this usually means the struct dispatcher is missing a type)"
    )]
    BodyLengthMismatch {
        expected: u64,
        observed: u64,
        at: String,
    },

    /// A property type-tag was not recognized (fatal for properties, non-fatal for structs)
    #[error("unknown type tag {tag:?} at byte {position}")]
    UnknownTypeTag { tag: String, position: u64 },

    /// A chunk's checksum/body-hash didn't match
    #[error("checksum mismatch: expected {expected:?}, computed {computed:?}")]
    ChecksumMismatch { expected: Vec<u8>, computed: Vec<u8> },

    /// Any other malformed-data condition not covered above
    #[error("invalid data at byte {position}: {message}")]
    InvalidData { position: u64, message: String },
}

impl CodecError {
    pub fn unexpected_end_of_stream(position: u64, wanted: usize, available: usize) -> Self {
        Self::UnexpectedEndOfStream {
            position,
            wanted,
            available,
        }
    }

    pub fn malformed_string(position: u64, message: impl Into<String>) -> Self {
        Self::MalformedString {
            position,
            message: message.into(),
        }
    }

    pub fn malformed_guid(position: u64, message: impl Into<String>) -> Self {
        Self::MalformedGuid {
            position,
            message: message.into(),
        }
    }

    pub fn malformed_chunk_header(position: u64, message: impl Into<String>) -> Self {
        Self::MalformedChunkHeader {
            position,
            message: message.into(),
        }
    }

    pub fn unsupported_version(last_supported_version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            last_supported_version: last_supported_version.into(),
        }
    }

    pub fn body_length_mismatch(expected: u64, observed: u64, at: impl Into<String>) -> Self {
        Self::BodyLengthMismatch {
            expected,
            observed,
            at: at.into(),
        }
    }

    pub fn unknown_type_tag(tag: impl Into<String>, position: u64) -> Self {
        Self::UnknownTypeTag {
            tag: tag.into(),
            position,
        }
    }

    pub fn checksum_mismatch(expected: Vec<u8>, computed: Vec<u8>) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    pub fn invalid_data(position: u64, message: impl Into<String>) -> Self {
        Self::InvalidData {
            position,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message() {
        let err = CodecError::unsupported_version("0.0.34");
        assert!(err.to_string().contains("0.0.34"));
    }

    #[test]
    fn test_body_length_mismatch_message() {
        let err = CodecError::body_length_mismatch(10, 12, "Level0/Foo.property[Bar]");
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("12"));
        assert!(msg.contains("Bar"));
    }
}
