//! Version classification: the one gate shared by decode and encode so they
//! never disagree about which saves are supported.

use crate::error::{BinaryError, Result};
use save_codec_core::{CodecError, VersionClass};

/// Classify `(save_version, save_header_version)` and reject it if it falls
/// in one of the three unsupported bands.
pub fn reject_if_unsupported(save_version: i32, save_header_version: i32) -> Result<()> {
    let class = VersionClass::classify(save_version, save_header_version);
    match class.last_supported_package_version() {
        Some(last_supported) => {
            tracing::warn!(
                save_version,
                save_header_version,
                last_supported,
                "rejecting unsupported save version"
            );
            Err(BinaryError::Codec(CodecError::unsupported_version(last_supported)))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_old_save_version() {
        let err = reject_if_unsupported(5, 13).unwrap_err();
        assert!(err.to_string().contains("0.0.34"));
    }

    #[test]
    fn test_accepts_current_save_version() {
        assert!(reject_if_unsupported(42, 13).is_ok());
    }

    #[test]
    fn test_rejects_old_header_version_even_with_current_save_version() {
        let err = reject_if_unsupported(42, 5).unwrap_err();
        assert!(err.to_string().contains("0.0.34"));
    }
}
