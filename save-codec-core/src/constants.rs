//! Version thresholds and the struct/property precision table
//!
//! These are the two pieces of knowledge that must be centralized so the
//! decoder and the encoder never disagree: the version cutoffs that gate
//! `UnsupportedVersion`, and the per struct-name/property-name hint for
//! whether a vector-family struct is stored as 4-byte floats or 8-byte
//! doubles.

use std::collections::HashMap;
use std::sync::RwLock;

/// Save version thresholds used by version classification.
///
/// These are fixed integer comparisons; both the decoder and encoder read
/// them from here so they can never drift apart.
pub mod versions {
    /// Saves below this `saveVersion` are pre-U6 and unsupported.
    pub const MIN_SAVE_VERSION_U6: i32 = 21;
    /// Saves below this `saveVersion` are U6/U7 and unsupported.
    pub const MIN_SAVE_VERSION_U8: i32 = 26;
    /// Saves below this `saveVersion` are U8 and unsupported.
    pub const MIN_SAVE_VERSION_CURRENT: i32 = 29;

    /// Saves whose `saveHeaderType` is below this are pre-U6 and unsupported,
    /// regardless of `saveVersion` — the header format itself predates the
    /// fields a current decoder expects.
    pub const MIN_HEADER_VERSION_U6: i32 = 7;
    /// Saves whose `saveHeaderType` is below this are U6/U7 and unsupported.
    pub const MIN_HEADER_VERSION_U8: i32 = 8;
    /// Saves whose `saveHeaderType` is below this are U8 and unsupported.
    pub const MIN_HEADER_VERSION_CURRENT: i32 = 13;

    /// Last package version that could still load a pre-U6 save.
    pub const LAST_SUPPORTED_PRE_U6: &str = "0.0.34";
    /// Last package version that could still load a U6/U7 save.
    pub const LAST_SUPPORTED_U6_U7: &str = "0.1.5";
    /// Last package version that could still load a U8 save.
    pub const LAST_SUPPORTED_U8: &str = "0.3.0";
}

/// Classification of a save's version relative to the supported cutoff.
///
/// Declaration order doubles as severity order (`PreU6` is the most
/// restrictive), so `min` picks whichever of two classifications rejects
/// more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionClass {
    /// Older than Update 6 - rejected.
    PreU6,
    /// Update 6 or 7 - rejected.
    U6OrU7,
    /// Update 8 - rejected.
    U8,
    /// Currently supported.
    Current,
}

impl VersionClass {
    /// Classify the `(saveVersion, saveHeaderType)` pair, per spec §4.3.
    ///
    /// Each field is classified independently against its own threshold
    /// table, and the pair is rejected as whichever of the two is older —
    /// a header format that predates U8 can't be trusted to carry a
    /// current-era body even if `saveVersion` alone looks current, and
    /// vice versa.
    pub fn classify(save_version: i32, save_header_version: i32) -> Self {
        Self::classify_save_version(save_version).min(Self::classify_header_version(save_header_version))
    }

    fn classify_save_version(save_version: i32) -> Self {
        if save_version < versions::MIN_SAVE_VERSION_U6 {
            VersionClass::PreU6
        } else if save_version < versions::MIN_SAVE_VERSION_U8 {
            VersionClass::U6OrU7
        } else if save_version < versions::MIN_SAVE_VERSION_CURRENT {
            VersionClass::U8
        } else {
            VersionClass::Current
        }
    }

    fn classify_header_version(save_header_version: i32) -> Self {
        if save_header_version < versions::MIN_HEADER_VERSION_U6 {
            VersionClass::PreU6
        } else if save_header_version < versions::MIN_HEADER_VERSION_U8 {
            VersionClass::U6OrU7
        } else if save_header_version < versions::MIN_HEADER_VERSION_CURRENT {
            VersionClass::U8
        } else {
            VersionClass::Current
        }
    }

    /// Whether this classification is rejected outright.
    pub fn is_supported(self) -> bool {
        matches!(self, VersionClass::Current)
    }

    /// The last package version that could load a save of this class, if rejected.
    pub fn last_supported_package_version(self) -> Option<&'static str> {
        match self {
            VersionClass::PreU6 => Some(versions::LAST_SUPPORTED_PRE_U6),
            VersionClass::U6OrU7 => Some(versions::LAST_SUPPORTED_U6_U7),
            VersionClass::U8 => Some(versions::LAST_SUPPORTED_U8),
            VersionClass::Current => None,
        }
    }
}

/// Floating-point precision used to read/write a vector-family struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 4-byte IEEE-754 float
    Single,
    /// 8-byte IEEE-754 float
    Double,
}

/// Per struct-name/property-name precision hints.
///
/// Vector-family structs (`Vector`, `Vector2D`, `Vector4`, `Quat`, `Rotator`)
/// default to [`Precision::Double`] (spec §4.5: "Vector (3 doubles)"), but a
/// handful of legacy properties still carry single-precision floats. This
/// table is the one piece of knowledge that can't be inferred from the byte
/// stream and must be maintained alongside game-version updates (spec §9).
pub struct PrecisionTable {
    overrides: RwLock<HashMap<(String, String), Precision>>,
}

impl PrecisionTable {
    fn new() -> Self {
        let mut overrides = HashMap::new();
        // Legacy single-precision fields carried over from pre-UE5 saves.
        overrides.insert(
            ("Rotator".to_string(), "mRelativeRotation".to_string()),
            Precision::Single,
        );
        overrides.insert(
            ("Vector".to_string(), "mSpringValue".to_string()),
            Precision::Single,
        );
        Self {
            overrides: RwLock::new(overrides),
        }
    }

    /// Look up the precision for `struct_name`'s `property_name` field, falling
    /// back to [`Precision::Double`] for anything not explicitly overridden.
    pub fn lookup(&self, struct_name: &str, property_name: &str) -> Precision {
        self.overrides
            .read()
            .expect("precision table lock poisoned")
            .get(&(struct_name.to_string(), property_name.to_string()))
            .copied()
            .unwrap_or(Precision::Double)
    }

    /// Register or replace a precision hint, for callers that load a
    /// game-version-specific override table at startup.
    pub fn set(&self, struct_name: impl Into<String>, property_name: impl Into<String>, precision: Precision) {
        self.overrides
            .write()
            .expect("precision table lock poisoned")
            .insert((struct_name.into(), property_name.into()), precision);
    }
}

lazy_static::lazy_static! {
    /// Global precision hint table shared by the struct dispatcher's
    /// decoder and encoder.
    pub static ref PRECISION_TABLE: PrecisionTable = PrecisionTable::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_classification() {
        assert_eq!(VersionClass::classify(5, 13), VersionClass::PreU6);
        assert_eq!(VersionClass::classify(21, 13), VersionClass::U6OrU7);
        assert_eq!(VersionClass::classify(26, 13), VersionClass::U8);
        assert_eq!(VersionClass::classify(29, 13), VersionClass::Current);
        assert!(VersionClass::classify(29, 13).is_supported());
        assert!(!VersionClass::classify(5, 13).is_supported());
    }

    #[test]
    fn test_version_classification_takes_the_more_restrictive_field() {
        // A current saveVersion paired with a pre-U8 header is still rejected.
        assert_eq!(VersionClass::classify(29, 8), VersionClass::U8);
        // A current header paired with an old saveVersion is still rejected.
        assert_eq!(VersionClass::classify(5, 13), VersionClass::PreU6);
    }

    #[test]
    fn test_rejection_message_versions() {
        assert_eq!(
            VersionClass::PreU6.last_supported_package_version(),
            Some("0.0.34")
        );
        assert_eq!(VersionClass::Current.last_supported_package_version(), None);
    }

    #[test]
    fn test_precision_default_is_double() {
        assert_eq!(PRECISION_TABLE.lookup("Vector", "mLocation"), Precision::Double);
    }

    #[test]
    fn test_precision_override() {
        assert_eq!(
            PRECISION_TABLE.lookup("Rotator", "mRelativeRotation"),
            Precision::Single
        );
    }
}
