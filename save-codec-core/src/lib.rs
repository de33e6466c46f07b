//! Core data structures shared by the save/blueprint binary codec.
//!
//! This crate is dependency-light on purpose: the property/struct value
//! model, object reference type, error enum, and version/precision tables
//! that both the decoder and the encoder need to agree on, with none of the
//! actual byte-level reading or writing.

pub mod constants;
pub mod error;
pub mod value;

pub use constants::{Precision, VersionClass, PRECISION_TABLE};
pub use error::{CodecError, Result};
pub use value::{
    ArrayElements, ArrayProperty, ByteValue, GuidInfo, MapProperty, ObjectReference, Property,
    PropertyList, PropertyValue, SetProperty, StructPayload, TextHistory, TextValue,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let mut list = PropertyList::new();
        list.push(Property::new("mNumInventorySlots", PropertyValue::Int32(48)));
        assert_eq!(list.len(), 1);
        assert!(VersionClass::classify(29, 13).is_supported());
    }
}
