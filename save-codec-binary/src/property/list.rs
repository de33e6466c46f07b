//! A `None`-terminated property list: the unit every object, struct, and
//! map/array element ultimately bottoms out in.

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::Result;
use crate::property::body;
use save_codec_core::PropertyList;

const TERMINATOR_NAME: &str = "None";

/// Read properties until the `None` terminator, which is consumed but not
/// stored (spec: "no other property may bear that name").
pub fn read_property_list(reader: &mut ByteReader) -> Result<PropertyList> {
    let mut list = PropertyList::new();
    loop {
        let name = reader.read_string()?;
        if name == TERMINATOR_NAME {
            break;
        }
        let property = body::read_property_body(reader, name)?;
        list.push(property);
    }
    Ok(list)
}

/// Write every property followed by the `None` terminator.
pub fn write_property_list(writer: &mut ByteWriter, list: &PropertyList) -> Result<()> {
    for property in list.iter() {
        body::write_property_body(writer, property)?;
    }
    writer.write_string(TERMINATOR_NAME);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use save_codec_core::{Property, PropertyValue};

    #[test]
    fn test_empty_list_round_trip() {
        let list = PropertyList::new();
        let mut writer = ByteWriter::new();
        write_property_list(&mut writer, &list).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        let decoded = read_property_list(&mut reader).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_single_property_terminator_invariant() {
        let mut list = PropertyList::new();
        list.push(Property::new("mHealth", PropertyValue::Int32(100)));
        let mut writer = ByteWriter::new();
        write_property_list(&mut writer, &list).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        let decoded = read_property_list(&mut reader).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded.get("None").is_none());
    }
}
