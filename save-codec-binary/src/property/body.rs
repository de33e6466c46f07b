//! The polymorphic property reader/writer: header dispatch, the
//! container/struct body codecs, and the length-prefix bookkeeping that
//! backs [`save_codec_core::CodecError::BodyLengthMismatch`].

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{BinaryError, Result};
use crate::property::list::{read_property_list, write_property_list};
use crate::property::text;
use crate::registry;
use save_codec_core::{
    ArrayElements, ArrayProperty, ByteValue, CodecError, MapProperty, ObjectReference, Property,
    PropertyValue, SetProperty, StructPayload, PRECISION_TABLE,
};

fn type_tag_of(value: &PropertyValue) -> &'static str {
    match value {
        PropertyValue::Bool(_) => "BoolProperty",
        PropertyValue::Int8(_) => "Int8Property",
        PropertyValue::Int32(_) => "IntProperty",
        PropertyValue::Int64(_) => "Int64Property",
        PropertyValue::UInt8(_) => "UInt8Property",
        PropertyValue::UInt32(_) => "UInt32Property",
        PropertyValue::UInt64(_) => "UInt64Property",
        PropertyValue::Float(_) => "FloatProperty",
        PropertyValue::Double(_) => "DoubleProperty",
        PropertyValue::Str(_) => "StrProperty",
        PropertyValue::Name(_) => "NameProperty",
        PropertyValue::Object(_) => "ObjectProperty",
        PropertyValue::SoftObject { .. } => "SoftObjectProperty",
        PropertyValue::Enum { .. } => "EnumProperty",
        PropertyValue::Text(_) => "TextProperty",
        PropertyValue::Byte(_) => "ByteProperty",
        PropertyValue::Array(_) => "ArrayProperty",
        PropertyValue::Set(_) => "SetProperty",
        PropertyValue::Map(_) => "MapProperty",
        PropertyValue::Struct { .. } => "StructProperty",
    }
}

fn read_object_reference(reader: &mut ByteReader) -> Result<ObjectReference> {
    Ok(ObjectReference {
        level_name: reader.read_string()?,
        path_name: reader.read_string()?,
    })
}

fn write_object_reference(writer: &mut ByteWriter, reference: &ObjectReference) {
    writer.write_string(&reference.level_name);
    writer.write_string(&reference.path_name);
}

/// Read the body-only encoding of a scalar value, for use as an array/set/
/// map element (no name, length, or GUID framing of its own).
fn read_inner_value(reader: &mut ByteReader, tag: &str) -> Result<PropertyValue> {
    match tag {
        "BoolProperty" => Ok(PropertyValue::Bool(reader.read_bool()?)),
        "Int8Property" => Ok(PropertyValue::Int8(reader.read_i8()?)),
        "IntProperty" => Ok(PropertyValue::Int32(reader.read_i32()?)),
        "Int64Property" => Ok(PropertyValue::Int64(reader.read_i64()?)),
        "UInt8Property" => Ok(PropertyValue::UInt8(reader.read_u8()?)),
        "UInt32Property" => Ok(PropertyValue::UInt32(reader.read_u32()?)),
        "UInt64Property" => Ok(PropertyValue::UInt64(reader.read_u64()?)),
        "FloatProperty" => Ok(PropertyValue::Float(reader.read_f32()?)),
        "DoubleProperty" => Ok(PropertyValue::Double(reader.read_f64()?)),
        "StrProperty" => Ok(PropertyValue::Str(reader.read_string()?)),
        "NameProperty" => Ok(PropertyValue::Name(reader.read_string()?)),
        "ObjectProperty" => Ok(PropertyValue::Object(read_object_reference(reader)?)),
        "SoftObjectProperty" => Ok(PropertyValue::SoftObject {
            reference: read_object_reference(reader)?,
            extra: reader.read_i32()?,
        }),
        "TextProperty" => Ok(PropertyValue::Text(text::read_text(reader)?)),
        other => Err(BinaryError::Codec(CodecError::unknown_type_tag(
            other,
            reader.position(),
        ))),
    }
}

fn write_inner_value(writer: &mut ByteWriter, value: &PropertyValue) -> Result<()> {
    match value {
        PropertyValue::Bool(v) => writer.write_bool(*v),
        PropertyValue::Int8(v) => writer.write_i8(*v),
        PropertyValue::Int32(v) => writer.write_i32(*v),
        PropertyValue::Int64(v) => writer.write_i64(*v),
        PropertyValue::UInt8(v) => writer.write_u8(*v),
        PropertyValue::UInt32(v) => writer.write_u32(*v),
        PropertyValue::UInt64(v) => writer.write_u64(*v),
        PropertyValue::Float(v) => writer.write_f32(*v),
        PropertyValue::Double(v) => writer.write_f64(*v),
        PropertyValue::Str(v) => writer.write_string(v),
        PropertyValue::Name(v) => writer.write_string(v),
        PropertyValue::Object(v) => write_object_reference(writer, v),
        PropertyValue::SoftObject { reference, extra } => {
            write_object_reference(writer, reference);
            writer.write_i32(*extra);
        }
        PropertyValue::Text(v) => text::write_text(writer, v),
        other => {
            return Err(BinaryError::Codec(CodecError::invalid_data(
                writer.position(),
                format!("{other:?} is not a supported container element type"),
            )));
        }
    }
    Ok(())
}

pub(crate) fn decode_struct_payload(
    reader: &mut ByteReader,
    struct_type: &str,
    property_name: &str,
) -> Result<StructPayload> {
    match registry::lookup(struct_type) {
        Some(handlers) => {
            let precision = PRECISION_TABLE.lookup(struct_type, property_name);
            (handlers.decode)(reader, precision)
        }
        None => {
            tracing::debug!(struct_type, property_name, "unrecognized struct type, falling back to generic");
            Ok(StructPayload::Generic(read_property_list(reader)?))
        }
    }
}

pub(crate) fn encode_struct_payload(
    writer: &mut ByteWriter,
    struct_type: &str,
    payload: &StructPayload,
    property_name: &str,
) -> Result<()> {
    if let StructPayload::Generic(list) = payload {
        return write_property_list(writer, list);
    }
    match registry::lookup(struct_type) {
        Some(handlers) => {
            let precision = PRECISION_TABLE.lookup(struct_type, property_name);
            (handlers.encode)(payload, writer, precision)
        }
        None => Err(BinaryError::Codec(CodecError::unknown_type_tag(
            struct_type,
            writer.position(),
        ))),
    }
}

/// Read one non-terminator property, given its already-consumed name.
pub fn read_property_body(reader: &mut ByteReader, name: String) -> Result<Property> {
    let type_tag = reader.read_string()?;
    let declared_len = reader.read_u32()?;
    let array_index = reader.read_u32()?;

    let mut guid = None;
    #[allow(unused_assignments)]
    let mut body_start = 0u64;
    let value = match type_tag.as_str() {
        "ArrayProperty" => {
            let inner_tag = reader.read_string()?;
            guid = reader.read_guid_info()?;
            reader.read_u8()?; // terminator
            body_start = reader.position();
            let count = reader.read_u32()?;
            let elements = if inner_tag == "StructProperty" {
                let element_name = reader.read_string()?;
                let struct_type = reader.read_string()?;
                let declared_size = reader.read_u32()?;
                let _zero = reader.read_i32()?;
                let struct_guid = reader.read_guid()?;
                let struct_guid_info = reader.read_guid_info()?;
                let body_start = reader.position();
                let mut elements = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    elements.push(decode_struct_payload(reader, &struct_type, &name)?);
                }
                let consumed = reader.position() - body_start;
                if consumed != declared_size as u64 {
                    return Err(BinaryError::Codec(CodecError::body_length_mismatch(
                        declared_size as u64,
                        consumed,
                        format!("{name}[ArrayProperty<Struct>]"),
                    )));
                }
                ArrayElements::Struct {
                    element_name,
                    struct_type,
                    struct_guid,
                    guid: struct_guid_info,
                    elements,
                }
            } else {
                let mut elements = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    elements.push(read_inner_value(reader, &inner_tag)?);
                }
                ArrayElements::Simple(elements)
            };
            PropertyValue::Array(ArrayProperty {
                inner_tag,
                guid,
                elements,
            })
        }
        "SetProperty" => {
            let inner_tag = reader.read_string()?;
            guid = reader.read_guid_info()?;
            reader.read_u8()?;
            body_start = reader.position();
            let count = reader.read_u32()?;
            let removal_count = reader.read_i32()?;
            let mut elements = Vec::with_capacity(count as usize);
            for _ in 0..count {
                elements.push(read_inner_value(reader, &inner_tag)?);
            }
            PropertyValue::Set(SetProperty {
                inner_tag,
                guid,
                removal_count,
                elements,
            })
        }
        "MapProperty" => {
            let key_tag = reader.read_string()?;
            let value_tag = reader.read_string()?;
            guid = reader.read_guid_info()?;
            reader.read_u8()?;
            body_start = reader.position();
            let removal_count = reader.read_i32()?;
            let count = reader.read_u32()?;
            let mut entries = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let key = read_inner_value(reader, &key_tag)?;
                let value = read_inner_value(reader, &value_tag)?;
                entries.push((key, value));
            }
            PropertyValue::Map(MapProperty {
                key_tag,
                value_tag,
                guid,
                removal_count,
                entries,
            })
        }
        "ByteProperty" => {
            let enum_name = reader.read_string()?;
            reader.read_u8()?;
            body_start = reader.position();
            if enum_name == "None" {
                PropertyValue::Byte(ByteValue::Raw(reader.read_u8()?))
            } else {
                PropertyValue::Byte(ByteValue::Enum {
                    enum_name,
                    value: reader.read_string()?,
                })
            }
        }
        "EnumProperty" => {
            let enum_type = reader.read_string()?;
            reader.read_u8()?;
            body_start = reader.position();
            PropertyValue::Enum {
                enum_type,
                value: reader.read_string()?,
            }
        }
        "StructProperty" => {
            let struct_type = reader.read_string()?;
            let struct_guid = reader.read_guid()?;
            guid = reader.read_guid_info()?;
            reader.read_u8()?;
            body_start = reader.position();
            let payload = decode_struct_payload(reader, &struct_type, &name)?;
            PropertyValue::Struct {
                struct_type,
                struct_guid,
                payload,
            }
        }
        "BoolProperty" => {
            // Bool's value rides in the header as its own byte, ahead of
            // the usual GUIDInfo flag (spec: "no body bytes").
            let value_byte = reader.read_u8()?;
            guid = reader.read_guid_info()?;
            reader.read_u8()?; // terminator
            body_start = reader.position();
            PropertyValue::Bool(value_byte != 0)
        }
        other => {
            guid = reader.read_guid_info()?;
            reader.read_u8()?;
            body_start = reader.position();
            read_inner_value(reader, other)?
        }
    };

    let consumed = reader.position() - body_start;
    if consumed != declared_len as u64 {
        return Err(BinaryError::Codec(CodecError::body_length_mismatch(
            declared_len as u64,
            consumed,
            format!("{name}[{type_tag}]"),
        )));
    }

    Ok(Property {
        name,
        array_index,
        guid,
        value,
    })
}

/// Write one non-terminator property (its name included).
pub fn write_property_body(writer: &mut ByteWriter, property: &Property) -> Result<()> {
    writer.write_string(&property.name);
    let type_tag = type_tag_of(&property.value);
    writer.write_string(type_tag);
    let len_at = writer.reserve_u32();
    writer.write_u32(property.array_index);

    match &property.value {
        PropertyValue::Array(array) => {
            writer.write_string(&array.inner_tag);
            writer.write_guid_info(array.guid.as_ref());
            writer.write_u8(0);
            let body_start = writer.position();
            match &array.elements {
                ArrayElements::Simple(elements) => {
                    writer.write_u32(elements.len() as u32);
                    for element in elements {
                        write_inner_value(writer, element)?;
                    }
                }
                ArrayElements::Struct {
                    element_name,
                    struct_type,
                    struct_guid,
                    guid,
                    elements,
                } => {
                    writer.write_u32(elements.len() as u32);
                    writer.write_string(element_name);
                    writer.write_string(struct_type);
                    let size_at = writer.reserve_u32();
                    writer.write_i32(0);
                    writer.write_guid(struct_guid);
                    writer.write_guid_info(guid.as_ref());
                    let struct_body_start = writer.position();
                    for element in elements {
                        encode_struct_payload(writer, struct_type, element, &property.name)?;
                    }
                    let size = writer.position() - struct_body_start;
                    writer.patch_u32(size_at, size as u32);
                }
            }
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
        PropertyValue::Set(set) => {
            writer.write_string(&set.inner_tag);
            writer.write_guid_info(set.guid.as_ref());
            writer.write_u8(0);
            let body_start = writer.position();
            writer.write_u32(set.elements.len() as u32);
            writer.write_i32(set.removal_count);
            for element in &set.elements {
                write_inner_value(writer, element)?;
            }
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
        PropertyValue::Map(map) => {
            writer.write_string(&map.key_tag);
            writer.write_string(&map.value_tag);
            writer.write_guid_info(map.guid.as_ref());
            writer.write_u8(0);
            let body_start = writer.position();
            writer.write_i32(map.removal_count);
            writer.write_u32(map.entries.len() as u32);
            for (key, value) in &map.entries {
                write_inner_value(writer, key)?;
                write_inner_value(writer, value)?;
            }
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
        PropertyValue::Byte(byte_value) => {
            match byte_value {
                ByteValue::Raw(_) => writer.write_string("None"),
                ByteValue::Enum { enum_name, .. } => writer.write_string(enum_name),
            }
            writer.write_u8(0);
            let body_start = writer.position();
            match byte_value {
                ByteValue::Raw(b) => writer.write_u8(*b),
                ByteValue::Enum { value, .. } => writer.write_string(value),
            }
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
        PropertyValue::Enum { enum_type, value } => {
            writer.write_string(enum_type);
            writer.write_u8(0);
            let body_start = writer.position();
            writer.write_string(value);
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
        PropertyValue::Struct {
            struct_type,
            struct_guid,
            payload,
        } => {
            writer.write_string(struct_type);
            writer.write_guid(struct_guid);
            writer.write_guid_info(property.guid.as_ref());
            writer.write_u8(0);
            let body_start = writer.position();
            encode_struct_payload(writer, struct_type, payload, &property.name)?;
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
        PropertyValue::Bool(v) => {
            writer.write_u8(if *v { 1 } else { 0 });
            writer.write_guid_info(property.guid.as_ref());
            writer.write_u8(0);
            writer.patch_u32(len_at, 0);
        }
        other => {
            writer.write_guid_info(property.guid.as_ref());
            writer.write_u8(0);
            let body_start = writer.position();
            write_inner_value(writer, other)?;
            let len = writer.position() - body_start;
            writer.patch_u32(len_at, len as u32);
        }
    }
    Ok(())
}
