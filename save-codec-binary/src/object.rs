//! Scene object codec: the two-pass (headers, then bodies) encoding of
//! every entity and component in a level.

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{BinaryError, Result};
use crate::property::structs;
use crate::property::{read_property_list, write_property_list};
use save_codec_core::{CodecError, ObjectReference, Precision, PropertyList, StructPayload};

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentHeader {
    pub type_path: String,
    pub root_object_path: String,
    pub instance_name: String,
    pub outer_object_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityHeader {
    pub type_path: String,
    pub root_object_path: String,
    pub instance_name: String,
    pub needs_transform: bool,
    pub transform: StructPayload,
    pub was_placed_in_level: bool,
}

/// A decoded scene object: either a component (owned by an entity) or an
/// entity (with its own transform, optional parent, and child list).
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Component {
        header: ComponentHeader,
        /// The offset-index field from the body record; not interpreted,
        /// carried through for byte-exact re-encoding.
        offset_index: u32,
        properties: PropertyList,
        trailing_blob: Vec<u8>,
    },
    Entity {
        header: EntityHeader,
        offset_index: u32,
        parent: Option<ObjectReference>,
        children: Vec<ObjectReference>,
        properties: PropertyList,
        trailing_blob: Vec<u8>,
    },
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

enum HeaderInfo {
    Component(ComponentHeader),
    Entity(EntityHeader),
}

fn read_header(reader: &mut ByteReader) -> Result<HeaderInfo> {
    let tag = reader.read_u32()?;
    match tag {
        0 => Ok(HeaderInfo::Component(ComponentHeader {
            type_path: reader.read_string()?,
            root_object_path: reader.read_string()?,
            instance_name: reader.read_string()?,
            outer_object_path: reader.read_string()?,
        })),
        1 => {
            let type_path = reader.read_string()?;
            let root_object_path = reader.read_string()?;
            let instance_name = reader.read_string()?;
            let needs_transform = reader.read_bool32()?;
            let transform = (structs::decode_transform)(reader, Precision::Double)?;
            let was_placed_in_level = reader.read_bool32()?;
            Ok(HeaderInfo::Entity(EntityHeader {
                type_path,
                root_object_path,
                instance_name,
                needs_transform,
                transform,
                was_placed_in_level,
            }))
        }
        other => Err(BinaryError::Codec(CodecError::invalid_data(
            reader.position(),
            format!("unknown scene object variant tag {other}"),
        ))),
    }
}

fn write_header(writer: &mut ByteWriter, object: &SceneObject) -> Result<()> {
    match object {
        SceneObject::Component { header, .. } => {
            writer.write_u32(0);
            writer.write_string(&header.type_path);
            writer.write_string(&header.root_object_path);
            writer.write_string(&header.instance_name);
            writer.write_string(&header.outer_object_path);
        }
        SceneObject::Entity { header, .. } => {
            writer.write_u32(1);
            writer.write_string(&header.type_path);
            writer.write_string(&header.root_object_path);
            writer.write_string(&header.instance_name);
            writer.write_bool32(header.needs_transform);
            (structs::encode_transform)(&header.transform, writer, Precision::Double)?;
            writer.write_bool32(header.was_placed_in_level);
        }
    }
    Ok(())
}

/// Read every scene object header, in header-pass order.
fn read_headers(reader: &mut ByteReader) -> Result<Vec<HeaderInfo>> {
    let count = reader.read_u32()?;
    let mut headers = Vec::with_capacity(count as usize);
    for _ in 0..count {
        headers.push(read_header(reader)?);
    }
    Ok(headers)
}

/// Read every scene object body and zip it with its matching header.
fn read_bodies(reader: &mut ByteReader, headers: Vec<HeaderInfo>) -> Result<Vec<SceneObject>> {
    let count = reader.read_u32()?;
    if count as usize != headers.len() {
        return Err(BinaryError::Codec(CodecError::invalid_data(
            reader.position(),
            format!(
                "object header count ({}) does not match body count ({count})",
                headers.len()
            ),
        )));
    }

    let mut objects = Vec::with_capacity(headers.len());
    for header in headers {
        let body_size = reader.read_u32()?;
        let offset_index = reader.read_u32()?;
        let body_start = reader.position();

        let object = match header {
            HeaderInfo::Component(header) => {
                let properties = read_property_list(reader)?;
                let consumed = reader.position() - body_start;
                let remaining = (body_size as u64).saturating_sub(consumed);
                let trailing_blob = reader.read_bytes(remaining as usize)?.to_vec();
                SceneObject::Component {
                    header,
                    offset_index,
                    properties,
                    trailing_blob,
                }
            }
            HeaderInfo::Entity(header) => {
                let parent = if reader.read_bool()? {
                    Some(read_object_reference(reader)?)
                } else {
                    None
                };
                let child_count = reader.read_u32()?;
                let mut children = Vec::with_capacity(child_count as usize);
                for _ in 0..child_count {
                    children.push(read_object_reference(reader)?);
                }
                let properties = read_property_list(reader)?;
                let consumed = reader.position() - body_start;
                let remaining = (body_size as u64).saturating_sub(consumed);
                let trailing_blob = reader.read_bytes(remaining as usize)?.to_vec();
                SceneObject::Entity {
                    header,
                    offset_index,
                    parent,
                    children,
                    properties,
                    trailing_blob,
                }
            }
        };

        let consumed = reader.position() - body_start;
        if consumed != body_size as u64 {
            return Err(BinaryError::Codec(CodecError::body_length_mismatch(
                body_size as u64,
                consumed,
                "object body",
            )));
        }
        objects.push(object);
    }
    Ok(objects)
}

fn write_body(writer: &mut ByteWriter, object: &SceneObject) -> Result<()> {
    let size_at = writer.reserve_u32();
    match object {
        SceneObject::Component {
            offset_index,
            properties,
            trailing_blob,
            ..
        } => {
            writer.write_u32(*offset_index);
            let body_start = writer.position();
            write_property_list(writer, properties)?;
            writer.write_bytes(trailing_blob);
            let size = writer.position() - body_start;
            writer.patch_u32(size_at, size as u32);
        }
        SceneObject::Entity {
            offset_index,
            parent,
            children,
            properties,
            trailing_blob,
            ..
        } => {
            writer.write_u32(*offset_index);
            let body_start = writer.position();
            writer.write_bool(parent.is_some());
            if let Some(parent) = parent {
                write_object_reference(writer, parent);
            }
            writer.write_u32(children.len() as u32);
            for child in children {
                write_object_reference(writer, child);
            }
            write_property_list(writer, properties)?;
            writer.write_bytes(trailing_blob);
            let size = writer.position() - body_start;
            writer.patch_u32(size_at, size as u32);
        }
    }
    Ok(())
}

/// Reads and writes the scene object list for one level: a header pass
/// followed by a body pass, matched by position.
pub struct ObjectCodec;

impl ObjectCodec {
    pub fn decode(reader: &mut ByteReader) -> Result<Vec<SceneObject>> {
        let headers = read_headers(reader)?;
        read_bodies(reader, headers)
    }

    pub fn encode(writer: &mut ByteWriter, objects: &[SceneObject]) -> Result<()> {
        writer.write_u32(objects.len() as u32);
        for object in objects {
            write_header(writer, object)?;
        }
        writer.write_u32(objects.len() as u32);
        for object in objects {
            write_body(writer, object)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save_codec_core::{Property, PropertyValue};

    fn sample_entity() -> SceneObject {
        let mut properties = PropertyList::new();
        properties.push(Property::new("mHealth", PropertyValue::Float(100.0)));
        SceneObject::Entity {
            header: EntityHeader {
                type_path: "/Script/Game.BP_Foo".to_string(),
                root_object_path: "Persistent_Level".to_string(),
                instance_name: "BP_Foo_0".to_string(),
                needs_transform: true,
                transform: StructPayload::Transform {
                    rotation: None,
                    translation: Some([1.0, 2.0, 3.0]),
                    scale3d: None,
                },
                was_placed_in_level: false,
            },
            offset_index: 0,
            parent: None,
            children: vec![ObjectReference {
                level_name: "Persistent_Level".to_string(),
                path_name: "BP_Foo_0.Comp_0".to_string(),
            }],
            properties,
            trailing_blob: vec![9, 9, 9],
        }
    }

    #[test]
    fn test_single_entity_round_trip() {
        let objects = vec![sample_entity()];
        let mut writer = ByteWriter::new();
        ObjectCodec::encode(&mut writer, &objects).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        let decoded = ObjectCodec::decode(&mut reader).unwrap();
        assert_eq!(decoded, objects);
        assert_eq!(reader.position(), bytes.len() as u64);
    }

    #[test]
    fn test_empty_object_list_round_trip() {
        let objects: Vec<SceneObject> = Vec::new();
        let mut writer = ByteWriter::new();
        ObjectCodec::encode(&mut writer, &objects).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        let decoded = ObjectCodec::decode(&mut reader).unwrap();
        assert!(decoded.is_empty());
    }
}
