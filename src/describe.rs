//! Converts the decoded object graph into [`JsonValue`] trees for the
//! `stringify` façade entry point and CLI reporting — read-only
//! introspection, never consulted by the codec's own round-trip path.

use crate::json::JsonValue;
use save_codec_binary::blueprint::Blueprint;
use save_codec_binary::object::SceneObject;
use save_codec_binary::save::Save;
use save_codec_core::{
    ArrayElements, ByteValue, ObjectReference, Property, PropertyList, PropertyValue, StructPayload,
    TextHistory, TextValue,
};

pub fn save_to_json(save: &Save) -> JsonValue {
    JsonValue::object([
        ("header", header_to_json(save)),
        ("bodyHash", JsonValue::String(hex(&save.body_hash))),
        ("gridsBytes", JsonValue::Number(save.grids.0.len() as f64)),
        (
            "levels",
            JsonValue::Array(
                save.levels
                    .iter()
                    .enumerate()
                    .map(|(i, level)| {
                        JsonValue::object([
                            ("name", JsonValue::String(save.level_name(i))),
                            (
                                "objects",
                                JsonValue::Array(level.objects.iter().map(object_to_json).collect()),
                            ),
                            (
                                "collectables",
                                JsonValue::Array(
                                    level
                                        .collectables
                                        .iter()
                                        .map(|r| JsonValue::String(reference_to_string(r)))
                                        .collect(),
                                ),
                            ),
                        ])
                    })
                    .collect(),
            ),
        ),
    ])
}

pub fn blueprint_to_json(blueprint: &Blueprint) -> JsonValue {
    JsonValue::object([
        (
            "header",
            JsonValue::object([
                ("headerVersion", JsonValue::Number(blueprint.header.header_version as f64)),
                ("saveVersion", JsonValue::Number(blueprint.header.save_version as f64)),
                ("buildVersion", JsonValue::BigInt(blueprint.header.build_version as i64)),
            ]),
        ),
        (
            "objects",
            JsonValue::Array(blueprint.objects.iter().map(object_to_json).collect()),
        ),
        ("configBytes", JsonValue::Number(blueprint.config.len() as f64)),
    ])
}

fn header_to_json(save: &Save) -> JsonValue {
    let header = &save.header;
    JsonValue::object([
        ("saveHeaderVersion", JsonValue::Number(header.save_header_version as f64)),
        ("saveVersion", JsonValue::Number(header.save_version as f64)),
        ("buildVersion", JsonValue::BigInt(header.build_version as i64)),
        ("mapName", JsonValue::String(header.map_name.clone())),
        ("sessionName", JsonValue::String(header.session_name.clone())),
        ("playDurationSeconds", JsonValue::Number(header.play_duration_seconds as f64)),
        ("saveDateTicks", JsonValue::BigInt(header.save_date_ticks)),
        ("isModdedSave", JsonValue::Bool(header.is_modded_save)),
    ])
}

fn reference_to_string(reference: &ObjectReference) -> String {
    reference.to_string()
}

fn object_to_json(object: &SceneObject) -> JsonValue {
    match object {
        SceneObject::Component { header, properties, .. } => JsonValue::object([
            ("kind", JsonValue::String("Component".to_string())),
            ("typePath", JsonValue::String(header.type_path.clone())),
            ("instanceName", JsonValue::String(header.instance_name.clone())),
            ("properties", property_list_to_json(properties)),
        ]),
        SceneObject::Entity {
            header,
            parent,
            children,
            properties,
            ..
        } => JsonValue::object([
            ("kind", JsonValue::String("Entity".to_string())),
            ("typePath", JsonValue::String(header.type_path.clone())),
            ("instanceName", JsonValue::String(header.instance_name.clone())),
            (
                "parent",
                parent
                    .as_ref()
                    .map(|r| JsonValue::String(reference_to_string(r)))
                    .unwrap_or(JsonValue::Null),
            ),
            (
                "children",
                JsonValue::Array(children.iter().map(|r| JsonValue::String(reference_to_string(r))).collect()),
            ),
            ("properties", property_list_to_json(properties)),
        ]),
    }
}

fn property_list_to_json(list: &PropertyList) -> JsonValue {
    JsonValue::Array(list.iter().map(property_to_json).collect())
}

fn property_to_json(property: &Property) -> JsonValue {
    JsonValue::object([
        ("name", JsonValue::String(property.name.clone())),
        ("value", property_value_to_json(&property.value)),
    ])
}

fn property_value_to_json(value: &PropertyValue) -> JsonValue {
    match value {
        PropertyValue::Bool(b) => JsonValue::Bool(*b),
        PropertyValue::Int8(v) => JsonValue::Number(*v as f64),
        PropertyValue::Int32(v) => JsonValue::Number(*v as f64),
        PropertyValue::Int64(v) => JsonValue::BigInt(*v),
        PropertyValue::UInt8(v) => JsonValue::Number(*v as f64),
        PropertyValue::UInt32(v) => JsonValue::Number(*v as f64),
        PropertyValue::UInt64(v) => JsonValue::BigInt(*v as i64),
        PropertyValue::Float(v) => JsonValue::Number(*v as f64),
        PropertyValue::Double(v) => JsonValue::Number(*v),
        PropertyValue::Str(s) | PropertyValue::Name(s) => JsonValue::String(s.clone()),
        PropertyValue::Object(r) => JsonValue::String(reference_to_string(r)),
        PropertyValue::SoftObject { reference, .. } => JsonValue::String(reference_to_string(reference)),
        PropertyValue::Enum { enum_type, value } => JsonValue::object([
            ("enumType", JsonValue::String(enum_type.clone())),
            ("value", JsonValue::String(value.clone())),
        ]),
        PropertyValue::Text(t) => text_to_json(t),
        PropertyValue::Byte(b) => match b {
            ByteValue::Raw(v) => JsonValue::Number(*v as f64),
            ByteValue::Enum { enum_name, value } => JsonValue::object([
                ("enumName", JsonValue::String(enum_name.clone())),
                ("value", JsonValue::String(value.clone())),
            ]),
        },
        PropertyValue::Array(array) => match &array.elements {
            ArrayElements::Simple(items) => JsonValue::Array(items.iter().map(property_value_to_json).collect()),
            ArrayElements::Struct { elements, .. } => {
                JsonValue::Array(elements.iter().map(struct_payload_to_json).collect())
            }
        },
        PropertyValue::Set(set) => JsonValue::Array(set.elements.iter().map(property_value_to_json).collect()),
        PropertyValue::Map(map) => JsonValue::Array(
            map.entries
                .iter()
                .map(|(k, v)| {
                    JsonValue::object([("key", property_value_to_json(k)), ("value", property_value_to_json(v))])
                })
                .collect(),
        ),
        PropertyValue::Struct { struct_type, payload, .. } => JsonValue::object([
            ("structType", JsonValue::String(struct_type.clone())),
            ("payload", struct_payload_to_json(payload)),
        ]),
    }
}

fn struct_payload_to_json(payload: &StructPayload) -> JsonValue {
    match payload {
        StructPayload::Vector { x, y, z } => JsonValue::object([
            ("x", JsonValue::Number(*x)),
            ("y", JsonValue::Number(*y)),
            ("z", JsonValue::Number(*z)),
        ]),
        StructPayload::Vector2D { x, y } => {
            JsonValue::object([("x", JsonValue::Number(*x)), ("y", JsonValue::Number(*y))])
        }
        StructPayload::Vector4 { x, y, z, w } | StructPayload::Quat { x, y, z, w } => JsonValue::object([
            ("x", JsonValue::Number(*x)),
            ("y", JsonValue::Number(*y)),
            ("z", JsonValue::Number(*z)),
            ("w", JsonValue::Number(*w)),
        ]),
        StructPayload::Rotator { pitch, yaw, roll } => JsonValue::object([
            ("pitch", JsonValue::Number(*pitch)),
            ("yaw", JsonValue::Number(*yaw)),
            ("roll", JsonValue::Number(*roll)),
        ]),
        StructPayload::Color { b, g, r, a } => JsonValue::object([
            ("r", JsonValue::Number(*r as f64)),
            ("g", JsonValue::Number(*g as f64)),
            ("b", JsonValue::Number(*b as f64)),
            ("a", JsonValue::Number(*a as f64)),
        ]),
        StructPayload::LinearColor { r, g, b, a } => JsonValue::object([
            ("r", JsonValue::Number(*r as f64)),
            ("g", JsonValue::Number(*g as f64)),
            ("b", JsonValue::Number(*b as f64)),
            ("a", JsonValue::Number(*a as f64)),
        ]),
        StructPayload::Transform { rotation, translation, scale3d } => JsonValue::object([
            ("rotation", rotation.map(vec4_json).unwrap_or(JsonValue::Null)),
            ("translation", translation.map(vec3_json).unwrap_or(JsonValue::Null)),
            ("scale3d", scale3d.map(vec3_json).unwrap_or(JsonValue::Null)),
        ]),
        StructPayload::Box { min, max, is_valid } => JsonValue::object([
            ("min", vec3_json(*min)),
            ("max", vec3_json(*max)),
            ("isValid", JsonValue::Number(*is_valid as f64)),
        ]),
        StructPayload::IntPoint { x, y } => {
            JsonValue::object([("x", JsonValue::Number(*x as f64)), ("y", JsonValue::Number(*y as f64))])
        }
        StructPayload::IntVector { x, y, z } => JsonValue::object([
            ("x", JsonValue::Number(*x as f64)),
            ("y", JsonValue::Number(*y as f64)),
            ("z", JsonValue::Number(*z as f64)),
        ]),
        StructPayload::DateTime { ticks } => JsonValue::object([("ticks", JsonValue::BigInt(*ticks))]),
        StructPayload::Guid(bytes) => JsonValue::String(hex(bytes)),
        StructPayload::FluidBox { value } => JsonValue::Number(*value as f64),
        StructPayload::FicFrameRange { begin_frame, end_frame } => JsonValue::object([
            ("beginFrame", JsonValue::BigInt(*begin_frame)),
            ("endFrame", JsonValue::BigInt(*end_frame)),
        ]),
        StructPayload::RailroadTrackPosition { track, offset, forward } => JsonValue::object([
            ("track", JsonValue::String(reference_to_string(track))),
            ("offset", JsonValue::Number(*offset as f64)),
            ("forward", JsonValue::Number(*forward as f64)),
        ]),
        StructPayload::InventoryItem { item_name, state } => JsonValue::object([
            ("itemName", JsonValue::String(item_name.clone())),
            (
                "state",
                state
                    .as_ref()
                    .map(|reference| JsonValue::String(reference_to_string(reference)))
                    .unwrap_or(JsonValue::Null),
            ),
        ]),
        StructPayload::ClientIdentityInfo(bytes) => JsonValue::String(hex(bytes)),
        StructPayload::ScannableResourcePair { resource, amount } => JsonValue::object([
            ("resource", JsonValue::String(reference_to_string(resource))),
            ("amount", JsonValue::Number(*amount as f64)),
        ]),
        StructPayload::SpawnData { class_path, properties } => JsonValue::object([
            ("classPath", JsonValue::String(class_path.clone())),
            ("properties", property_list_to_json(properties)),
        ]),
        StructPayload::PhaseCost { item_costs } => JsonValue::Array(
            item_costs
                .iter()
                .map(|(item_class, amount)| {
                    JsonValue::object([
                        ("itemClass", JsonValue::String(item_class.clone())),
                        ("amount", JsonValue::Number(*amount as f64)),
                    ])
                })
                .collect(),
        ),
        StructPayload::Generic(list) => property_list_to_json(list),
    }
}

fn vec3_json(v: [f64; 3]) -> JsonValue {
    JsonValue::object([
        ("x", JsonValue::Number(v[0])),
        ("y", JsonValue::Number(v[1])),
        ("z", JsonValue::Number(v[2])),
    ])
}

fn vec4_json(v: [f64; 4]) -> JsonValue {
    JsonValue::object([
        ("x", JsonValue::Number(v[0])),
        ("y", JsonValue::Number(v[1])),
        ("z", JsonValue::Number(v[2])),
        ("w", JsonValue::Number(v[3])),
    ])
}

fn text_to_json(text: &TextValue) -> JsonValue {
    let history = match &text.history {
        TextHistory::None => JsonValue::Null,
        TextHistory::Base { namespace, key, source_string } => JsonValue::object([
            ("kind", JsonValue::String("Base".to_string())),
            ("namespace", JsonValue::String(namespace.clone())),
            ("key", JsonValue::String(key.clone())),
            ("sourceString", JsonValue::String(source_string.clone())),
        ]),
        TextHistory::NamedFormat { source_format, .. } => JsonValue::object([
            ("kind", JsonValue::String("NamedFormat".to_string())),
            ("sourceFormat", text_to_json(source_format)),
        ]),
        TextHistory::ArgumentFormat { source_format, .. } => JsonValue::object([
            ("kind", JsonValue::String("ArgumentFormat".to_string())),
            ("sourceFormat", text_to_json(source_format)),
        ]),
        TextHistory::AsNumber { source_value, target_culture, .. } => JsonValue::object([
            ("kind", JsonValue::String("AsNumber".to_string())),
            ("sourceValue", text_to_json(source_value)),
            ("targetCulture", JsonValue::String(target_culture.clone())),
        ]),
        TextHistory::AsDate { date_time_ticks, target_culture, .. } => JsonValue::object([
            ("kind", JsonValue::String("AsDate".to_string())),
            ("dateTimeTicks", JsonValue::BigInt(*date_time_ticks)),
            ("targetCulture", JsonValue::String(target_culture.clone())),
        ]),
        TextHistory::Transform { source_text, .. } => JsonValue::object([
            ("kind", JsonValue::String("Transform".to_string())),
            ("sourceText", text_to_json(source_text)),
        ]),
        TextHistory::StringTableEntry { table_id, key } => JsonValue::object([
            ("kind", JsonValue::String("StringTableEntry".to_string())),
            ("tableId", JsonValue::String(table_id.clone())),
            ("key", JsonValue::String(key.clone())),
        ]),
    };
    JsonValue::object([("flags", JsonValue::Number(text.flags as f64)), ("history", history)])
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::stringify;
    use save_codec_binary::chunk::CompressionInfo;
    use save_codec_binary::grids::PartitionGrids;
    use save_codec_binary::object::{ComponentHeader, SceneObject};
    use save_codec_binary::save::{Level, SaveHeader};

    #[test]
    fn test_save_to_json_renders_map_name() {
        let save = Save {
            header: SaveHeader {
                save_header_version: 1,
                save_version: 42,
                build_version: 1,
                map_name: "Persistent_Level".to_string(),
                map_options: String::new(),
                session_name: "Test".to_string(),
                play_duration_seconds: 0,
                save_date_ticks: 0,
                session_visibility: 0,
                editor_object_version: 0,
                mod_metadata: String::new(),
                is_modded_save: false,
            },
            compression_info: CompressionInfo::default(),
            body_hash: [0u8; 32],
            grids: PartitionGrids::default(),
            levels: vec![Level {
                objects: vec![SceneObject::Component {
                    header: ComponentHeader {
                        type_path: "/Script/Game.BP_Foo_C".to_string(),
                        root_object_path: "Persistent_Level".to_string(),
                        instance_name: "BP_Foo_0".to_string(),
                        outer_object_path: "BP_Foo_0".to_string(),
                    },
                    offset_index: 0,
                    properties: PropertyList::new(),
                    trailing_blob: Vec::new(),
                }],
                collectables: Vec::new(),
                trailing_blob: Vec::new(),
            }],
        };
        let json = stringify(&save_to_json(&save), 2);
        assert!(json.contains("Persistent_Level"));
        assert!(json.contains("BP_Foo_0"));
    }

    #[test]
    fn test_big_int64_property_renders_as_decimal_string() {
        let mut list = PropertyList::new();
        list.push(Property::new("mTicks", PropertyValue::Int64(i64::MAX)));
        let json = stringify(&property_list_to_json(&list), 0);
        assert!(json.contains(&format!("\"{}\"", i64::MAX)));
    }
}
