//! Integration round-trip tests covering the crate's cross-module
//! scenarios: a full save, version rejection, and a blueprint pair.

use save_codec_binary::blueprint::{Blueprint, BlueprintCodec, BlueprintHeader};
use save_codec_binary::chunk::CompressionInfo;
use save_codec_binary::grids::PartitionGrids;
use save_codec_binary::object::{ComponentHeader, EntityHeader, SceneObject};
use save_codec_binary::save::{Level, Save, SaveCodec, SaveHeader};
use save_codec_core::{
    ArrayElements, ArrayProperty, MapProperty, ObjectReference, Property, PropertyList, PropertyValue,
    StructPayload,
};

fn sample_header() -> SaveHeader {
    SaveHeader {
        save_header_version: 13,
        save_version: 42,
        build_version: 123456,
        map_name: "Persistent_Level".to_string(),
        map_options: String::new(),
        session_name: "Integration Factory".to_string(),
        play_duration_seconds: 7200,
        save_date_ticks: 638_123_456_789_000_000,
        session_visibility: 1,
        editor_object_version: 0,
        mod_metadata: String::new(),
        is_modded_save: false,
    }
}

fn sample_entity() -> SceneObject {
    let mut properties = PropertyList::new();
    properties.push(Property::new("mHealth", PropertyValue::Float(100.0)));
    properties.push(Property::new(
        "mInventory",
        PropertyValue::Array(ArrayProperty {
            inner_tag: "IntProperty".to_string(),
            guid: None,
            elements: ArrayElements::Simple(vec![
                PropertyValue::Int32(1),
                PropertyValue::Int32(2),
                PropertyValue::Int32(3),
            ]),
        }),
    ));
    properties.push(Property::new(
        "mCounts",
        PropertyValue::Map(MapProperty {
            key_tag: "NameProperty".to_string(),
            value_tag: "IntProperty".to_string(),
            guid: None,
            removal_count: 0,
            entries: vec![
                (
                    PropertyValue::Name("Iron".to_string()),
                    PropertyValue::Int32(10),
                ),
                (
                    PropertyValue::Name("Copper".to_string()),
                    PropertyValue::Int32(20),
                ),
            ],
        }),
    ));
    properties.push(Property::new(
        "mRelativeLocation",
        PropertyValue::Struct {
            struct_type: "Vector".to_string(),
            struct_guid: [0u8; 16],
            payload: StructPayload::Vector {
                x: 1.0,
                y: -0.0,
                z: 3.5,
            },
        },
    ));

    SceneObject::Entity {
        header: EntityHeader {
            type_path: "/Script/Game.BP_Assembler_C".to_string(),
            root_object_path: "Persistent_Level".to_string(),
            instance_name: "BP_Assembler_0".to_string(),
            needs_transform: true,
            transform: StructPayload::Transform {
                rotation: Some([0.0, 0.0, 0.0, 1.0]),
                translation: Some([100.0, 200.0, 0.0]),
                scale3d: None,
            },
            was_placed_in_level: true,
        },
        offset_index: 0,
        parent: None,
        children: vec![ObjectReference {
            level_name: "Persistent_Level".to_string(),
            path_name: "BP_Assembler_0.Input_0".to_string(),
        }],
        properties,
        trailing_blob: Vec::new(),
    }
}

fn sample_component() -> SceneObject {
    SceneObject::Component {
        header: ComponentHeader {
            type_path: "/Script/Game.BP_Input_C".to_string(),
            root_object_path: "Persistent_Level".to_string(),
            instance_name: "Input_0".to_string(),
            outer_object_path: "BP_Assembler_0".to_string(),
        },
        offset_index: 1,
        properties: PropertyList::new(),
        trailing_blob: Vec::new(),
    }
}

#[test]
fn minimal_save_round_trips_through_header_chunks_grids_and_levels() {
    let save = Save {
        header: sample_header(),
        compression_info: CompressionInfo::default(),
        body_hash: [9u8; 32],
        grids: PartitionGrids(vec![1, 2, 3, 4, 5, 6, 7, 8]),
        levels: vec![Level {
            objects: vec![sample_entity(), sample_component()],
            collectables: vec![ObjectReference {
                level_name: "Persistent_Level".to_string(),
                path_name: "Pickup_0".to_string(),
            }],
            trailing_blob: vec![0xAA, 0xBB],
        }],
    };

    let mut chunk_count = 0;
    let (bytes, summaries) = SaveCodec::encode(&save, |_| {}, |_| {}, |_, _| chunk_count += 1).unwrap();
    assert!(!summaries.is_empty());
    assert_eq!(chunk_count, summaries.len());

    // body_hash is recomputed during encode, so it's excluded from the comparison.
    let decoded = SaveCodec::decode(&bytes, |_| {}).unwrap();
    assert_eq!(decoded.header, save.header);
    assert_eq!(decoded.grids, save.grids);
    assert_eq!(decoded.levels, save.levels);
    assert_eq!(decoded.level_name(0), "Persistent_Level");
}

#[test]
fn old_save_version_is_rejected_with_downgrade_hint() {
    let mut save = Save {
        header: sample_header(),
        compression_info: CompressionInfo::default(),
        body_hash: [0u8; 32],
        grids: PartitionGrids::default(),
        levels: vec![Level::default()],
    };
    save.header.save_version = 3;

    let err = SaveCodec::encode(&save, |_| {}, |_| {}, |_, _| {}).unwrap_err();
    assert!(err.to_string().contains("0.0.34"));
}

#[test]
fn vector_negative_zero_survives_a_full_save_round_trip() {
    let mut properties = PropertyList::new();
    properties.push(Property::new(
        "mOffset",
        PropertyValue::Struct {
            struct_type: "Vector".to_string(),
            struct_guid: [0u8; 16],
            payload: StructPayload::Vector {
                x: 0.0,
                y: -0.0,
                z: 0.0,
            },
        },
    ));
    let object = SceneObject::Component {
        header: ComponentHeader {
            type_path: "/Script/Game.BP_Foo_C".to_string(),
            root_object_path: "Persistent_Level".to_string(),
            instance_name: "BP_Foo_0".to_string(),
            outer_object_path: "BP_Foo_0".to_string(),
        },
        offset_index: 0,
        properties,
        trailing_blob: Vec::new(),
    };

    let save = Save {
        header: sample_header(),
        compression_info: CompressionInfo::default(),
        body_hash: [0u8; 32],
        grids: PartitionGrids::default(),
        levels: vec![Level {
            objects: vec![object],
            collectables: Vec::new(),
            trailing_blob: Vec::new(),
        }],
    };

    let (bytes, _) = SaveCodec::encode(&save, |_| {}, |_| {}, |_, _| {}).unwrap();
    let decoded = SaveCodec::decode(&bytes, |_| {}).unwrap();
    assert_eq!(decoded.header, save.header);
    assert_eq!(decoded.grids, save.grids);
    assert_eq!(decoded.levels, save.levels);

    let SceneObject::Component { properties, .. } = &decoded.levels[0].objects[0] else {
        panic!("expected component");
    };
    match &properties.get("mOffset").unwrap().value {
        PropertyValue::Struct { payload: StructPayload::Vector { y, .. }, .. } => {
            assert_eq!(y.to_bits(), (-0.0_f64).to_bits());
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn blueprint_pair_round_trips_independently_of_save_codec() {
    let blueprint = Blueprint {
        header: BlueprintHeader {
            header_version: 13,
            save_version: 42,
            build_version: 123456,
        },
        compression_info: CompressionInfo::default(),
        objects: vec![sample_entity(), sample_component()],
        config: vec![1, 2, 3, 4, 5],
    };

    let (main_bytes, summaries, config_bytes) =
        BlueprintCodec::encode(&blueprint, |_| {}, |_| {}, |_, _| {}).unwrap();
    assert!(!summaries.is_empty());

    let decoded = BlueprintCodec::decode(&main_bytes, &config_bytes, |_| {}).unwrap();
    assert_eq!(decoded, blueprint);
}
