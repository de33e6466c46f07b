//! Decode/encode functions for the well-known struct-type names, registered
//! into [`crate::registry::STRUCT_REGISTRY`].
//!
//! Vector-family structs are read/written in either double or float
//! precision per the hint in [`save_codec_core::PRECISION_TABLE`]; values
//! are always stored widened to `f64` internally, and narrowed back to
//! `f32` on encode whenever the hint says `Single` so the same hint table
//! governs both directions (spec: "Implementations must honor the hint
//! both ways").

use crate::cursor::{read_object_reference, write_object_reference, ByteReader, ByteWriter};
use crate::error::{BinaryError, Result};
use crate::property::list::{read_property_list, write_property_list};
use save_codec_core::{CodecError, Precision, StructPayload};

fn read_scalar(reader: &mut ByteReader, precision: Precision) -> Result<f64> {
    match precision {
        Precision::Single => Ok(reader.read_f32()? as f64),
        Precision::Double => reader.read_f64(),
    }
}

fn write_scalar(writer: &mut ByteWriter, precision: Precision, value: f64) {
    match precision {
        Precision::Single => writer.write_f32(value as f32),
        Precision::Double => writer.write_f64(value),
    }
}

pub fn decode_vector(reader: &mut ByteReader, precision: Precision) -> Result<StructPayload> {
    let x = read_scalar(reader, precision)?;
    let y = read_scalar(reader, precision)?;
    let z = read_scalar(reader, precision)?;
    Ok(StructPayload::Vector { x, y, z })
}

pub fn encode_vector(payload: &StructPayload, writer: &mut ByteWriter, precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Vector { x, y, z } => {
            write_scalar(writer, precision, *x);
            write_scalar(writer, precision, *y);
            write_scalar(writer, precision, *z);
            Ok(())
        }
        _ => Err(mismatch("Vector")),
    }
}

pub fn decode_vector2d(reader: &mut ByteReader, precision: Precision) -> Result<StructPayload> {
    let x = read_scalar(reader, precision)?;
    let y = read_scalar(reader, precision)?;
    Ok(StructPayload::Vector2D { x, y })
}

pub fn encode_vector2d(payload: &StructPayload, writer: &mut ByteWriter, precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Vector2D { x, y } => {
            write_scalar(writer, precision, *x);
            write_scalar(writer, precision, *y);
            Ok(())
        }
        _ => Err(mismatch("Vector2D")),
    }
}

pub fn decode_vector4(reader: &mut ByteReader, precision: Precision) -> Result<StructPayload> {
    let x = read_scalar(reader, precision)?;
    let y = read_scalar(reader, precision)?;
    let z = read_scalar(reader, precision)?;
    let w = read_scalar(reader, precision)?;
    Ok(StructPayload::Vector4 { x, y, z, w })
}

pub fn encode_vector4(payload: &StructPayload, writer: &mut ByteWriter, precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Vector4 { x, y, z, w } => {
            write_scalar(writer, precision, *x);
            write_scalar(writer, precision, *y);
            write_scalar(writer, precision, *z);
            write_scalar(writer, precision, *w);
            Ok(())
        }
        _ => Err(mismatch("Vector4")),
    }
}

pub fn decode_quat(reader: &mut ByteReader, precision: Precision) -> Result<StructPayload> {
    let x = read_scalar(reader, precision)?;
    let y = read_scalar(reader, precision)?;
    let z = read_scalar(reader, precision)?;
    let w = read_scalar(reader, precision)?;
    Ok(StructPayload::Quat { x, y, z, w })
}

pub fn encode_quat(payload: &StructPayload, writer: &mut ByteWriter, precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Quat { x, y, z, w } => {
            write_scalar(writer, precision, *x);
            write_scalar(writer, precision, *y);
            write_scalar(writer, precision, *z);
            write_scalar(writer, precision, *w);
            Ok(())
        }
        _ => Err(mismatch("Quat")),
    }
}

pub fn decode_rotator(reader: &mut ByteReader, precision: Precision) -> Result<StructPayload> {
    let pitch = read_scalar(reader, precision)?;
    let yaw = read_scalar(reader, precision)?;
    let roll = read_scalar(reader, precision)?;
    Ok(StructPayload::Rotator { pitch, yaw, roll })
}

pub fn encode_rotator(payload: &StructPayload, writer: &mut ByteWriter, precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Rotator { pitch, yaw, roll } => {
            write_scalar(writer, precision, *pitch);
            write_scalar(writer, precision, *yaw);
            write_scalar(writer, precision, *roll);
            Ok(())
        }
        _ => Err(mismatch("Rotator")),
    }
}

pub fn decode_color(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let b = reader.read_u8()?;
    let g = reader.read_u8()?;
    let r = reader.read_u8()?;
    let a = reader.read_u8()?;
    Ok(StructPayload::Color { b, g, r, a })
}

pub fn encode_color(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Color { b, g, r, a } => {
            writer.write_u8(*b);
            writer.write_u8(*g);
            writer.write_u8(*r);
            writer.write_u8(*a);
            Ok(())
        }
        _ => Err(mismatch("Color")),
    }
}

pub fn decode_linear_color(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let r = reader.read_f32()?;
    let g = reader.read_f32()?;
    let b = reader.read_f32()?;
    let a = reader.read_f32()?;
    Ok(StructPayload::LinearColor { r, g, b, a })
}

pub fn encode_linear_color(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::LinearColor { r, g, b, a } => {
            writer.write_f32(*r);
            writer.write_f32(*g);
            writer.write_f32(*b);
            writer.write_f32(*a);
            Ok(())
        }
        _ => Err(mismatch("LinearColor")),
    }
}

fn read_vec3(reader: &mut ByteReader) -> Result<[f64; 3]> {
    Ok([reader.read_f64()?, reader.read_f64()?, reader.read_f64()?])
}

fn write_vec3(writer: &mut ByteWriter, v: &[f64; 3]) {
    writer.write_f64(v[0]);
    writer.write_f64(v[1]);
    writer.write_f64(v[2]);
}

fn read_quat4(reader: &mut ByteReader) -> Result<[f64; 4]> {
    Ok([
        reader.read_f64()?,
        reader.read_f64()?,
        reader.read_f64()?,
        reader.read_f64()?,
    ])
}

fn write_quat4(writer: &mut ByteWriter, v: &[f64; 4]) {
    for c in v {
        writer.write_f64(*c);
    }
}

pub fn decode_transform(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let translation = if reader.read_bool()? {
        Some(read_vec3(reader)?)
    } else {
        None
    };
    let rotation = if reader.read_bool()? {
        Some(read_quat4(reader)?)
    } else {
        None
    };
    let scale3d = if reader.read_bool()? {
        Some(read_vec3(reader)?)
    } else {
        None
    };
    Ok(StructPayload::Transform {
        rotation,
        translation,
        scale3d,
    })
}

pub fn encode_transform(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Transform {
            rotation,
            translation,
            scale3d,
        } => {
            writer.write_bool(translation.is_some());
            if let Some(t) = translation {
                write_vec3(writer, t);
            }
            writer.write_bool(rotation.is_some());
            if let Some(r) = rotation {
                write_quat4(writer, r);
            }
            writer.write_bool(scale3d.is_some());
            if let Some(s) = scale3d {
                write_vec3(writer, s);
            }
            Ok(())
        }
        _ => Err(mismatch("Transform")),
    }
}

pub fn decode_box(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let min = read_vec3(reader)?;
    let max = read_vec3(reader)?;
    let is_valid = reader.read_u8()?;
    Ok(StructPayload::Box { min, max, is_valid })
}

pub fn encode_box(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Box { min, max, is_valid } => {
            write_vec3(writer, min);
            write_vec3(writer, max);
            writer.write_u8(*is_valid);
            Ok(())
        }
        _ => Err(mismatch("Box")),
    }
}

pub fn decode_int_point(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let x = reader.read_i32()?;
    let y = reader.read_i32()?;
    Ok(StructPayload::IntPoint { x, y })
}

pub fn encode_int_point(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::IntPoint { x, y } => {
            writer.write_i32(*x);
            writer.write_i32(*y);
            Ok(())
        }
        _ => Err(mismatch("IntPoint")),
    }
}

pub fn decode_int_vector(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let x = reader.read_i32()?;
    let y = reader.read_i32()?;
    let z = reader.read_i32()?;
    Ok(StructPayload::IntVector { x, y, z })
}

pub fn encode_int_vector(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::IntVector { x, y, z } => {
            writer.write_i32(*x);
            writer.write_i32(*y);
            writer.write_i32(*z);
            Ok(())
        }
        _ => Err(mismatch("IntVector")),
    }
}

pub fn decode_date_time(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    Ok(StructPayload::DateTime {
        ticks: reader.read_i64()?,
    })
}

pub fn encode_date_time(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::DateTime { ticks } => {
            writer.write_i64(*ticks);
            Ok(())
        }
        _ => Err(mismatch("DateTime")),
    }
}

pub fn decode_guid(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    Ok(StructPayload::Guid(reader.read_guid()?))
}

pub fn encode_guid(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::Guid(g) => {
            writer.write_guid(g);
            Ok(())
        }
        _ => Err(mismatch("Guid")),
    }
}

pub fn decode_fluid_box(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    Ok(StructPayload::FluidBox {
        value: reader.read_f32()?,
    })
}

pub fn encode_fluid_box(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::FluidBox { value } => {
            writer.write_f32(*value);
            Ok(())
        }
        _ => Err(mismatch("FluidBox")),
    }
}

pub fn decode_fic_frame_range(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let begin_frame = reader.read_i64()?;
    let end_frame = reader.read_i64()?;
    Ok(StructPayload::FicFrameRange {
        begin_frame,
        end_frame,
    })
}

pub fn encode_fic_frame_range(
    payload: &StructPayload,
    writer: &mut ByteWriter,
    _precision: Precision,
) -> Result<()> {
    match payload {
        StructPayload::FicFrameRange {
            begin_frame,
            end_frame,
        } => {
            writer.write_i64(*begin_frame);
            writer.write_i64(*end_frame);
            Ok(())
        }
        _ => Err(mismatch("FICFrameRange")),
    }
}

pub fn decode_railroad_track_position(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let track = read_object_reference(reader)?;
    let offset = reader.read_f32()?;
    let forward = reader.read_f32()?;
    Ok(StructPayload::RailroadTrackPosition { track, offset, forward })
}

pub fn encode_railroad_track_position(
    payload: &StructPayload,
    writer: &mut ByteWriter,
    _precision: Precision,
) -> Result<()> {
    match payload {
        StructPayload::RailroadTrackPosition { track, offset, forward } => {
            write_object_reference(writer, track);
            writer.write_f32(*offset);
            writer.write_f32(*forward);
            Ok(())
        }
        _ => Err(mismatch("RailroadTrackPosition")),
    }
}

pub fn decode_inventory_item(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let item_name = reader.read_string()?;
    let state = if reader.read_bool()? {
        Some(read_object_reference(reader)?)
    } else {
        None
    };
    Ok(StructPayload::InventoryItem { item_name, state })
}

pub fn encode_inventory_item(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::InventoryItem { item_name, state } => {
            writer.write_string(item_name);
            writer.write_bool(state.is_some());
            if let Some(reference) = state {
                write_object_reference(writer, reference);
            }
            Ok(())
        }
        _ => Err(mismatch("InventoryItem")),
    }
}

pub fn decode_client_identity_info(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let len = reader.read_u32()? as usize;
    Ok(StructPayload::ClientIdentityInfo(reader.read_bytes(len)?.to_vec()))
}

pub fn encode_client_identity_info(
    payload: &StructPayload,
    writer: &mut ByteWriter,
    _precision: Precision,
) -> Result<()> {
    match payload {
        StructPayload::ClientIdentityInfo(bytes) => {
            writer.write_u32(bytes.len() as u32);
            writer.write_bytes(bytes);
            Ok(())
        }
        _ => Err(mismatch("ClientIdentityInfo")),
    }
}

pub fn decode_scannable_resource_pair(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let resource = read_object_reference(reader)?;
    let amount = reader.read_i32()?;
    Ok(StructPayload::ScannableResourcePair { resource, amount })
}

pub fn encode_scannable_resource_pair(
    payload: &StructPayload,
    writer: &mut ByteWriter,
    _precision: Precision,
) -> Result<()> {
    match payload {
        StructPayload::ScannableResourcePair { resource, amount } => {
            write_object_reference(writer, resource);
            writer.write_i32(*amount);
            Ok(())
        }
        _ => Err(mismatch("ScannableResourcePair")),
    }
}

pub fn decode_spawn_data(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let class_path = reader.read_string()?;
    let properties = read_property_list(reader)?;
    Ok(StructPayload::SpawnData { class_path, properties })
}

pub fn encode_spawn_data(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::SpawnData { class_path, properties } => {
            writer.write_string(class_path);
            write_property_list(writer, properties)
        }
        _ => Err(mismatch("SpawnData")),
    }
}

pub fn decode_phase_cost(reader: &mut ByteReader, _precision: Precision) -> Result<StructPayload> {
    let count = reader.read_u32()?;
    let mut item_costs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let item_class = reader.read_string()?;
        let amount = reader.read_i32()?;
        item_costs.push((item_class, amount));
    }
    Ok(StructPayload::PhaseCost { item_costs })
}

pub fn encode_phase_cost(payload: &StructPayload, writer: &mut ByteWriter, _precision: Precision) -> Result<()> {
    match payload {
        StructPayload::PhaseCost { item_costs } => {
            writer.write_u32(item_costs.len() as u32);
            for (item_class, amount) in item_costs {
                writer.write_string(item_class);
                writer.write_i32(*amount);
            }
            Ok(())
        }
        _ => Err(mismatch("PhaseCost")),
    }
}

fn mismatch(expected: &str) -> BinaryError {
    BinaryError::Codec(CodecError::invalid_data(
        0,
        format!("struct encoder for {expected} received a mismatched payload variant"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_negative_zero_round_trip() {
        let payload = StructPayload::Vector {
            x: 1.0,
            y: -0.0,
            z: 2.5,
        };
        let mut writer = ByteWriter::new();
        encode_vector(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[8..16], &(-0.0_f64).to_le_bytes());

        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_vector(&mut reader, Precision::Double).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_color_bgra_order() {
        let mut writer = ByteWriter::new();
        let payload = StructPayload::Color {
            b: 1,
            g: 2,
            r: 3,
            a: 4,
        };
        encode_color(&payload, &mut writer, Precision::Double).unwrap();
        assert_eq!(writer.into_bytes(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_railroad_track_position_round_trip() {
        let payload = StructPayload::RailroadTrackPosition {
            track: save_codec_core::ObjectReference {
                level_name: "Persistent_Level".to_string(),
                path_name: "Railroad_0".to_string(),
            },
            offset: 123.5,
            forward: -1.0,
        };
        let mut writer = ByteWriter::new();
        encode_railroad_track_position(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_railroad_track_position(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_inventory_item_without_state_round_trip() {
        let payload = StructPayload::InventoryItem {
            item_name: "Desc_IronPlate_C".to_string(),
            state: None,
        };
        let mut writer = ByteWriter::new();
        encode_inventory_item(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_inventory_item(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_inventory_item_with_state_round_trip() {
        let payload = StructPayload::InventoryItem {
            item_name: "Desc_ColorGun_C".to_string(),
            state: Some(save_codec_core::ObjectReference {
                level_name: "Persistent_Level".to_string(),
                path_name: "ColorGunState_0".to_string(),
            }),
        };
        let mut writer = ByteWriter::new();
        encode_inventory_item(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_inventory_item(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_client_identity_info_round_trip() {
        let payload = StructPayload::ClientIdentityInfo(vec![1, 2, 3, 4, 5]);
        let mut writer = ByteWriter::new();
        encode_client_identity_info(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_client_identity_info(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_scannable_resource_pair_round_trip() {
        let payload = StructPayload::ScannableResourcePair {
            resource: save_codec_core::ObjectReference {
                level_name: "Persistent_Level".to_string(),
                path_name: "Desc_OreIron_C".to_string(),
            },
            amount: 42,
        };
        let mut writer = ByteWriter::new();
        encode_scannable_resource_pair(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_scannable_resource_pair(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_spawn_data_round_trip() {
        let mut properties = save_codec_core::PropertyList::new();
        properties.push(save_codec_core::Property::new(
            "mCount",
            save_codec_core::PropertyValue::Int32(3),
        ));
        let payload = StructPayload::SpawnData {
            class_path: "/Script/Game.BP_TreeSpawnData_C".to_string(),
            properties,
        };
        let mut writer = ByteWriter::new();
        encode_spawn_data(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_spawn_data(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_phase_cost_round_trip() {
        let payload = StructPayload::PhaseCost {
            item_costs: vec![("Desc_IronPlate_C".to_string(), 50), ("Desc_Wire_C".to_string(), 100)],
        };
        let mut writer = ByteWriter::new();
        encode_phase_cost(&payload, &mut writer, Precision::Double).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(decode_phase_cost(&mut reader, Precision::Double).unwrap(), payload);
    }

    #[test]
    fn test_single_precision_round_trip() {
        let payload = StructPayload::Vector {
            x: 1.5,
            y: -2.25,
            z: 0.0,
        };
        let mut writer = ByteWriter::new();
        encode_vector(&payload, &mut writer, Precision::Single).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 12);
        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_vector(&mut reader, Precision::Single).unwrap();
        assert_eq!(decoded, payload);
    }
}
