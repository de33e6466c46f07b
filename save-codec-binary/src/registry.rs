//! Static registry mapping a struct type-tag string to its decode/encode
//! pair. Unknown struct-type names simply aren't in the map; callers fall
//! back to the generic nested-property-list codec.

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::Result;
use crate::property::structs;
use save_codec_core::{Precision, StructPayload};
use std::collections::HashMap;

pub type StructDecodeFn = fn(&mut ByteReader, Precision) -> Result<StructPayload>;
pub type StructEncodeFn = fn(&StructPayload, &mut ByteWriter, Precision) -> Result<()>;

pub struct StructHandlers {
    pub decode: StructDecodeFn,
    pub encode: StructEncodeFn,
}

lazy_static::lazy_static! {
    /// Well-known struct-type names this codec decodes/encodes directly.
    pub static ref STRUCT_REGISTRY: HashMap<&'static str, StructHandlers> = {
        let mut m: HashMap<&'static str, StructHandlers> = HashMap::new();
        m.insert("Vector", StructHandlers { decode: structs::decode_vector, encode: structs::encode_vector });
        m.insert("Vector2D", StructHandlers { decode: structs::decode_vector2d, encode: structs::encode_vector2d });
        m.insert("Vector4", StructHandlers { decode: structs::decode_vector4, encode: structs::encode_vector4 });
        m.insert("Quat", StructHandlers { decode: structs::decode_quat, encode: structs::encode_quat });
        m.insert("Rotator", StructHandlers { decode: structs::decode_rotator, encode: structs::encode_rotator });
        m.insert("Color", StructHandlers { decode: structs::decode_color, encode: structs::encode_color });
        m.insert("LinearColor", StructHandlers { decode: structs::decode_linear_color, encode: structs::encode_linear_color });
        m.insert("Transform", StructHandlers { decode: structs::decode_transform, encode: structs::encode_transform });
        m.insert("Box", StructHandlers { decode: structs::decode_box, encode: structs::encode_box });
        m.insert("IntPoint", StructHandlers { decode: structs::decode_int_point, encode: structs::encode_int_point });
        m.insert("IntVector", StructHandlers { decode: structs::decode_int_vector, encode: structs::encode_int_vector });
        m.insert("DateTime", StructHandlers { decode: structs::decode_date_time, encode: structs::encode_date_time });
        m.insert("Guid", StructHandlers { decode: structs::decode_guid, encode: structs::encode_guid });
        m.insert("FluidBox", StructHandlers { decode: structs::decode_fluid_box, encode: structs::encode_fluid_box });
        m.insert("FICFrameRange", StructHandlers { decode: structs::decode_fic_frame_range, encode: structs::encode_fic_frame_range });
        m.insert(
            "RailroadTrackPosition",
            StructHandlers { decode: structs::decode_railroad_track_position, encode: structs::encode_railroad_track_position },
        );
        m.insert("InventoryItem", StructHandlers { decode: structs::decode_inventory_item, encode: structs::encode_inventory_item });
        m.insert(
            "ClientIdentityInfo",
            StructHandlers { decode: structs::decode_client_identity_info, encode: structs::encode_client_identity_info },
        );
        m.insert(
            "ScannableResourcePair",
            StructHandlers { decode: structs::decode_scannable_resource_pair, encode: structs::encode_scannable_resource_pair },
        );
        m.insert("SpawnData", StructHandlers { decode: structs::decode_spawn_data, encode: structs::encode_spawn_data });
        m.insert("PhaseCost", StructHandlers { decode: structs::decode_phase_cost, encode: structs::encode_phase_cost });
        m
    };
}

pub fn lookup(struct_type: &str) -> Option<&'static StructHandlers> {
    STRUCT_REGISTRY.get(struct_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_struct_types_registered() {
        assert!(lookup("Vector").is_some());
        assert!(lookup("Color").is_some());
        assert!(lookup("SpawnData").is_some());
        assert!(lookup("RailroadTrackPosition").is_some());
        assert!(lookup("MyGameSpecificBlob").is_none());
    }
}
