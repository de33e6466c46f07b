//! Blueprint codec: a pair of files decoded independently — a chunked
//! main file holding one object header+body pair (no grids, no levels,
//! no hash), and an uncompressed config file holding a small metadata
//! blob.

use crate::chunk::{self, ChunkSummary, CompressionInfo};
use crate::cursor::{ByteReader, ByteWriter};
use crate::error::Result;
use crate::object::{ObjectCodec, SceneObject};
use crate::version;
use save_codec_core::CodecError;

/// Header shared by the main and config files: just enough version
/// information to gate decode, mirroring [`crate::save::SaveHeader`] but
/// far smaller since a blueprint has no session/map metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintHeader {
    pub header_version: i32,
    pub save_version: i32,
    pub build_version: i32,
}

impl BlueprintHeader {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(Self {
            header_version: reader.read_i32()?,
            save_version: reader.read_i32()?,
            build_version: reader.read_i32()?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.header_version);
        writer.write_i32(self.save_version);
        writer.write_i32(self.build_version);
    }
}

/// A decoded blueprint pair: the object graph from the main file, and the
/// opaque config blob from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub header: BlueprintHeader,
    pub compression_info: CompressionInfo,
    pub objects: Vec<SceneObject>,
    pub config: Vec<u8>,
}

pub struct BlueprintCodec;

impl BlueprintCodec {
    /// Decode the main file and the config file independently, invoking
    /// `on_decompressed_body` once with the main file's inflated body.
    pub fn decode(
        main_bytes: &[u8],
        config_bytes: &[u8],
        mut on_decompressed_body: impl FnMut(&[u8]),
    ) -> Result<Blueprint> {
        let mut reader = ByteReader::new(main_bytes);
        let header_len = reader.read_u32()? as usize;
        let header_bytes = reader.read_bytes(header_len)?;
        let mut header_reader = ByteReader::new(header_bytes);
        let header = BlueprintHeader::decode(&mut header_reader)?;
        version::reject_if_unsupported(header.save_version, header.header_version)?;

        let remaining = reader.remaining();
        let chunked = reader.read_bytes(remaining)?;
        let (compression_info, body) = chunk::decode(chunked)?;
        on_decompressed_body(&body);

        let mut body_reader = ByteReader::new(&body);
        let objects = ObjectCodec::decode(&mut body_reader)?;

        Ok(Blueprint {
            header,
            compression_info,
            objects,
            config: config_bytes.to_vec(),
        })
    }

    /// Encode the main file and return it alongside the config bytes,
    /// unchanged, ready for the caller to write out as the second file.
    pub fn encode(
        blueprint: &Blueprint,
        mut on_header: impl FnMut(&[u8]),
        mut on_before_compressing: impl FnMut(&[u8]),
        mut on_chunk: impl FnMut(&ChunkSummary, &[u8]),
    ) -> Result<(Vec<u8>, Vec<ChunkSummary>, Vec<u8>)> {
        version::reject_if_unsupported(blueprint.header.save_version, blueprint.header.header_version)?;
        if blueprint.objects.is_empty() {
            return Err(crate::error::BinaryError::Codec(CodecError::invalid_data(
                0,
                "a blueprint must contain at least one object",
            )));
        }

        let mut header_writer = ByteWriter::new();
        blueprint.header.encode(&mut header_writer);
        let header_bytes = header_writer.into_bytes();
        on_header(&header_bytes);

        let mut body_writer = ByteWriter::new();
        ObjectCodec::encode(&mut body_writer, &blueprint.objects)?;
        let body = body_writer.into_bytes();

        let (chunked, summaries) = chunk::encode(
            &body,
            blueprint.compression_info,
            &mut on_before_compressing,
            &mut on_chunk,
        )?;

        let mut out = ByteWriter::new();
        out.write_u32(header_bytes.len() as u32);
        out.write_bytes(&header_bytes);
        out.write_bytes(&chunked);
        Ok((out.into_bytes(), summaries, blueprint.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save_codec_core::{Property, PropertyList, PropertyValue};

    fn sample_object() -> SceneObject {
        use crate::object::ComponentHeader;
        let mut properties = PropertyList::new();
        properties.push(Property::new("mAmount", PropertyValue::Int32(5)));
        SceneObject::Component {
            header: ComponentHeader {
                type_path: "/Script/Game.BP_Belt_C".to_string(),
                root_object_path: "Persistent_Level".to_string(),
                instance_name: "BP_Belt_0".to_string(),
                outer_object_path: "BP_Belt_0".to_string(),
            },
            offset_index: 0,
            properties,
            trailing_blob: Vec::new(),
        }
    }

    #[test]
    fn test_blueprint_pair_round_trip() {
        let blueprint = Blueprint {
            header: BlueprintHeader {
                header_version: 13,
                save_version: 42,
                build_version: 123456,
            },
            compression_info: CompressionInfo::default(),
            objects: vec![sample_object()],
            config: vec![1, 2, 3, 4],
        };

        let (main_bytes, summaries, config_bytes) =
            BlueprintCodec::encode(&blueprint, |_| {}, |_| {}, |_, _| {}).unwrap();
        assert!(!summaries.is_empty());
        let decoded = BlueprintCodec::decode(&main_bytes, &config_bytes, |_| {}).unwrap();
        assert_eq!(decoded, blueprint);
    }

    #[test]
    fn test_rejects_old_blueprint_version() {
        let blueprint = Blueprint {
            header: BlueprintHeader {
                header_version: 13,
                save_version: 5,
                build_version: 1,
            },
            compression_info: CompressionInfo::default(),
            objects: vec![sample_object()],
            config: Vec::new(),
        };
        let err = BlueprintCodec::encode(&blueprint, |_| {}, |_| {}, |_, _| {}).unwrap_err();
        assert!(err.to_string().contains("0.0.34"));
    }
}
