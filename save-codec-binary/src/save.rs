//! Save file codec: header, chunked body, partition grids, and the level
//! list.
//!
//! Layout of the whole file, outermost to innermost: a 4-byte header
//! length, the bare (never compressed) header bytes, then the chunked
//! body. The inflated body holds, in order: a 32-byte hash, the partition
//! grids, and the level list.

use crate::chunk::{self, ChunkSummary, CompressionInfo};
use crate::cursor::{read_object_reference, write_object_reference, ByteReader, ByteWriter};
use crate::error::{BinaryError, Result};
use crate::grids::{self, PartitionGrids};
use crate::object::{ObjectCodec, SceneObject};
use crate::version;
use save_codec_core::{CodecError, ObjectReference};
use sha2::{Digest, Sha256};

/// Hash the grids-and-level-list bytes that follow the body hash field, the
/// same way on decode (to verify) and encode (to recompute).
fn compute_body_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Save/build version integers, map identity, and session/mod metadata
/// captured from the header. Immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveHeader {
    pub save_header_version: i32,
    pub save_version: i32,
    pub build_version: i32,
    pub map_name: String,
    pub map_options: String,
    pub session_name: String,
    pub play_duration_seconds: i32,
    pub save_date_ticks: i64,
    pub session_visibility: u8,
    pub editor_object_version: i32,
    pub mod_metadata: String,
    pub is_modded_save: bool,
}

impl SaveHeader {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(Self {
            save_header_version: reader.read_i32()?,
            save_version: reader.read_i32()?,
            build_version: reader.read_i32()?,
            map_name: reader.read_string()?,
            map_options: reader.read_string()?,
            session_name: reader.read_string()?,
            play_duration_seconds: reader.read_i32()?,
            save_date_ticks: reader.read_i64()?,
            session_visibility: reader.read_u8()?,
            editor_object_version: reader.read_i32()?,
            mod_metadata: reader.read_string()?,
            is_modded_save: reader.read_bool32()?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.save_header_version);
        writer.write_i32(self.save_version);
        writer.write_i32(self.build_version);
        writer.write_string(&self.map_name);
        writer.write_string(&self.map_options);
        writer.write_string(&self.session_name);
        writer.write_i32(self.play_duration_seconds);
        writer.write_i64(self.save_date_ticks);
        writer.write_u8(self.session_visibility);
        writer.write_i32(self.editor_object_version);
        writer.write_string(&self.mod_metadata);
        writer.write_bool32(self.is_modded_save);
    }

    /// Non-fatal warnings about this header: version-support notices that
    /// don't rise to the hard [`CodecError::UnsupportedVersion`] rejection.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if version::reject_if_unsupported(self.save_version, self.save_header_version).is_err() {
            warnings.push(format!(
                "save_version {} is below the supported range",
                self.save_version
            ));
        }
        if self.is_modded_save && self.mod_metadata.is_empty() {
            warnings.push("is_modded_save is set but mod_metadata is empty".to_string());
        }
        warnings
    }

    /// A short human-readable summary, for CLI reporting.
    pub fn describe(&self) -> String {
        format!(
            "{} (save v{}, build {}), session \"{}\", played {}s",
            self.map_name, self.save_version, self.build_version, self.session_name, self.play_duration_seconds
        )
    }
}

/// One level's scene objects, collectable references, and trailing blob.
/// Levels other than the persistent one carry no name of their own on the
/// wire; callers identify a level by its index via [`Save::level_name`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    pub objects: Vec<SceneObject>,
    pub collectables: Vec<ObjectReference>,
    pub trailing_blob: Vec<u8>,
}

fn read_level(reader: &mut ByteReader) -> Result<Level> {
    let objects = ObjectCodec::decode(reader)?;
    let collectable_count = reader.read_u32()?;
    let mut collectables = Vec::with_capacity(collectable_count as usize);
    for _ in 0..collectable_count {
        collectables.push(read_object_reference(reader)?);
    }
    let trailing_len = reader.read_u32()? as usize;
    let trailing_blob = reader.read_bytes(trailing_len)?.to_vec();
    Ok(Level {
        objects,
        collectables,
        trailing_blob,
    })
}

fn write_level(writer: &mut ByteWriter, level: &Level) -> Result<()> {
    ObjectCodec::encode(writer, &level.objects)?;
    writer.write_u32(level.collectables.len() as u32);
    for reference in &level.collectables {
        write_object_reference(writer, reference);
    }
    writer.write_u32(level.trailing_blob.len() as u32);
    writer.write_bytes(&level.trailing_blob);
    Ok(())
}

/// A fully decoded save: header, grids, and every level (the last of
/// which is the persistent level named by the header).
#[derive(Debug, Clone, PartialEq)]
pub struct Save {
    pub header: SaveHeader,
    pub compression_info: CompressionInfo,
    pub body_hash: [u8; 32],
    pub grids: PartitionGrids,
    pub levels: Vec<Level>,
}

impl Save {
    /// The name of the level at `index`: the header's map name for the
    /// last (persistent) level, a synthetic name for any sub-level.
    pub fn level_name(&self, index: usize) -> String {
        if index + 1 == self.levels.len() {
            self.header.map_name.clone()
        } else {
            format!("Level_{index}")
        }
    }
}

pub struct SaveCodec;

impl SaveCodec {
    /// Decode a save, invoking `on_decompressed_body` once with the
    /// inflated body bytes right after chunk decode and before the grids
    /// and level list are parsed out of it.
    pub fn decode(bytes: &[u8], mut on_decompressed_body: impl FnMut(&[u8])) -> Result<Save> {
        let mut reader = ByteReader::new(bytes);
        let header_len = reader.read_u32()? as usize;
        let header_bytes = reader.read_bytes(header_len)?;
        let mut header_reader = ByteReader::new(header_bytes);
        let header = SaveHeader::decode(&mut header_reader)?;
        version::reject_if_unsupported(header.save_version, header.save_header_version)?;

        let remaining = reader.remaining();
        let chunked = reader.read_bytes(remaining)?;
        let (compression_info, body) = chunk::decode(chunked)?;
        on_decompressed_body(&body);

        let mut body_reader = ByteReader::new(&body);
        let body_hash: [u8; 32] = body_reader.read_fixed::<32>()?;
        let computed_hash = compute_body_hash(&body[32..]);
        if body_hash != computed_hash {
            return Err(BinaryError::Codec(CodecError::checksum_mismatch(
                body_hash.to_vec(),
                computed_hash.to_vec(),
            )));
        }
        let grids = grids::read_grids(&mut body_reader)?;

        let level_count = body_reader.read_u32()?;
        let mut levels = Vec::with_capacity(level_count as usize + 1);
        for _ in 0..=level_count {
            levels.push(read_level(&mut body_reader)?);
        }

        Ok(Save {
            header,
            compression_info,
            body_hash,
            grids,
            levels,
        })
    }

    pub fn encode(
        save: &Save,
        mut on_header: impl FnMut(&[u8]),
        mut on_before_compressing: impl FnMut(&[u8]),
        mut on_chunk: impl FnMut(&ChunkSummary, &[u8]),
    ) -> Result<(Vec<u8>, Vec<ChunkSummary>)> {
        version::reject_if_unsupported(save.header.save_version, save.header.save_header_version)?;
        if save.levels.is_empty() {
            return Err(BinaryError::Codec(CodecError::invalid_data(
                0,
                "a save must contain at least the persistent level",
            )));
        }

        let mut header_writer = ByteWriter::new();
        save.header.encode(&mut header_writer);
        let header_bytes = header_writer.into_bytes();
        on_header(&header_bytes);

        let mut content_writer = ByteWriter::new();
        grids::write_grids(&mut content_writer, &save.grids);
        content_writer.write_u32(save.levels.len() as u32 - 1);
        for level in &save.levels {
            write_level(&mut content_writer, level)?;
        }
        let content = content_writer.into_bytes();

        let mut body_writer = ByteWriter::new();
        body_writer.write_bytes(&compute_body_hash(&content));
        body_writer.write_bytes(&content);
        let body = body_writer.into_bytes();

        let (chunked, summaries) = chunk::encode(&body, save.compression_info, &mut on_before_compressing, &mut on_chunk)?;

        let mut out = ByteWriter::new();
        out.write_u32(header_bytes.len() as u32);
        out.write_bytes(&header_bytes);
        out.write_bytes(&chunked);
        Ok((out.into_bytes(), summaries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> SaveHeader {
        SaveHeader {
            save_header_version: 13,
            save_version: 42,
            build_version: 123456,
            map_name: "Persistent_Level".to_string(),
            map_options: "".to_string(),
            session_name: "My Factory".to_string(),
            play_duration_seconds: 3600,
            save_date_ticks: 638_000_000_000_000_000,
            session_visibility: 1,
            editor_object_version: 0,
            mod_metadata: "".to_string(),
            is_modded_save: false,
        }
    }

    #[test]
    fn test_minimal_save_round_trip() {
        // body_hash is recomputed by encode regardless of what's passed in here.
        let save = Save {
            header: sample_header(),
            compression_info: CompressionInfo::default(),
            body_hash: [7u8; 32],
            grids: PartitionGrids(vec![1, 2, 3]),
            levels: vec![Level::default()],
        };

        let (bytes, summaries) = SaveCodec::encode(&save, |_| {}, |_| {}, |_, _| {}).unwrap();
        assert!(!summaries.is_empty());
        let decoded = SaveCodec::decode(&bytes, |_| {}).unwrap();
        assert_eq!(decoded.header, save.header);
        assert_eq!(decoded.grids, save.grids);
        assert_eq!(decoded.levels, save.levels);
    }

    #[test]
    fn test_tampered_body_hash_is_rejected() {
        let mut header_writer = ByteWriter::new();
        sample_header().encode(&mut header_writer);
        let header_bytes = header_writer.into_bytes();

        let mut content_writer = ByteWriter::new();
        grids::write_grids(&mut content_writer, &PartitionGrids(vec![1, 2, 3]));
        content_writer.write_u32(0);
        write_level(&mut content_writer, &Level::default()).unwrap();
        let content = content_writer.into_bytes();

        let mut body_writer = ByteWriter::new();
        body_writer.write_bytes(&[0xAAu8; 32]); // deliberately wrong hash
        body_writer.write_bytes(&content);
        let body = body_writer.into_bytes();

        let mut noop_body = |_: &[u8]| {};
        let mut noop_chunk = |_: &ChunkSummary, _: &[u8]| {};
        let (chunked, _) = chunk::encode(&body, CompressionInfo::default(), &mut noop_body, &mut noop_chunk).unwrap();

        let mut out = ByteWriter::new();
        out.write_u32(header_bytes.len() as u32);
        out.write_bytes(&header_bytes);
        out.write_bytes(&chunked);

        let err = SaveCodec::decode(&out.into_bytes(), |_| {}).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_rejects_old_save_version() {
        let mut save = Save {
            header: sample_header(),
            compression_info: CompressionInfo::default(),
            body_hash: [0u8; 32],
            grids: PartitionGrids::default(),
            levels: vec![Level::default()],
        };
        save.header.save_version = 5;
        let err = SaveCodec::encode(&save, |_| {}, |_| {}, |_, _| {}).unwrap_err();
        assert!(err.to_string().contains("0.0.34"));
    }

    #[test]
    fn test_level_name_persistent_is_last() {
        let save = Save {
            header: sample_header(),
            compression_info: CompressionInfo::default(),
            body_hash: [0u8; 32],
            grids: PartitionGrids::default(),
            levels: vec![Level::default(), Level::default()],
        };
        assert_eq!(save.level_name(0), "Level_0");
        assert_eq!(save.level_name(1), "Persistent_Level");
    }
}
