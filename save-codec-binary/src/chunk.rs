//! Chunk framing: the compressed container around a save/blueprint body.
//!
//! Each chunk carries a fixed-layout header (package file tag, version,
//! max chunk size, compression algorithm, two parallel compressed/
//! uncompressed size pairs, and a flag byte) followed by that many
//! compressed bytes. Decode inflates a run of chunks into one contiguous
//! body; encode does the reverse, slicing the body into bounded pieces.

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{BinaryError, Result};
use save_codec_core::CodecError;
use std::io::{Read, Write};

/// The 8-byte sentinel that begins every chunk header.
pub const PACKAGE_FILE_TAG: [u8; 8] = [0x9E, 0x2A, 0x83, 0xC1, 0x00, 0x00, 0x00, 0x00];

/// Current package file version written by this codec.
pub const PACKAGE_FILE_VERSION: i32 = 2;

/// Default max uncompressed size of one emitted chunk (128 KiB).
pub const DEFAULT_MAX_CHUNK_SIZE: u32 = 128 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    None = 0,
    Zlib = 1,
}

impl CompressionAlgorithm {
    fn from_u8(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::None),
            1 => Ok(Self::Zlib),
            other => Err(BinaryError::Codec(CodecError::invalid_data(
                0,
                format!("unknown compression algorithm discriminator {other}"),
            ))),
        }
    }
}

/// Compression parameters captured from the first chunk and verified
/// consistent across every later chunk in the same body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionInfo {
    pub algorithm: CompressionAlgorithm,
    pub max_chunk_size: u32,
    pub flags: u8,
}

impl Default for CompressionInfo {
    fn default() -> Self {
        Self {
            algorithm: CompressionAlgorithm::Zlib,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            flags: 0,
        }
    }
}

/// Per-chunk summary returned by [`encode`], for consumers that stream the
/// output to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSummary {
    pub uncompressed_size: u32,
    pub compressed_size: u32,
    pub offset: u64,
}

/// Aggregate compression figures across a whole run of chunks, for CLI
/// reporting. Never consulted by decode/encode themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    pub chunk_count: usize,
    pub total_uncompressed_size: u64,
    pub total_compressed_size: u64,
    pub compression_ratio: f64,
    pub space_saved: u64,
}

impl CompressionStats {
    /// Summarize a run of per-chunk summaries, e.g. the second element of
    /// [`encode`]'s return value.
    pub fn summarize(chunks: &[ChunkSummary]) -> Self {
        let total_uncompressed: u64 = chunks.iter().map(|c| c.uncompressed_size as u64).sum();
        let total_compressed: u64 = chunks.iter().map(|c| c.compressed_size as u64).sum();
        let compression_ratio = if total_uncompressed > 0 {
            total_compressed as f64 / total_uncompressed as f64
        } else {
            1.0
        };
        Self {
            chunk_count: chunks.len(),
            total_uncompressed_size: total_uncompressed,
            total_compressed_size: total_compressed,
            compression_ratio,
            space_saved: total_uncompressed.saturating_sub(total_compressed),
        }
    }

    /// Percentage of the original size removed by compression.
    pub fn efficiency_percent(&self) -> f64 {
        (1.0 - self.compression_ratio) * 100.0
    }
}

struct ChunkHeader {
    info: CompressionInfo,
    compressed_size: u64,
    uncompressed_size: u64,
}

#[cfg(test)]
const HEADER_LEN: usize = 8 + 4 + 4 + 1 + 16 + 16 + 1;

fn read_header(reader: &mut ByteReader) -> Result<ChunkHeader> {
    let start = reader.position();
    let tag = reader.read_fixed::<8>()?;
    if tag != PACKAGE_FILE_TAG {
        return Err(BinaryError::Codec(CodecError::malformed_chunk_header(
            start,
            "package file tag mismatch",
        )));
    }
    let _package_file_version = reader.read_i32()?;
    let max_chunk_size = reader.read_u32()?;
    let algorithm = CompressionAlgorithm::from_u8(reader.read_u8()?)?;
    let compressed_size_a = reader.read_i64()? as u64;
    let uncompressed_size_a = reader.read_i64()? as u64;
    let compressed_size_b = reader.read_i64()? as u64;
    let uncompressed_size_b = reader.read_i64()? as u64;
    if compressed_size_a != compressed_size_b || uncompressed_size_a != uncompressed_size_b {
        return Err(BinaryError::Codec(CodecError::malformed_chunk_header(
            start,
            "duplicated size pair disagrees",
        )));
    }
    let flags = reader.read_u8()?;
    Ok(ChunkHeader {
        info: CompressionInfo {
            algorithm,
            max_chunk_size,
            flags,
        },
        compressed_size: compressed_size_a,
        uncompressed_size: uncompressed_size_a,
    })
}

fn write_header(writer: &mut ByteWriter, info: &CompressionInfo, compressed_size: u64, uncompressed_size: u64) {
    writer.write_bytes(&PACKAGE_FILE_TAG);
    writer.write_i32(PACKAGE_FILE_VERSION);
    writer.write_u32(info.max_chunk_size);
    writer.write_u8(info.algorithm as u8);
    writer.write_i64(compressed_size as i64);
    writer.write_i64(uncompressed_size as i64);
    writer.write_i64(compressed_size as i64);
    writer.write_i64(uncompressed_size as i64);
    writer.write_u8(info.flags);
}

fn inflate(algorithm: CompressionAlgorithm, bytes: &[u8], expected_len: u64) -> Result<Vec<u8>> {
    let out = match algorithm {
        CompressionAlgorithm::None => bytes.to_vec(),
        CompressionAlgorithm::Zlib => {
            let mut decoder = flate2::read::ZlibDecoder::new(bytes);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out)?;
            out
        }
    };
    if out.len() as u64 != expected_len {
        return Err(BinaryError::Codec(CodecError::body_length_mismatch(
            expected_len,
            out.len() as u64,
            "chunk body",
        )));
    }
    Ok(out)
}

fn deflate(algorithm: CompressionAlgorithm, bytes: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        CompressionAlgorithm::None => Ok(bytes.to_vec()),
        CompressionAlgorithm::Zlib => {
            let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(bytes)?;
            Ok(encoder.finish()?)
        }
    }
}

/// Decode a sequence of chunks into one contiguous body, returning the
/// [`CompressionInfo`] captured from the first chunk.
pub fn decode(bytes: &[u8]) -> Result<(CompressionInfo, Vec<u8>)> {
    let mut reader = ByteReader::new(bytes);
    let mut body = Vec::new();
    let mut info: Option<CompressionInfo> = None;

    while !reader.is_at_end() {
        let header = read_header(&mut reader)?;
        match &info {
            None => info = Some(header.info),
            Some(first) => {
                if *first != header.info {
                    return Err(BinaryError::Codec(CodecError::malformed_chunk_header(
                        reader.position(),
                        "chunk compression parameters changed mid-stream",
                    )));
                }
            }
        }
        let compressed = reader.read_bytes(header.compressed_size as usize)?;
        let inflated = inflate(header.info.algorithm, compressed, header.uncompressed_size)?;
        body.extend_from_slice(&inflated);
    }

    Ok((info.unwrap_or_default(), body))
}

/// Slice `body` into chunks of at most `max_chunk_size` uncompressed bytes,
/// compress each, and emit its header + compressed bytes. Returns a summary
/// per chunk with a running output offset.
pub fn encode(
    body: &[u8],
    info: CompressionInfo,
    mut on_before_compressing: impl FnMut(&[u8]),
    mut on_chunk: impl FnMut(&ChunkSummary, &[u8]),
) -> Result<(Vec<u8>, Vec<ChunkSummary>)> {
    on_before_compressing(body);

    let max_chunk_size = info.max_chunk_size.max(1) as usize;
    let mut out = Vec::with_capacity(body.len());
    let mut summaries = Vec::new();
    let mut offset = 0u64;

    for piece in body.chunks(max_chunk_size) {
        let compressed = deflate(info.algorithm, piece)?;
        let mut writer = ByteWriter::new();
        write_header(&mut writer, &info, compressed.len() as u64, piece.len() as u64);
        writer.write_bytes(&compressed);
        let chunk_bytes = writer.into_bytes();

        let summary = ChunkSummary {
            uncompressed_size: piece.len() as u32,
            compressed_size: compressed.len() as u32,
            offset,
        };
        offset += chunk_bytes.len() as u64;
        on_chunk(&summary, &chunk_bytes);
        out.extend_from_slice(&chunk_bytes);
        summaries.push(summary);
    }

    Ok((out, summaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_small_body() {
        let body = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let info = CompressionInfo::default();
        let (encoded, summaries) = encode(&body, info, |_| {}, |_, _| {}).unwrap();
        assert!(!summaries.is_empty());
        let (decoded_info, decoded_body) = decode(&encoded).unwrap();
        assert_eq!(decoded_info, info);
        assert_eq!(decoded_body, body);
    }

    #[test]
    fn test_chunk_invariant_sum_of_uncompressed_sizes() {
        let body = vec![42u8; 300_000];
        let info = CompressionInfo {
            max_chunk_size: 128 * 1024,
            ..CompressionInfo::default()
        };
        let (_encoded, summaries) = encode(&body, info, |_| {}, |_, _| {}).unwrap();
        let total: u64 = summaries.iter().map(|s| s.uncompressed_size as u64).sum();
        assert_eq!(total, body.len() as u64);
    }

    #[test]
    fn test_compression_stats_reports_space_saved_for_repetitive_body() {
        let body = vec![7u8; 300_000];
        let info = CompressionInfo::default();
        let (_encoded, summaries) = encode(&body, info, |_| {}, |_, _| {}).unwrap();
        let stats = CompressionStats::summarize(&summaries);
        assert_eq!(stats.total_uncompressed_size, body.len() as u64);
        assert!(stats.total_compressed_size < stats.total_uncompressed_size);
        assert!(stats.space_saved > 0);
        assert!(stats.efficiency_percent() > 0.0);
    }

    #[test]
    fn test_compression_stats_of_empty_summary_is_neutral() {
        let stats = CompressionStats::summarize(&[]);
        assert_eq!(stats.chunk_count, 0);
        assert_eq!(stats.compression_ratio, 1.0);
        assert_eq!(stats.space_saved, 0);
    }

    #[test]
    fn test_rejects_bad_tag() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0] = 0xFF;
        assert!(decode(&bytes).is_err());
    }
}
