//! Partition grids: the hierarchical tree of named partition cells that
//! follows the save header.
//!
//! The wire layout of the recursive cell tree (name, 64-bit coordinates,
//! level-instance names, children) isn't pinned down precisely enough to
//! parse field-by-field without guessing at a framing the game itself
//! doesn't document; this codec captures the whole tree as a single
//! length-prefixed opaque blob and replays it byte-for-byte on encode,
//! exactly like the trailing per-object blob in `object.rs`. A consumer
//! that needs semantic access to individual cells would extend this module
//! to walk the blob instead of copying it.

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionGrids(pub Vec<u8>);

pub fn read_grids(reader: &mut ByteReader) -> Result<PartitionGrids> {
    let len = reader.read_u32()? as usize;
    let bytes = reader.read_bytes(len)?;
    Ok(PartitionGrids(bytes.to_vec()))
}

pub fn write_grids(writer: &mut ByteWriter, grids: &PartitionGrids) {
    writer.write_u32(grids.0.len() as u32);
    writer.write_bytes(&grids.0);
}
