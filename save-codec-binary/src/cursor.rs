//! Forward-seeking byte cursor: a reader over a borrowed buffer and a
//! growable writer, both little-endian, with the length-prefixed string
//! convention and GUIDInfo helpers shared by every higher-level codec.

use crate::error::{BinaryError, Result};
use save_codec_core::{CodecError, ObjectReference};

/// A forward-only cursor over a borrowed byte slice.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure_available(n)?;
        self.pos += n;
        Ok(())
    }

    fn ensure_available(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(BinaryError::Codec(CodecError::unexpected_end_of_stream(
                self.position(),
                n,
                self.remaining(),
            )));
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure_available(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_fixed::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_fixed::<2>()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_fixed::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_fixed::<4>()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_fixed::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_fixed::<8>()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_fixed::<8>()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_fixed::<4>()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_fixed::<8>()?))
    }

    /// Strict boolean byte: only `0` or `1` are legal.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BinaryError::Codec(CodecError::invalid_data(
                self.position() - 1,
                format!("boolean byte must be 0 or 1, got {other}"),
            ))),
        }
    }

    /// A 32-bit bool, as used by a handful of header fields that were never
    /// narrowed to a single byte.
    pub fn read_bool32(&mut self) -> Result<bool> {
        Ok(self.read_u32()? != 0)
    }

    pub fn read_guid(&mut self) -> Result<[u8; 16]> {
        self.read_fixed::<16>()
    }

    /// A GUIDInfo: one flag byte, and if nonzero, 16 raw bytes.
    pub fn read_guid_info(&mut self) -> Result<Option<[u8; 16]>> {
        if self.read_u8()? != 0 {
            Ok(Some(self.read_guid()?))
        } else {
            Ok(None)
        }
    }

    /// Length-prefixed dual UTF-8/UTF-16 string (spec §4.1).
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.position();
        let len = self.read_i32()?;
        if len == 0 {
            return Ok(String::new());
        }
        if len > 0 {
            let byte_len = len as usize;
            let bytes = self.read_bytes(byte_len)?;
            let without_nul = bytes.strip_suffix(&[0u8]).unwrap_or(bytes);
            std::str::from_utf8(without_nul)
                .map(|s| s.to_string())
                .map_err(|e| {
                    BinaryError::Codec(CodecError::malformed_string(
                        start,
                        format!("invalid UTF-8: {e}"),
                    ))
                })
        } else {
            let unit_count = len.unsigned_abs() as usize;
            let mut units = Vec::with_capacity(unit_count);
            for _ in 0..unit_count {
                units.push(self.read_u16()?);
            }
            if units.last() == Some(&0) {
                units.pop();
            }
            String::from_utf16(&units).map_err(|e| {
                BinaryError::Codec(CodecError::malformed_string(
                    start,
                    format!("invalid UTF-16: {e}"),
                ))
            })
        }
    }
}

/// An append-only growable buffer with the ability to patch a previously
/// reserved length field once its payload has been written.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn position(&self) -> u64 {
        self.buf.len() as u64
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.write_u8(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(if v { 1 } else { 0 });
    }

    pub fn write_bool32(&mut self, v: bool) {
        self.write_u32(if v { 1 } else { 0 });
    }

    pub fn write_guid(&mut self, guid: &[u8; 16]) {
        self.buf.extend_from_slice(guid);
    }

    pub fn write_guid_info(&mut self, guid: Option<&[u8; 16]>) {
        match guid {
            Some(g) => {
                self.write_u8(1);
                self.write_guid(g);
            }
            None => self.write_u8(0),
        }
    }

    /// Dual UTF-8/UTF-16 string writer (spec §4.1): UTF-16 whenever any code
    /// point exceeds 7-bit ASCII, UTF-8 otherwise. Both forms carry a
    /// trailing NUL counted in the length prefix.
    pub fn write_string(&mut self, s: &str) {
        if s.is_empty() {
            self.write_i32(0);
            return;
        }
        if s.is_ascii() {
            let byte_len = s.len() + 1;
            self.write_i32(byte_len as i32);
            self.write_bytes(s.as_bytes());
            self.write_u8(0);
        } else {
            let units: Vec<u16> = s.encode_utf16().collect();
            let unit_count = units.len() + 1;
            self.write_i32(-(unit_count as i32));
            for unit in units {
                self.write_u16(unit);
            }
            self.write_u16(0);
        }
    }

    /// Reserve a 4-byte length field, returning its buffer offset for a
    /// later [`Self::patch_u32`] call.
    pub fn reserve_u32(&mut self) -> usize {
        let at = self.buf.len();
        self.write_u32(0);
        at
    }

    pub fn patch_u32(&mut self, at: usize, value: u32) {
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// The level-name/path-name pair every object reference is wired as,
/// shared by every codec that embeds one (level collectables, object
/// parent/child links, and a handful of well-known struct payloads).
pub(crate) fn read_object_reference(reader: &mut ByteReader) -> Result<ObjectReference> {
    Ok(ObjectReference {
        level_name: reader.read_string()?,
        path_name: reader.read_string()?,
    })
}

pub(crate) fn write_object_reference(writer: &mut ByteWriter, reference: &ObjectReference) {
    writer.write_string(&reference.level_name);
    writer.write_string(&reference.path_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip_ascii() {
        let mut w = ByteWriter::new();
        w.write_string("hello");
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_string().unwrap(), "hello");
        // "hello\0" = 6 bytes
        assert_eq!(i32::from_le_bytes(bytes[0..4].try_into().unwrap()), 6);
    }

    #[test]
    fn test_string_round_trip_utf16() {
        let mut w = ByteWriter::new();
        w.write_string("caf\u{e9}"); // non-ASCII code point forces UTF-16
        let bytes = w.into_bytes();
        let len = i32::from_le_bytes(bytes[0..4].try_into().unwrap());
        assert!(len < 0);
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_string().unwrap(), "caf\u{e9}");
    }

    #[test]
    fn test_empty_string() {
        let mut w = ByteWriter::new();
        w.write_string("");
        let bytes = w.into_bytes();
        assert_eq!(bytes, 0i32.to_le_bytes());
    }

    #[test]
    fn test_negative_zero_float_bytes() {
        let mut w = ByteWriter::new();
        w.write_f32(-0.0_f32);
        assert_eq!(w.into_bytes(), [0x00, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_patch_length_field() {
        let mut w = ByteWriter::new();
        let at = w.reserve_u32();
        w.write_bytes(b"xyz");
        w.patch_u32(at, 3);
        let bytes = w.into_bytes();
        assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()), 3);
    }

    #[test]
    fn test_guid_info_round_trip() {
        let mut w = ByteWriter::new();
        w.write_guid_info(None);
        let guid = [7u8; 16];
        w.write_guid_info(Some(&guid));
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_guid_info().unwrap(), None);
        assert_eq!(r.read_guid_info().unwrap(), Some(guid));
    }

    #[test]
    fn test_unexpected_end_of_stream() {
        let bytes = [0u8; 2];
        let mut r = ByteReader::new(&bytes);
        assert!(r.read_u32().is_err());
    }
}
