//! `FText`-style recursive tagged text values (spec §4.4's "Text" payload).

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{BinaryError, Result};
use save_codec_core::{CodecError, TextHistory, TextValue};

const HISTORY_NONE: i8 = -1;
const HISTORY_BASE: i8 = 0;
const HISTORY_NAMED_FORMAT: i8 = 1;
const HISTORY_ARGUMENT_FORMAT: i8 = 3;
const HISTORY_AS_NUMBER: i8 = 4;
const HISTORY_AS_DATE: i8 = 7;
const HISTORY_TRANSFORM: i8 = 9;
const HISTORY_STRING_TABLE_ENTRY: i8 = 10;

pub fn read_text(reader: &mut ByteReader) -> Result<TextValue> {
    let flags = reader.read_u32()?;
    let history_type = reader.read_i8()?;
    let history = match history_type {
        HISTORY_NONE => TextHistory::None,
        HISTORY_BASE => TextHistory::Base {
            namespace: reader.read_string()?,
            key: reader.read_string()?,
            source_string: reader.read_string()?,
        },
        HISTORY_NAMED_FORMAT => {
            let source_format = Box::new(read_text(reader)?);
            let count = reader.read_u32()?;
            let mut arguments = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let name = reader.read_string()?;
                let value = read_text(reader)?;
                arguments.push((name, value));
            }
            TextHistory::NamedFormat {
                source_format,
                arguments,
            }
        }
        HISTORY_ARGUMENT_FORMAT => {
            let source_format = Box::new(read_text(reader)?);
            let count = reader.read_u32()?;
            let mut arguments = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let name = reader.read_string()?;
                let value = read_text(reader)?;
                arguments.push((name, value));
            }
            TextHistory::ArgumentFormat {
                source_format,
                arguments,
            }
        }
        HISTORY_AS_NUMBER => {
            let source_value = Box::new(read_text(reader)?);
            let format_options = if reader.read_bool()? {
                Some(reader.read_string()?)
            } else {
                None
            };
            let target_culture = reader.read_string()?;
            TextHistory::AsNumber {
                source_value,
                format_options,
                target_culture,
            }
        }
        HISTORY_AS_DATE => TextHistory::AsDate {
            date_time_ticks: reader.read_i64()?,
            date_style: reader.read_i32()?,
            target_culture: reader.read_string()?,
        },
        HISTORY_TRANSFORM => TextHistory::Transform {
            source_text: Box::new(read_text(reader)?),
            transform_type: reader.read_i32()?,
        },
        HISTORY_STRING_TABLE_ENTRY => TextHistory::StringTableEntry {
            table_id: reader.read_string()?,
            key: reader.read_string()?,
        },
        other => {
            return Err(BinaryError::Codec(CodecError::invalid_data(
                reader.position(),
                format!("unknown text history type {other}"),
            )));
        }
    };
    Ok(TextValue { flags, history })
}

pub fn write_text(writer: &mut ByteWriter, value: &TextValue) {
    writer.write_u32(value.flags);
    match &value.history {
        TextHistory::None => {
            writer.write_i8(HISTORY_NONE);
        }
        TextHistory::Base {
            namespace,
            key,
            source_string,
        } => {
            writer.write_i8(HISTORY_BASE);
            writer.write_string(namespace);
            writer.write_string(key);
            writer.write_string(source_string);
        }
        TextHistory::NamedFormat {
            source_format,
            arguments,
        } => {
            writer.write_i8(HISTORY_NAMED_FORMAT);
            write_text(writer, source_format);
            writer.write_u32(arguments.len() as u32);
            for (name, value) in arguments {
                writer.write_string(name);
                write_text(writer, value);
            }
        }
        TextHistory::ArgumentFormat {
            source_format,
            arguments,
        } => {
            writer.write_i8(HISTORY_ARGUMENT_FORMAT);
            write_text(writer, source_format);
            writer.write_u32(arguments.len() as u32);
            for (name, value) in arguments {
                writer.write_string(name);
                write_text(writer, value);
            }
        }
        TextHistory::AsNumber {
            source_value,
            format_options,
            target_culture,
        } => {
            writer.write_i8(HISTORY_AS_NUMBER);
            write_text(writer, source_value);
            writer.write_bool(format_options.is_some());
            if let Some(opts) = format_options {
                writer.write_string(opts);
            }
            writer.write_string(target_culture);
        }
        TextHistory::AsDate {
            date_time_ticks,
            date_style,
            target_culture,
        } => {
            writer.write_i8(HISTORY_AS_DATE);
            writer.write_i64(*date_time_ticks);
            writer.write_i32(*date_style);
            writer.write_string(target_culture);
        }
        TextHistory::Transform {
            source_text,
            transform_type,
        } => {
            writer.write_i8(HISTORY_TRANSFORM);
            write_text(writer, source_text);
            writer.write_i32(*transform_type);
        }
        TextHistory::StringTableEntry { table_id, key } => {
            writer.write_i8(HISTORY_STRING_TABLE_ENTRY);
            writer.write_string(table_id);
            writer.write_string(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_text_round_trip() {
        let value = TextValue {
            flags: 7,
            history: TextHistory::Base {
                namespace: "".to_string(),
                key: "12345".to_string(),
                source_string: "Hello".to_string(),
            },
        };
        let mut writer = ByteWriter::new();
        write_text(&mut writer, &value);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_text(&mut reader).unwrap(), value);
    }

    #[test]
    fn test_named_format_nested_round_trip() {
        let inner = TextValue {
            flags: 0,
            history: TextHistory::None,
        };
        let value = TextValue {
            flags: 1,
            history: TextHistory::NamedFormat {
                source_format: Box::new(inner.clone()),
                arguments: vec![("Name".to_string(), inner)],
            },
        };
        let mut writer = ByteWriter::new();
        write_text(&mut writer, &value);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_text(&mut reader).unwrap(), value);
    }
}
