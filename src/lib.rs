//! A binary codec for save and blueprint files of a factory-building
//! simulation game: chunked/compressed framing, a tagged self-describing
//! property format, and a polymorphic struct dispatcher, bundled behind a
//! small language-agnostic façade.
//!
//! The wire-level codec lives in [`save_codec_core`] (value types,
//! constants, errors) and [`save_codec_binary`] (readers/writers, chunk
//! framing, property/object/save/blueprint codecs). This crate re-exports
//! both and adds the façade surface ([`facade`]) and a hand-rolled JSON
//! emitter ([`json`]) for CLI reporting.

pub mod describe;
pub mod facade;
pub mod json;

pub use save_codec_binary::blueprint::{Blueprint, BlueprintCodec, BlueprintHeader};
pub use save_codec_binary::chunk::{ChunkSummary, CompressionAlgorithm, CompressionInfo, CompressionStats};
pub use save_codec_binary::object::{ComponentHeader, EntityHeader, ObjectCodec, SceneObject};
pub use save_codec_binary::save::{Level, Save, SaveCodec, SaveHeader};
pub use save_codec_binary::{BinaryError, Result};
pub use save_codec_core::{
    ArrayElements, ArrayProperty, ByteValue, CodecError, MapProperty, ObjectReference, Precision,
    Property, PropertyList, PropertyValue, SetProperty, StructPayload, TextHistory, TextValue,
    VersionClass,
};

pub use describe::{blueprint_to_json, save_to_json};
pub use facade::{parse_blueprint, parse_save, write_blueprint, write_save, ParseOptions, WriteOptions};
