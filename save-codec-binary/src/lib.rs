//! Binary reader/writer, chunk framing, and the property/object codec for
//! save and blueprint files.

pub mod blueprint;
pub mod chunk;
pub mod cursor;
pub mod error;
pub mod grids;
pub mod object;
pub mod property;
pub mod registry;
pub mod save;
pub mod version;

pub use blueprint::{Blueprint, BlueprintCodec};
pub use chunk::{ChunkSummary, CompressionAlgorithm, CompressionInfo};
pub use cursor::{ByteReader, ByteWriter};
pub use error::{BinaryError, Result};
pub use object::{ObjectCodec, SceneObject};
pub use save::{Save, SaveCodec, SaveHeader};
