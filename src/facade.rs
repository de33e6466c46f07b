//! The language-agnostic façade surface: `parse_save`/`write_save`,
//! `parse_blueprint`/`write_blueprint`, and `stringify`. This is the one
//! place the on_progress/on_decompressed_body/on_binary_before_compressing/
//! on_header/on_chunk callbacks all come together.

use save_codec_binary::blueprint::{Blueprint, BlueprintCodec};
use save_codec_binary::chunk::ChunkSummary;
use save_codec_binary::save::Save;
use save_codec_binary::Result;

type ProgressCallback<'a> = Box<dyn FnMut(f32, &str) + 'a>;
type BytesCallback<'a> = Box<dyn FnMut(&[u8]) + 'a>;

/// Callbacks and knobs recognized by [`parse_save`]/[`parse_blueprint`].
/// Every field is optional; an unset callback is simply never invoked.
#[derive(Default)]
pub struct ParseOptions<'a> {
    /// Called with progress in `[0, 1]` and a short milestone message.
    pub on_progress: Option<ProgressCallback<'a>>,
    /// Called once, after chunk inflate and before the body is parsed.
    pub on_decompressed_body: Option<BytesCallback<'a>>,
}

impl<'a> ParseOptions<'a> {
    fn progress(&mut self, p: f32, msg: &str) {
        if let Some(cb) = self.on_progress.as_mut() {
            cb(p, msg);
        }
    }

    fn decompressed_body(&mut self, bytes: &[u8]) {
        if let Some(cb) = self.on_decompressed_body.as_mut() {
            cb(bytes);
        }
    }
}

/// Callbacks and knobs recognized by [`write_save`]/[`write_blueprint`], in
/// addition to the `on_header`/`on_chunk` parameters those functions take
/// directly.
#[derive(Default)]
pub struct WriteOptions<'a> {
    /// Called once during encode with the uncompressed body, before it is
    /// compressed into chunks.
    pub on_binary_before_compressing: Option<BytesCallback<'a>>,
}

/// Decode `bytes` into a [`Save`]. `name` identifies the source for
/// diagnostics only; it has no bearing on decode.
pub fn parse_save(_name: &str, bytes: &[u8], mut options: ParseOptions) -> Result<Save> {
    options.progress(0.0, "decoding header and chunks");
    let save = {
        let options = &mut options;
        save_codec_binary::save::SaveCodec::decode(bytes, |body| options.decompressed_body(body))?
    };
    options.progress(1.0, "decode complete");
    Ok(save)
}

/// Encode `save`, returning the output bytes and a per-chunk summary.
pub fn write_save(
    save: &Save,
    mut on_header: impl FnMut(&[u8]),
    mut on_chunk: impl FnMut(&ChunkSummary, &[u8]),
    mut options: WriteOptions,
) -> Result<(Vec<u8>, Vec<ChunkSummary>)> {
    let before_compressing = |bytes: &[u8]| {
        if let Some(cb) = options.on_binary_before_compressing.as_mut() {
            cb(bytes);
        }
    };
    save_codec_binary::save::SaveCodec::encode(save, &mut on_header, before_compressing, &mut on_chunk)
}

/// Decode a main/config blueprint file pair into a [`Blueprint`].
pub fn parse_blueprint(
    _name: &str,
    main_bytes: &[u8],
    config_bytes: &[u8],
    mut options: ParseOptions,
) -> Result<Blueprint> {
    options.progress(0.0, "decoding header and chunks");
    let blueprint = {
        let options = &mut options;
        BlueprintCodec::decode(main_bytes, config_bytes, |body| options.decompressed_body(body))?
    };
    options.progress(1.0, "decode complete");
    Ok(blueprint)
}

/// Encode `blueprint`, returning the main file bytes, a per-chunk summary,
/// and the config file bytes (passed through unchanged).
pub fn write_blueprint(
    blueprint: &Blueprint,
    mut on_header: impl FnMut(&[u8]),
    mut on_chunk: impl FnMut(&ChunkSummary, &[u8]),
    mut options: WriteOptions,
) -> Result<(Vec<u8>, Vec<ChunkSummary>, Vec<u8>)> {
    let before_compressing = |bytes: &[u8]| {
        if let Some(cb) = options.on_binary_before_compressing.as_mut() {
            cb(bytes);
        }
    };
    BlueprintCodec::encode(blueprint, &mut on_header, before_compressing, &mut on_chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use save_codec_binary::chunk::CompressionInfo;
    use save_codec_binary::grids::PartitionGrids;
    use save_codec_binary::object::{ComponentHeader, SceneObject};
    use save_codec_binary::save::{Level, SaveHeader};
    use save_codec_core::PropertyList;

    fn sample_save() -> Save {
        Save {
            header: SaveHeader {
                save_header_version: 13,
                save_version: 42,
                build_version: 1,
                map_name: "Persistent_Level".to_string(),
                map_options: String::new(),
                session_name: "Facade Test".to_string(),
                play_duration_seconds: 0,
                save_date_ticks: 0,
                session_visibility: 0,
                editor_object_version: 0,
                mod_metadata: String::new(),
                is_modded_save: false,
            },
            compression_info: CompressionInfo::default(),
            body_hash: [0u8; 32],
            grids: PartitionGrids::default(),
            levels: vec![Level {
                objects: vec![SceneObject::Component {
                    header: ComponentHeader {
                        type_path: "/Script/Game.BP_Foo_C".to_string(),
                        root_object_path: "Persistent_Level".to_string(),
                        instance_name: "BP_Foo_0".to_string(),
                        outer_object_path: "BP_Foo_0".to_string(),
                    },
                    offset_index: 0,
                    properties: PropertyList::new(),
                    trailing_blob: Vec::new(),
                }],
                collectables: Vec::new(),
                trailing_blob: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_write_then_parse_save_round_trips() {
        // body_hash is recomputed on write, so it's excluded from the comparison.
        let save = sample_save();
        let (bytes, summaries) = write_save(&save, |_| {}, |_, _| {}, WriteOptions::default()).unwrap();
        assert!(!summaries.is_empty());
        let decoded = parse_save("test", &bytes, ParseOptions::default()).unwrap();
        assert_eq!(decoded.header, save.header);
        assert_eq!(decoded.grids, save.grids);
        assert_eq!(decoded.levels, save.levels);
    }

    #[test]
    fn test_parse_save_progress_callback_fires() {
        let save = sample_save();
        let (bytes, _) = write_save(&save, |_| {}, |_, _| {}, WriteOptions::default()).unwrap();

        let mut milestones = Vec::new();
        let options = ParseOptions {
            on_progress: Some(Box::new(|p, msg| milestones.push((p, msg.to_string())))),
            ..Default::default()
        };
        parse_save("test", &bytes, options).unwrap();
        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[0].0, 0.0);
        assert_eq!(milestones[1].0, 1.0);
    }

    #[test]
    fn test_decompressed_body_callback_sees_inflated_bytes() {
        let save = sample_save();
        let (bytes, _) = write_save(&save, |_| {}, |_, _| {}, WriteOptions::default()).unwrap();

        let mut body_len = 0usize;
        let options = ParseOptions {
            on_decompressed_body: Some(Box::new(|body| body_len = body.len())),
            ..Default::default()
        };
        parse_save("test", &bytes, options).unwrap();
        assert!(body_len > 0);
    }
}
