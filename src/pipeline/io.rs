use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::model::Settings;
use crate::foundation::error::{PbrError, PbrResult};
use crate::foundation::raster::{Layer, RasterBuffer};
use crate::mask::decode::ColorMap;
use crate::stats::accumulate::MaterialStats;

/// Decode a raster image file into an RGBA8 buffer.
pub fn read_image(path: &Path) -> PbrResult<RasterBuffer> {
    let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterBuffer::from_rgba8(width, height, rgba.into_raw())
}

/// Encode an RGBA8 buffer as a PNG file, creating parent directories.
pub fn write_image(path: &Path, buffer: &RasterBuffer) -> PbrResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        buffer.data(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Read source layers from a directory of labeled PNG files.
///
/// This is the stand-in for the layered-container decoder: each `<label>.png`
/// becomes one layer whose label is the file stem, visited in lexicographic
/// file-name order so label discovery (and therefore palette assignment) is
/// stable across runs.
pub fn read_layers_from_dir(dir: &Path) -> PbrResult<Vec<Layer>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read layer dir '{}'", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    paths.sort();

    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        let img =
            image::open(&path).with_context(|| format!("open layer '{}'", path.display()))?;
        let channels = u32::from(img.color().channel_count());
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        layers.push(Layer::new(
            label,
            channels,
            RasterBuffer::from_rgba8(width, height, rgba.into_raw())?,
        ));
    }

    Ok(layers)
}

/// Parse a settings JSON file.
pub fn load_settings(path: &Path) -> PbrResult<Settings> {
    let file =
        File::open(path).with_context(|| format!("open settings '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PbrError::serde(format!("parse settings '{}': {e}", path.display())))
}

/// Parse a color→label map file. The decode and analyze passes must share
/// one map, so a missing file is an error here.
pub fn read_color_map(path: &Path) -> PbrResult<ColorMap> {
    let file =
        File::open(path).with_context(|| format!("read color map '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PbrError::serde(format!("parse color map '{}': {e}", path.display())))
}

/// Parse a statistics snapshot if one exists. Absence is not an error; the
/// resolver decides whether statistics were required.
pub fn read_stats(path: &Path) -> PbrResult<Option<BTreeMap<String, MaterialStats>>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("read stats '{}'", path.display()))?;
    let stats = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PbrError::serde(format!("parse stats '{}': {e}", path.display())))?;
    Ok(Some(stats))
}

/// Pretty-print a serializable value to a JSON file, creating parent
/// directories.
pub fn write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> PbrResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("write '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| PbrError::serde(format!("serialize '{}': {e}", path.display())))
}

/// Mask image path for an input file: `<mask_dir>/<stem>.png`.
pub fn mask_image_path(mask_dir: &Path, file_name: &str) -> PathBuf {
    mask_dir.join(Path::new(file_name).with_extension("png"))
}

/// Color map path for an input file: `<mask_dir>/<stem>.json`.
pub fn color_map_path(mask_dir: &Path, file_name: &str) -> PathBuf {
    mask_dir.join(Path::new(file_name).with_extension("json"))
}

/// Statistics path for an input file: `<mask_dir>/<stem>.stats.json`.
pub fn stats_path(mask_dir: &Path, file_name: &str) -> PathBuf {
    mask_dir.join(Path::new(file_name).with_extension("stats.json"))
}
