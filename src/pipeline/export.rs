use std::path::{Path, PathBuf};

use crate::foundation::error::{PbrError, PbrResult};
use crate::mask::decode::{ColorMap, decode_mask};
use crate::pipeline::io;

/// Artifacts written by the mask export pass.
#[derive(Clone, Debug)]
pub struct MaskExport {
    /// Path of the flattened mask PNG.
    pub mask_path: PathBuf,
    /// Path of the color→label map JSON.
    pub map_path: PathBuf,
    /// The discovered color→label map.
    pub color_map: ColorMap,
}

/// Flatten one source image's labeled layers into a mask PNG plus color map.
///
/// `layers_dir` is a directory of `<label>.png` layer files (the collaborator
/// stand-in for the layered container); artifacts are written next to it as
/// `<dir-name>.png` and `<dir-name>.json`.
#[tracing::instrument]
pub fn export_mask(layers_dir: &Path) -> PbrResult<MaskExport> {
    let stem = layers_dir
        .file_name()
        .ok_or_else(|| {
            PbrError::validation(format!(
                "layer directory '{}' has no usable name",
                layers_dir.display()
            ))
        })?
        .to_string_lossy()
        .into_owned();
    let parent = layers_dir.parent().unwrap_or_else(|| Path::new("."));
    let mask_path = parent.join(format!("{stem}.png"));
    let map_path = parent.join(format!("{stem}.json"));

    let layers = io::read_layers_from_dir(layers_dir)?;
    let decoded = decode_mask(&layers)?;

    io::write_json_pretty(&map_path, &decoded.color_map)?;
    io::write_image(&mask_path, &decoded.mask)?;

    Ok(MaskExport {
        mask_path,
        map_path,
        color_map: decoded.color_map,
    })
}
