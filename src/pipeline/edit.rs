use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::composite::apply::apply_materials;
use crate::config::model::{ImageSettings, Settings};
use crate::foundation::diag::Diagnostic;
use crate::foundation::error::{PbrError, PbrResult};
use crate::material::model::Material;
use crate::material::resolve::resolve_color_materials;
use crate::pipeline::io;

/// Outcome of rewriting one packed material image.
#[derive(Clone, Debug)]
pub struct EditOutcome {
    /// Input file name from the settings.
    pub file_name: String,
    /// Path of the rewritten image.
    pub output_path: PathBuf,
    /// Non-fatal conditions observed while resolving materials.
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrite one packed material image under its mask assignments.
///
/// All configuration is validated before any pixel file is read: an
/// unsupported channel layout, an assignment naming an undeclared material,
/// an unreadable color map, a mask without an assignment, and statistics
/// missing while a used material declares a desired average are each fatal
/// up front. The output file is written only after the full rewrite
/// succeeds.
#[tracing::instrument(skip(settings, materials, image_settings))]
pub fn edit_image(
    settings: &Settings,
    materials: &BTreeMap<String, Material>,
    file_name: &str,
    image_settings: &ImageSettings,
) -> PbrResult<EditOutcome> {
    image_settings.format.ensure_supported(file_name)?;

    for name in image_settings.mask_to_material.values() {
        if !materials.contains_key(name) {
            return Err(PbrError::UndefinedMaterial(name.clone()));
        }
    }

    let color_map = io::read_color_map(&io::color_map_path(&settings.mask_directory, file_name))?;
    let stats = io::read_stats(&io::stats_path(&settings.mask_directory, file_name))?;

    let resolved = resolve_color_materials(
        &color_map,
        &image_settings.mask_to_material,
        materials,
        stats.as_ref(),
    )?;

    let mut input = io::read_image(&settings.input_directory.join(file_name))?;
    let mask = io::read_image(&io::mask_image_path(&settings.mask_directory, file_name))?;

    apply_materials(&mut input, &mask, &resolved.by_color)?;

    let output_path = settings.output_directory.join(file_name);
    io::write_image(&output_path, &input)?;

    Ok(EditOutcome {
        file_name: file_name.to_string(),
        output_path,
        diagnostics: resolved.diagnostics,
    })
}

/// Rewrite every input image named in the settings.
///
/// Materials are resolved once against the variable table and shared
/// read-only across the rayon pool; the first error aborts the batch.
pub fn edit_all(settings: &Settings) -> PbrResult<Vec<EditOutcome>> {
    let materials = settings.resolve_materials()?;

    settings
        .input
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|(file_name, image_settings)| {
            edit_image(settings, &materials, file_name, image_settings)
        })
        .collect()
}
