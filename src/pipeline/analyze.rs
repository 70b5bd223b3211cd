use std::path::PathBuf;

use rayon::prelude::*;

use crate::config::model::Settings;
use crate::foundation::diag::Diagnostic;
use crate::foundation::error::PbrResult;
use crate::pipeline::io;
use crate::stats::accumulate::analyze_regions;

/// Outcome of analyzing one image: where the snapshot went and what was
/// observed along the way.
#[derive(Clone, Debug)]
pub struct AnalyzeOutcome {
    /// Input file name from the settings.
    pub file_name: String,
    /// Path of the written statistics snapshot.
    pub stats_path: PathBuf,
    /// Non-fatal conditions observed while accumulating.
    pub diagnostics: Vec<Diagnostic>,
}

/// Measure per-region statistics for one input image and persist the
/// snapshot as `<mask_dir>/<stem>.stats.json`.
#[tracing::instrument(skip(settings))]
pub fn analyze_image(settings: &Settings, file_name: &str) -> PbrResult<AnalyzeOutcome> {
    let color_map = io::read_color_map(&io::color_map_path(&settings.mask_directory, file_name))?;

    let input = io::read_image(&settings.input_directory.join(file_name))?;
    let mask = io::read_image(&io::mask_image_path(&settings.mask_directory, file_name))?;

    let analysis = analyze_regions(&input, &mask, &color_map)?;

    let stats_path = io::stats_path(&settings.mask_directory, file_name);
    io::write_json_pretty(&stats_path, &analysis.stats)?;

    Ok(AnalyzeOutcome {
        file_name: file_name.to_string(),
        stats_path,
        diagnostics: analysis.diagnostics,
    })
}

/// Analyze every input image named in the settings.
///
/// Images are independent units of work and run on the rayon pool; the first
/// error aborts the batch.
pub fn analyze_all(settings: &Settings) -> PbrResult<Vec<AnalyzeOutcome>> {
    settings
        .input
        .keys()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|file_name| analyze_image(settings, file_name))
        .collect()
}
