//! Pbrmask is a mask-driven editing pipeline for packed PBR material maps.
//!
//! Artists paint named mask regions as labeled layers over a source texture;
//! the pipeline flattens those regions into a color-indexed mask, measures
//! per-region channel statistics from an existing packed material texture
//! (metalness in byte 0, glossiness in byte 3), and rewrites the packed
//! channels so each region honors its configured material.
//!
//! # Pipeline overview
//!
//! 1. **Export**: labeled `Layer`s -> flat mask image + [`ColorMap`]
//!    (one fixed-palette color per discovered `MASK_` layer)
//! 2. **Analyze**: packed image + mask image + [`ColorMap`] ->
//!    per-label [`MaterialStats`]
//! 3. **Resolve**: [`MaterialDefinition`] + variables + optional stats ->
//!    concrete [`Material`] descriptors per mask color
//! 4. **Composite**: rewrite each masked pixel's two packed channels
//!    (multiply, then clamp), leaving bytes 1-2 untouched
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate; pixel access is
//!   bounds-checked.
//! - **Deterministic-by-default**: palette colors are assigned in label
//!   discovery order, and all keyed tables are `BTreeMap`s, so repeated runs
//!   over unchanged input produce identical artifacts.
//! - **No hidden output**: the core returns [`Diagnostic`]s instead of
//!   printing; callers decide to log, ignore, or fail strictly.
//! - **No partial artifacts**: every error is fatal to its image and output
//!   files are written only after a pass fully succeeds.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod config;
mod foundation;
mod mask;
mod material;
mod pipeline;
mod stats;

pub use composite::apply::{apply_material, apply_materials};
pub use config::model::{ImageFormat, ImageSettings, Settings};
pub use foundation::color::{
    MaskColor, alpha, glossiness, metalness, set_properties, unit_to_byte,
};
pub use foundation::diag::Diagnostic;
pub use foundation::error::{PbrError, PbrResult};
pub use foundation::raster::{BYTES_PER_PIXEL, Layer, RasterBuffer};
pub use mask::decode::{ColorMap, DecodedMask, MASK_LABEL_PREFIX, decode_mask};
pub use mask::palette::{PALETTE, PaletteAllocator};
pub use material::model::{Material, MaterialDefinition, Value};
pub use material::resolve::{ResolvedMaterials, resolve_color_materials};
pub use pipeline::analyze::{AnalyzeOutcome, analyze_all, analyze_image};
pub use pipeline::edit::{EditOutcome, edit_all, edit_image};
pub use pipeline::export::{MaskExport, export_mask};
pub use pipeline::io::{
    color_map_path, load_settings, mask_image_path, read_color_map, read_image,
    read_layers_from_dir, read_stats, stats_path, write_image, write_json_pretty,
};
pub use stats::accumulate::{MaterialStats, RegionAnalysis, StatsAccumulator, analyze_regions};
