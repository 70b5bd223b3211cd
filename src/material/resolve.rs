use std::collections::BTreeMap;

use crate::foundation::color::MaskColor;
use crate::foundation::diag::Diagnostic;
use crate::foundation::error::{PbrError, PbrResult};
use crate::mask::decode::ColorMap;
use crate::material::model::Material;
use crate::stats::accumulate::MaterialStats;

/// Measured averages below this are statistically indistinguishable from zero
/// and are never normalized against.
const MIN_NORMALIZABLE_AVERAGE: f64 = 1.0 / 255.0;

/// Materials resolved per mask color, ready for compositing, plus any
/// diagnostics collected while normalizing multipliers.
#[derive(Clone, Debug)]
pub struct ResolvedMaterials {
    /// Material descriptor per mask color.
    pub by_color: BTreeMap<MaskColor, Material>,
    /// Non-fatal conditions observed during normalization.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compose color→label, label→material-name, and name→material into the
/// color→material map the compositor consumes, folding measured statistics
/// into the multipliers.
///
/// All configuration errors are detected here, before any pixel is touched:
/// an assignment naming an undeclared material is [`PbrError::UndefinedMaterial`],
/// a discovered mask without an assignment is [`PbrError::MaterialNotAssignedToMask`],
/// and a material that declares a desired average without matching measured
/// statistics is [`PbrError::MissingRequiredStats`].
#[tracing::instrument(skip_all, fields(regions = color_map.len()))]
pub fn resolve_color_materials(
    color_map: &ColorMap,
    mask_to_material: &BTreeMap<String, String>,
    materials: &BTreeMap<String, Material>,
    stats: Option<&BTreeMap<String, MaterialStats>>,
) -> PbrResult<ResolvedMaterials> {
    for name in mask_to_material.values() {
        if !materials.contains_key(name) {
            return Err(PbrError::UndefinedMaterial(name.clone()));
        }
    }

    let mut by_color = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for (color, mask) in color_map.iter() {
        let name = mask_to_material
            .get(mask)
            .ok_or_else(|| PbrError::MaterialNotAssignedToMask(mask.to_string()))?;
        let material = &materials[name];

        let region_stats = stats.and_then(|s| s.get(mask));
        if material.has_average() && region_stats.is_none() {
            return Err(PbrError::MissingRequiredStats {
                material: name.clone(),
                mask: mask.to_string(),
            });
        }

        by_color.insert(
            color,
            normalize_material(material, region_stats, mask, &mut diagnostics),
        );
    }

    Ok(ResolvedMaterials {
        by_color,
        diagnostics,
    })
}

/// Fold measured averages into the multipliers, consuming the desired
/// averages in the process.
fn normalize_material(
    material: &Material,
    stats: Option<&MaterialStats>,
    mask: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Material {
    Material::new(
        material.metalness_min,
        material.metalness_max,
        normalize_multiplier(
            material.metalness_multiplier,
            material.metalness_average,
            stats.map(|s| s.metalness_average),
            mask,
            "metalness",
            diagnostics,
        ),
        None,
        material.glossiness_min,
        material.glossiness_max,
        normalize_multiplier(
            material.glossiness_multiplier,
            material.glossiness_average,
            stats.map(|s| s.glossiness_average),
            mask,
            "glossiness",
            diagnostics,
        ),
        None,
    )
}

/// Rescale a multiplier so that applying it drives the measured average
/// toward the desired one. Without a desired average, or without a usable
/// measured average, the multiplier passes through unchanged.
fn normalize_multiplier(
    multiplier: f64,
    desired: Option<f64>,
    measured: Option<f64>,
    mask: &str,
    property: &'static str,
    diagnostics: &mut Vec<Diagnostic>,
) -> f64 {
    let Some(desired) = desired else {
        return multiplier;
    };
    match measured {
        Some(measured) if measured < MIN_NORMALIZABLE_AVERAGE => {
            tracing::warn!(
                mask,
                property,
                measured,
                "measured average too small, keeping configured multiplier"
            );
            diagnostics.push(Diagnostic::AverageTooSmall {
                mask: mask.to_string(),
                property,
            });
            multiplier
        }
        Some(measured) => multiplier * (desired / measured),
        None => multiplier,
    }
}
