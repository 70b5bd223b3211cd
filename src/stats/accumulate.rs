use std::collections::BTreeMap;

use crate::foundation::color::{MaskColor, glossiness, metalness};
use crate::foundation::diag::Diagnostic;
use crate::foundation::error::{PbrError, PbrResult};
use crate::foundation::raster::RasterBuffer;
use crate::mask::decode::ColorMap;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Running sum/min/max over one 8-bit channel.
#[derive(Clone, Debug)]
struct ChannelAccumulator {
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for ChannelAccumulator {
    fn default() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl ChannelAccumulator {
    fn add(&mut self, value: u8) {
        let value = f64::from(value);
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Accumulates packed-channel statistics for one mask region.
#[derive(Clone, Debug, Default)]
pub struct StatsAccumulator {
    metalness: ChannelAccumulator,
    glossiness: ChannelAccumulator,
    count: u64,
}

impl StatsAccumulator {
    /// Fresh accumulator with no observed pixels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one packed material pixel into the running figures.
    pub fn add_pixel(&mut self, pixel: u32) {
        self.metalness.add(metalness(pixel));
        self.glossiness.add(glossiness(pixel));
        self.count += 1;
    }

    /// Number of pixels observed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Finalize into normalized statistics.
    ///
    /// Values are scaled to `[0, 1]` and rounded to 2 decimals. A region with
    /// zero observed pixels finalizes to all zeros rather than dividing 0/0;
    /// the caller records a [`Diagnostic::EmptyRegion`] for it.
    pub fn finalize(&self) -> MaterialStats {
        if self.count == 0 {
            return MaterialStats::default();
        }
        let count = self.count as f64;
        MaterialStats {
            metalness_min: round2(self.metalness.min / 255.0),
            metalness_max: round2(self.metalness.max / 255.0),
            metalness_average: round2(self.metalness.sum / (count * 255.0)),
            glossiness_min: round2(self.glossiness.min / 255.0),
            glossiness_max: round2(self.glossiness.max / 255.0),
            glossiness_average: round2(self.glossiness.sum / (count * 255.0)),
        }
    }
}

/// Finalized per-region statistics, each value in `[0, 1]` rounded to
/// 2 decimals. Persisted as a JSON snapshot and read back immutable.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MaterialStats {
    /// Smallest observed metalness.
    pub metalness_min: f64,
    /// Largest observed metalness.
    pub metalness_max: f64,
    /// Mean observed metalness.
    pub metalness_average: f64,
    /// Smallest observed glossiness.
    pub glossiness_min: f64,
    /// Largest observed glossiness.
    pub glossiness_max: f64,
    /// Mean observed glossiness.
    pub glossiness_average: f64,
}

/// Statistics for every mask region of one image, plus collected diagnostics.
#[derive(Clone, Debug)]
pub struct RegionAnalysis {
    /// Finalized statistics keyed by mask label.
    pub stats: BTreeMap<String, MaterialStats>,
    /// Non-fatal conditions observed while accumulating.
    pub diagnostics: Vec<Diagnostic>,
}

/// Measure per-region statistics of a packed material image.
///
/// Every mask pixel must resolve to a known label through `color_map`; the
/// analyze pass must be given the same map the decode pass produced.
#[tracing::instrument(skip_all, fields(regions = color_map.len()))]
pub fn analyze_regions(
    input: &RasterBuffer,
    mask: &RasterBuffer,
    color_map: &ColorMap,
) -> PbrResult<RegionAnalysis> {
    input.ensure_same_dimensions(mask, "input image vs mask image")?;

    let mut accumulators: BTreeMap<&str, StatsAccumulator> = color_map
        .labels()
        .map(|label| (label, StatsAccumulator::new()))
        .collect();

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let mask_color = MaskColor(mask.pixel(x, y)?);
            let label =
                color_map
                    .label(mask_color)
                    .ok_or_else(|| PbrError::UnmappedMaskColor {
                        color: mask_color.to_hex(),
                        x,
                        y,
                    })?;

            let pixel = input.pixel(x, y)?;
            accumulators
                .get_mut(label)
                .ok_or_else(|| PbrError::validation(format!("no accumulator for '{label}'")))?
                .add_pixel(pixel);
        }
    }

    let mut diagnostics = Vec::new();
    let stats = accumulators
        .into_iter()
        .map(|(label, acc)| {
            if acc.count() == 0 {
                tracing::warn!(mask = label, "mask region covers no pixels");
                diagnostics.push(Diagnostic::EmptyRegion {
                    mask: label.to_string(),
                });
            }
            (label.to_string(), acc.finalize())
        })
        .collect();

    Ok(RegionAnalysis { stats, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::palette::PALETTE;

    fn packed(metalness: u8, glossiness: u8) -> u32 {
        u32::from_le_bytes([metalness, 0x7F, 0x7F, glossiness])
    }

    #[test]
    fn accumulator_normalizes_and_rounds() {
        let mut acc = StatsAccumulator::new();
        acc.add_pixel(packed(0, 255));
        acc.add_pixel(packed(64, 255));
        acc.add_pixel(packed(128, 255));
        acc.add_pixel(packed(255, 255));

        let stats = acc.finalize();
        assert_eq!(stats.metalness_min, 0.0);
        assert_eq!(stats.metalness_max, 1.0);
        // (0 + 64 + 128 + 255) / (4 * 255) = 0.438... -> 0.44
        assert_eq!(stats.metalness_average, 0.44);
        assert_eq!(stats.glossiness_min, 1.0);
        assert_eq!(stats.glossiness_average, 1.0);
    }

    #[test]
    fn accumulation_is_order_independent() {
        let pixels = [packed(3, 9), packed(200, 17), packed(90, 255), packed(0, 0)];

        let mut forward = StatsAccumulator::new();
        let mut backward = StatsAccumulator::new();
        for p in pixels {
            forward.add_pixel(p);
        }
        for p in pixels.iter().rev() {
            backward.add_pixel(*p);
        }

        assert_eq!(forward.finalize(), backward.finalize());
    }

    #[test]
    fn zero_pixel_region_finalizes_to_zeros() {
        let stats = StatsAccumulator::new().finalize();
        assert_eq!(stats, MaterialStats::default());
    }

    #[test]
    fn stats_serialize_with_pascal_case_keys() {
        let mut acc = StatsAccumulator::new();
        acc.add_pixel(packed(255, 0));
        let json = serde_json::to_value(acc.finalize()).unwrap();
        assert_eq!(json["MetalnessMax"], 1.0);
        assert_eq!(json["GlossinessAverage"], 0.0);
    }

    #[test]
    fn analyze_folds_pixels_per_label() {
        let mut color_map = ColorMap::new();
        color_map.insert(PALETTE[1], "MASK_a");
        color_map.insert(PALETTE[2], "MASK_b");

        let mut mask = RasterBuffer::new(2, 1);
        mask.set_pixel(0, 0, PALETTE[1].0).unwrap();
        mask.set_pixel(1, 0, PALETTE[2].0).unwrap();

        let mut input = RasterBuffer::new(2, 1);
        input.set_pixel(0, 0, packed(255, 0)).unwrap();
        input.set_pixel(1, 0, packed(0, 255)).unwrap();

        let analysis = analyze_regions(&input, &mask, &color_map).unwrap();
        assert_eq!(analysis.stats["MASK_a"].metalness_average, 1.0);
        assert_eq!(analysis.stats["MASK_b"].glossiness_average, 1.0);
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn region_with_no_coverage_yields_diagnostic() {
        let mut color_map = ColorMap::new();
        color_map.insert(PALETTE[1], "MASK_a");
        color_map.insert(PALETTE[2], "MASK_unused");

        let mut mask = RasterBuffer::new(1, 1);
        mask.set_pixel(0, 0, PALETTE[1].0).unwrap();
        let input = RasterBuffer::new(1, 1);

        let analysis = analyze_regions(&input, &mask, &color_map).unwrap();
        assert_eq!(analysis.stats["MASK_unused"], MaterialStats::default());
        assert_eq!(
            analysis.diagnostics,
            vec![Diagnostic::EmptyRegion {
                mask: "MASK_unused".to_string()
            }]
        );
    }

    #[test]
    fn unmapped_mask_color_is_fatal() {
        let mut color_map = ColorMap::new();
        color_map.insert(PALETTE[1], "MASK_a");

        let mask = RasterBuffer::new(1, 1); // zero pixel, not in the map
        let input = RasterBuffer::new(1, 1);

        let err = analyze_regions(&input, &mask, &color_map).unwrap_err();
        assert!(matches!(err, PbrError::UnmappedMaskColor { x: 0, y: 0, .. }));
    }

    #[test]
    fn dimension_mismatch_is_fatal() {
        let color_map = ColorMap::new();
        let err =
            analyze_regions(&RasterBuffer::new(1, 1), &RasterBuffer::new(2, 1), &color_map)
                .unwrap_err();
        assert!(matches!(err, PbrError::DimensionMismatch { .. }));
    }
}
