use std::collections::BTreeMap;

use crate::foundation::color::{MaskColor, alpha};
use crate::foundation::error::{PbrError, PbrResult};
use crate::foundation::raster::{Layer, RasterBuffer};
use crate::mask::palette::PaletteAllocator;

/// Label prefix marking a layer as a mask region.
pub const MASK_LABEL_PREFIX: &str = "MASK_";

/// Mapping from mask color to mask label for one image.
///
/// Serialized as a JSON object with `#RRGGBB` hex keys, one entry per
/// discovered mask region.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ColorMap {
    entries: BTreeMap<MaskColor, String>,
}

impl ColorMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a color→label entry.
    pub fn insert(&mut self, color: MaskColor, label: impl Into<String>) {
        self.entries.insert(color, label.into());
    }

    /// Label for a mask color, if the color is known.
    pub fn label(&self, color: MaskColor) -> Option<&str> {
        self.entries.get(&color).map(String::as_str)
    }

    /// Number of discovered mask regions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no mask regions were discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(color, label)` entries in color order.
    pub fn iter(&self) -> impl Iterator<Item = (MaskColor, &str)> {
        self.entries.iter().map(|(c, l)| (*c, l.as_str()))
    }

    /// Iterate the mask labels.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}

/// Result of flattening mask layers: the index image plus its color map.
#[derive(Clone, Debug)]
pub struct DecodedMask {
    /// Flat color-indexed mask image. Pixels not covered by any mask layer
    /// stay at zero (fully transparent black, "no material").
    pub mask: RasterBuffer,
    /// Color→label map for the mask image.
    pub color_map: ColorMap,
}

/// Flatten labeled mask layers into a single color-indexed mask image.
///
/// Layers are visited in input order. Unlabeled layers are skipped; labeled
/// layers without the [`MASK_LABEL_PREFIX`] are intentional pass-through
/// (provenance layers) and are ignored. Each mask layer is assigned the next
/// palette color and stamps it wherever its alpha coverage is nonzero, so
/// later mask layers overwrite earlier ones where coverage overlaps.
///
/// The first layer in the sequence defines the expected dimensions for all
/// mask layers.
#[tracing::instrument(skip(layers), fields(layer_count = layers.len()))]
pub fn decode_mask(layers: &[Layer]) -> PbrResult<DecodedMask> {
    let (width, height) = layers
        .first()
        .map(|layer| layer.buffer.dimensions())
        .unwrap_or((0, 0));

    let mut allocator = PaletteAllocator::new();
    let mut mask = RasterBuffer::new(width, height);
    let mut color_map = ColorMap::new();

    for layer in layers {
        let Some(label) = layer.label.as_deref() else {
            continue;
        };
        if !label.starts_with(MASK_LABEL_PREFIX) {
            continue;
        }

        if layer.channels != 4 {
            return Err(PbrError::UnsupportedChannelCount {
                label: label.to_string(),
                channels: layer.channels,
            });
        }
        if layer.buffer.dimensions() != (width, height) {
            return Err(PbrError::dimension_mismatch(
                (width, height),
                layer.buffer.dimensions(),
                format!("layer '{label}'"),
            ));
        }

        let color = allocator.next()?;
        for y in 0..height {
            for x in 0..width {
                if alpha(layer.buffer.pixel(x, y)?) > 0 {
                    mask.set_pixel(x, y, color.0)?;
                }
            }
        }

        tracing::debug!(color = %color, label, "mask layer flattened");
        color_map.insert(color, label);
    }

    Ok(DecodedMask { mask, color_map })
}
