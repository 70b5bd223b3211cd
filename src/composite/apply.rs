use std::collections::BTreeMap;

use crate::foundation::color::{MaskColor, glossiness, metalness, set_properties};
use crate::foundation::error::{PbrError, PbrResult};
use crate::foundation::raster::RasterBuffer;
use crate::material::model::Material;

/// Rewrite both packed channels of one pixel under a material descriptor.
///
/// The channel is multiplied first (skipped for the identity multiplier),
/// rounded and clamped to `[0, 255]`, then clamped to the material's 8-bit
/// bounds. Bytes 1-2 pass through untouched.
pub fn apply_material(pixel: u32, material: &Material) -> u32 {
    let mut metal = metalness(pixel);
    let mut gloss = glossiness(pixel);

    if material.metalness_multiplier != 1.0 {
        metal = (f64::from(metal) * material.metalness_multiplier)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    if material.glossiness_multiplier != 1.0 {
        gloss = (f64::from(gloss) * material.glossiness_multiplier)
            .round()
            .clamp(0.0, 255.0) as u8;
    }

    metal = metal.clamp(material.metalness_min_byte, material.metalness_max_byte);
    gloss = gloss.clamp(material.glossiness_min_byte, material.glossiness_max_byte);

    set_properties(pixel, metal, gloss)
}

/// Rewrite a packed material image in place under the per-color materials.
///
/// Dimensions are validated before any pixel is mutated; an unmapped mask
/// color aborts the rewrite. Callers persist the buffer only after this
/// returns `Ok`.
#[tracing::instrument(skip_all, fields(width = input.width(), height = input.height()))]
pub fn apply_materials(
    input: &mut RasterBuffer,
    mask: &RasterBuffer,
    materials: &BTreeMap<MaskColor, Material>,
) -> PbrResult<()> {
    input.ensure_same_dimensions(mask, "input image vs mask image")?;

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let mask_color = MaskColor(mask.pixel(x, y)?);
            let material =
                materials
                    .get(&mask_color)
                    .ok_or_else(|| PbrError::UnmappedMaskColor {
                        color: mask_color.to_hex(),
                        x,
                        y,
                    })?;

            let pixel = input.pixel(x, y)?;
            input.set_pixel(x, y, apply_material(pixel, material))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::palette::PALETTE;

    fn packed(metalness: u8, glossiness: u8) -> u32 {
        u32::from_le_bytes([metalness, 0x55, 0xAA, glossiness])
    }

    #[test]
    fn clamps_to_material_bounds() {
        // metalnessMin=0, metalnessMax=0.5, multiplier=1
        let material = Material::new(0.0, 0.5, 1.0, None, 0.0, 1.0, 1.0, None);

        let inputs = [0u8, 64, 128, 255];
        let expected = [0u8, 64, 127, 127];
        for (input, expected) in inputs.into_iter().zip(expected) {
            let out = apply_material(packed(input, 0), &material);
            assert_eq!(metalness(out), expected);
        }
    }

    #[test]
    fn multiplies_then_clamps() {
        let material = Material::new(0.1, 0.9, 2.0, None, 0.0, 1.0, 0.25, None);

        let out = apply_material(packed(100, 100), &material);
        // round(100 * 2.0) = 200, clamped to [26, 229] -> 200
        assert_eq!(metalness(out), 200);
        // round(100 * 0.25) = 25, full bounds -> 25
        assert_eq!(glossiness(out), 25);

        let out = apply_material(packed(200, 200), &material);
        // round(200 * 2.0) = 400 saturates at 255, then clamps to max byte 229
        assert_eq!(metalness(out), 229);
    }

    #[test]
    fn identity_multiplier_skips_rounding() {
        let material = Material::new(0.0, 1.0, 1.0, None, 0.0, 1.0, 1.0, None);
        let out = apply_material(packed(123, 45), &material);
        assert_eq!(metalness(out), 123);
        assert_eq!(glossiness(out), 45);
    }

    #[test]
    fn middle_bytes_pass_through() {
        let material = Material::new(0.0, 0.1, 3.0, None, 0.2, 0.8, 0.5, None);
        let out = apply_material(packed(250, 3), &material);
        assert_eq!(out.to_le_bytes()[1], 0x55);
        assert_eq!(out.to_le_bytes()[2], 0xAA);
    }

    #[test]
    fn rewrites_every_masked_pixel_in_place() {
        let materials: BTreeMap<MaskColor, Material> = [(
            PALETTE[1],
            Material::new(0.0, 0.5, 1.0, None, 0.0, 1.0, 1.0, None),
        )]
        .into_iter()
        .collect();

        let mut mask = RasterBuffer::new(2, 2);
        let mut input = RasterBuffer::new(2, 2);
        let bytes = [0u8, 64, 128, 255];
        for (i, byte) in bytes.into_iter().enumerate() {
            let (x, y) = (i as u32 % 2, i as u32 / 2);
            mask.set_pixel(x, y, PALETTE[1].0).unwrap();
            input.set_pixel(x, y, packed(byte, byte)).unwrap();
        }

        apply_materials(&mut input, &mask, &materials).unwrap();

        let expected = [0u8, 64, 127, 127];
        for (i, expected) in expected.into_iter().enumerate() {
            let (x, y) = (i as u32 % 2, i as u32 / 2);
            assert_eq!(metalness(input.pixel(x, y).unwrap()), expected);
        }
    }

    #[test]
    fn unmapped_mask_color_is_fatal() {
        let materials = BTreeMap::new();
        let mask = RasterBuffer::new(1, 1);
        let mut input = RasterBuffer::new(1, 1);

        let err = apply_materials(&mut input, &mask, &materials).unwrap_err();
        assert!(matches!(err, PbrError::UnmappedMaskColor { .. }));
    }

    #[test]
    fn dimension_mismatch_is_fatal_before_any_write() {
        let materials = BTreeMap::new();
        let mask = RasterBuffer::new(2, 1);
        let mut input = RasterBuffer::new(1, 1);
        let before = input.clone();

        let err = apply_materials(&mut input, &mask, &materials).unwrap_err();
        assert!(matches!(err, PbrError::DimensionMismatch { .. }));
        assert_eq!(input, before);
    }
}
