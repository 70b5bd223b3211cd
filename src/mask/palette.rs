use crate::foundation::color::MaskColor;
use crate::foundation::error::{PbrError, PbrResult};

/// The fixed ordered palette of mask colors, hand-picked for maximal pairwise
/// visual distinctness. Bounds how many mask regions one image can carry.
pub const PALETTE: [MaskColor; 64] = [
    MaskColor::opaque(0x00, 0x00, 0x00),
    MaskColor::opaque(0x00, 0xFF, 0x00),
    MaskColor::opaque(0x00, 0x00, 0xFF),
    MaskColor::opaque(0xFF, 0x00, 0x00),
    MaskColor::opaque(0x01, 0xFF, 0xFE),
    MaskColor::opaque(0xFF, 0xA6, 0xFE),
    MaskColor::opaque(0xFF, 0xDB, 0x66),
    MaskColor::opaque(0x00, 0x64, 0x01),
    MaskColor::opaque(0x01, 0x00, 0x67),
    MaskColor::opaque(0x95, 0x00, 0x3A),
    MaskColor::opaque(0x00, 0x7D, 0xB5),
    MaskColor::opaque(0xFF, 0x00, 0xF6),
    MaskColor::opaque(0xFF, 0xEE, 0xE8),
    MaskColor::opaque(0x77, 0x4D, 0x00),
    MaskColor::opaque(0x90, 0xFB, 0x92),
    MaskColor::opaque(0x00, 0x76, 0xFF),
    MaskColor::opaque(0xD5, 0xFF, 0x00),
    MaskColor::opaque(0xFF, 0x93, 0x7E),
    MaskColor::opaque(0x6A, 0x82, 0x6C),
    MaskColor::opaque(0xFF, 0x02, 0x9D),
    MaskColor::opaque(0xFE, 0x89, 0x00),
    MaskColor::opaque(0x7A, 0x47, 0x82),
    MaskColor::opaque(0x7E, 0x2D, 0xD2),
    MaskColor::opaque(0x85, 0xA9, 0x00),
    MaskColor::opaque(0xFF, 0x00, 0x56),
    MaskColor::opaque(0xA4, 0x24, 0x00),
    MaskColor::opaque(0x00, 0xAE, 0x7E),
    MaskColor::opaque(0x68, 0x3D, 0x3B),
    MaskColor::opaque(0xBD, 0xC6, 0xFF),
    MaskColor::opaque(0x26, 0x34, 0x00),
    MaskColor::opaque(0xBD, 0xD3, 0x93),
    MaskColor::opaque(0x00, 0xB9, 0x17),
    MaskColor::opaque(0x9E, 0x00, 0x8E),
    MaskColor::opaque(0x00, 0x15, 0x44),
    MaskColor::opaque(0xC2, 0x8C, 0x9F),
    MaskColor::opaque(0xFF, 0x74, 0xA3),
    MaskColor::opaque(0x01, 0xD0, 0xFF),
    MaskColor::opaque(0x00, 0x47, 0x54),
    MaskColor::opaque(0xE5, 0x6F, 0xFE),
    MaskColor::opaque(0x78, 0x82, 0x31),
    MaskColor::opaque(0x0E, 0x4C, 0xA1),
    MaskColor::opaque(0x91, 0xD0, 0xCB),
    MaskColor::opaque(0xBE, 0x99, 0x70),
    MaskColor::opaque(0x96, 0x8A, 0xE8),
    MaskColor::opaque(0xBB, 0x88, 0x00),
    MaskColor::opaque(0x43, 0x00, 0x2C),
    MaskColor::opaque(0xDE, 0xFF, 0x74),
    MaskColor::opaque(0x00, 0xFF, 0xC6),
    MaskColor::opaque(0xFF, 0xE5, 0x02),
    MaskColor::opaque(0x62, 0x0E, 0x00),
    MaskColor::opaque(0x00, 0x8F, 0x9C),
    MaskColor::opaque(0x98, 0xFF, 0x52),
    MaskColor::opaque(0x75, 0x44, 0xB1),
    MaskColor::opaque(0xB5, 0x00, 0xFF),
    MaskColor::opaque(0x00, 0xFF, 0x78),
    MaskColor::opaque(0xFF, 0x6E, 0x41),
    MaskColor::opaque(0x00, 0x5F, 0x39),
    MaskColor::opaque(0x6B, 0x68, 0x82),
    MaskColor::opaque(0x5F, 0xAD, 0x4E),
    MaskColor::opaque(0xA7, 0x57, 0x40),
    MaskColor::opaque(0xA5, 0xFF, 0xD2),
    MaskColor::opaque(0xFF, 0xB1, 0x67),
    MaskColor::opaque(0x00, 0x9B, 0xFF),
    MaskColor::opaque(0xE8, 0x5E, 0xBE),
];

/// Hands out palette colors in fixed order, one per discovered mask region.
///
/// Allocation order is the only contract: callers must request colors in a
/// stable label-discovery order so repeated runs over unchanged input assign
/// identical colors. There is no reuse or removal; requesting more colors
/// than the palette holds is [`PbrError::PaletteExhausted`].
#[derive(Debug, Default)]
pub struct PaletteAllocator {
    cursor: usize,
}

impl PaletteAllocator {
    /// Allocator positioned at the first palette entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unused palette color.
    pub fn next(&mut self) -> PbrResult<MaskColor> {
        let color = *PALETTE.get(self.cursor).ok_or(PbrError::PaletteExhausted {
            capacity: PALETTE.len(),
        })?;
        self.cursor += 1;
        Ok(color)
    }

    /// How many colors have been handed out.
    pub fn allocated(&self) -> usize {
        self.cursor
    }
}
