/// Convenience result type used across the crate.
pub type PbrResult<T> = Result<T, PbrError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every error is fatal to the image being processed; no pass writes partial
/// output. Retries, if any, belong to an external orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum PbrError {
    /// A mask layer does not carry exactly 4 channels.
    #[error("layer '{label}' has {channels} channels, only 4-channel layers are supported")]
    UnsupportedChannelCount {
        /// Label of the offending layer.
        label: String,
        /// Channel count the layer reported.
        channels: u32,
    },

    /// Two buffers expected to align do not share the same dimensions.
    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {width}x{height} ({context})")]
    DimensionMismatch {
        /// Width of the reference buffer.
        expected_width: u32,
        /// Height of the reference buffer.
        expected_height: u32,
        /// Width of the offending buffer.
        width: u32,
        /// Height of the offending buffer.
        height: u32,
        /// What was being compared.
        context: String,
    },

    /// More distinguishable mask regions were requested than the palette holds.
    #[error("mask palette exhausted: only up to {capacity} mask layers are supported")]
    PaletteExhausted {
        /// Fixed palette capacity.
        capacity: usize,
    },

    /// A mask pixel's color has no entry in the color map.
    #[error("could not map color {color} at ({x}, {y}) to a mask region")]
    UnmappedMaskColor {
        /// Offending color as a `#RRGGBB` hex string.
        color: String,
        /// Pixel x coordinate.
        x: u32,
        /// Pixel y coordinate.
        y: u32,
    },

    /// A configuration expression references a variable that is not defined.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// A mask-to-material assignment names a material that is not declared.
    #[error("undefined material '{0}'")]
    UndefinedMaterial(String),

    /// A discovered mask region has no material assigned to it.
    #[error("no material assigned to mask '{0}'")]
    MaterialNotAssignedToMask(String),

    /// A material declares a desired average but no statistics are available.
    #[error("material '{material}' for mask '{mask}' declares an average, but no statistics were found")]
    MissingRequiredStats {
        /// Material name declaring the desired average.
        material: String,
        /// Mask label the material is assigned to.
        mask: String,
    },

    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PbrError {
    /// Build a [`PbrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PbrError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`PbrError::DimensionMismatch`] from two buffer extents.
    pub fn dimension_mismatch(
        expected: (u32, u32),
        got: (u32, u32),
        context: impl Into<String>,
    ) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            width: got.0,
            height: got.1,
            context: context.into(),
        }
    }
}
