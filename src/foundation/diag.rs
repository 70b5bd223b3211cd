/// A non-fatal condition observed by a pass.
///
/// The core never prints; it returns diagnostics so callers can log, ignore,
/// or fail strictly.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Diagnostic {
    /// A measured average was statistically indistinguishable from zero, so
    /// multiplier normalization was skipped for this property.
    AverageTooSmall {
        /// Mask label the statistics belong to.
        mask: String,
        /// Property name (`"metalness"` or `"glossiness"`).
        property: &'static str,
    },
    /// A mask region appeared in the color map but covered zero pixels, so
    /// its statistics finalized to all zeros.
    EmptyRegion {
        /// Mask label with no observed pixels.
        mask: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AverageTooSmall { mask, property } => write!(
                f,
                "measured {property} average for mask '{mask}' is too small or zero, keeping configured multiplier"
            ),
            Self::EmptyRegion { mask } => {
                write!(f, "mask '{mask}' covers no pixels, statistics are all zero")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_mask() {
        let d = Diagnostic::AverageTooSmall {
            mask: "MASK_hull".to_string(),
            property: "metalness",
        };
        assert!(d.to_string().contains("MASK_hull"));
        assert!(d.to_string().contains("metalness"));
    }
}
