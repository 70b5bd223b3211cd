use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::foundation::error::{PbrError, PbrResult};
use crate::material::model::{Material, MaterialDefinition};

/// Root settings file consumed by the analyze and edit passes.
///
/// Keys follow the original tool's JSON wire format (PascalCase).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    /// Directory holding the packed material input images.
    pub input_directory: PathBuf,
    /// Directory rewritten images are written to.
    pub output_directory: PathBuf,
    /// Directory holding mask images, color maps, and statistics.
    pub mask_directory: PathBuf,
    /// Variable table referenced by material expressions.
    pub variables: BTreeMap<String, f64>,
    /// Declarative material definitions by material name.
    pub materials: BTreeMap<String, MaterialDefinition>,
    /// Per-image settings keyed by input file name.
    pub input: BTreeMap<String, ImageSettings>,
}

impl Settings {
    /// Resolve every material definition against the variable table.
    pub fn resolve_materials(&self) -> PbrResult<BTreeMap<String, Material>> {
        self.materials
            .iter()
            .map(|(name, def)| Ok((name.clone(), def.resolve(&self.variables)?)))
            .collect()
    }
}

/// Per-image settings: declared channel layout and mask assignments.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ImageSettings {
    /// Declared channel layout of the packed image.
    pub format: ImageFormat,
    /// Material name assigned to each mask label.
    pub mask_to_material: BTreeMap<String, String>,
}

/// Declared channel layout tag. Only [`ImageFormat::Rgba`] is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageFormat {
    /// 3-channel packed image (unsupported).
    #[serde(rename = "RGB")]
    Rgb,
    /// 4-channel packed image.
    #[default]
    #[serde(rename = "RGBA")]
    Rgba,
}

impl ImageFormat {
    /// Error unless this layout is the supported 4-channel one.
    pub fn ensure_supported(self, file_name: &str) -> PbrResult<()> {
        match self {
            Self::Rgba => Ok(()),
            Self::Rgb => Err(PbrError::UnsupportedChannelCount {
                label: file_name.to_string(),
                channels: 3,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_original_settings_shape() {
        let settings: Settings = serde_json::from_value(json!({
            "InputDirectory": "in",
            "OutputDirectory": "out",
            "MaskDirectory": "masks",
            "Variables": { "hull_metal": 0.8 },
            "Materials": {
                "steel": { "Metalness": "hull_metal", "GlossinessMax": 0.5 }
            },
            "Input": {
                "panel_SPC.png": {
                    "Format": "RGBA",
                    "MaskToMaterial": { "MASK_hull": "steel" }
                }
            }
        }))
        .unwrap();

        assert_eq!(settings.input_directory, PathBuf::from("in"));
        assert_eq!(settings.variables["hull_metal"], 0.8);
        assert_eq!(
            settings.input["panel_SPC.png"].mask_to_material["MASK_hull"],
            "steel"
        );
        assert_eq!(settings.input["panel_SPC.png"].format, ImageFormat::Rgba);

        let materials = settings.resolve_materials().unwrap();
        assert_eq!(materials["steel"].metalness_min, 0.8);
        assert_eq!(materials["steel"].metalness_max, 0.8);
        assert_eq!(materials["steel"].glossiness_max_byte, 127);
    }

    #[test]
    fn image_settings_default_to_rgba() {
        let image: ImageSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(image.format, ImageFormat::Rgba);
        assert!(image.mask_to_material.is_empty());
    }

    #[test]
    fn rgb_layout_is_rejected() {
        let err = ImageFormat::Rgb.ensure_supported("panel.png").unwrap_err();
        assert!(matches!(
            err,
            PbrError::UnsupportedChannelCount { channels: 3, .. }
        ));
    }

    #[test]
    fn unresolved_material_variable_is_fatal() {
        let settings: Settings = serde_json::from_value(json!({
            "Materials": { "steel": { "MetalnessMin": "missing" } }
        }))
        .unwrap();
        let err = settings.resolve_materials().unwrap_err();
        assert!(matches!(err, PbrError::UnknownVariable(name) if name == "missing"));
    }
}
