use std::collections::BTreeMap;

use crate::foundation::color::unit_to_byte;
use crate::foundation::error::{PbrError, PbrResult};

/// A numeric expression leaf: either a literal constant or a reference into
/// the settings variable table.
///
/// Serialized symmetrically: a JSON number is a constant, a JSON string is a
/// variable name.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Literal number.
    Constant(f64),
    /// Named reference into the variable table.
    Variable(String),
}

impl Value {
    /// Resolve to a number against the variable table.
    pub fn resolve(&self, variables: &BTreeMap<String, f64>) -> PbrResult<f64> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Variable(name) => variables
                .get(name)
                .copied()
                .ok_or_else(|| PbrError::UnknownVariable(name.clone())),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Constant(value) => serializer.serialize_f64(*value),
            Self::Variable(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(Self::Constant(value)),
            Repr::Name(name) => Ok(Self::Variable(name)),
        }
    }
}

fn zero() -> Value {
    Value::Constant(0.0)
}

fn one() -> Value {
    Value::Constant(1.0)
}

/// Declarative per-material settings, mirrored for both packed properties.
///
/// Each field is a [`Value`] expression; `metalness`/`glossiness` pin a target
/// value inside the min/max bracket, and the optional averages request
/// multiplier normalization against measured statistics.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MaterialDefinition {
    /// Optional target metalness value.
    pub metalness: Option<Value>,
    /// Lower metalness bound, defaults to 0.
    pub metalness_min: Value,
    /// Upper metalness bound, defaults to 1.
    pub metalness_max: Value,
    /// Metalness multiplier, defaults to 1.
    pub metalness_multiplier: Value,
    /// Desired metalness average, if normalization is requested.
    pub metalness_average: Option<Value>,
    /// Optional target glossiness value.
    pub glossiness: Option<Value>,
    /// Lower glossiness bound, defaults to 0.
    pub glossiness_min: Value,
    /// Upper glossiness bound, defaults to 1.
    pub glossiness_max: Value,
    /// Glossiness multiplier, defaults to 1.
    pub glossiness_multiplier: Value,
    /// Desired glossiness average, if normalization is requested.
    pub glossiness_average: Option<Value>,
}

impl Default for MaterialDefinition {
    fn default() -> Self {
        Self {
            metalness: None,
            metalness_min: zero(),
            metalness_max: one(),
            metalness_multiplier: one(),
            metalness_average: None,
            glossiness: None,
            glossiness_min: zero(),
            glossiness_max: one(),
            glossiness_multiplier: one(),
            glossiness_average: None,
        }
    }
}

impl MaterialDefinition {
    /// Resolve all expressions against the variable table into a concrete
    /// [`Material`].
    ///
    /// A target value narrows the bracket with clamp-not-reject semantics:
    /// the lower bound widens to `max(min, target)` and the upper bound
    /// narrows to `min(max, target)`.
    pub fn resolve(&self, variables: &BTreeMap<String, f64>) -> PbrResult<Material> {
        let resolve_opt = |value: &Option<Value>| -> PbrResult<Option<f64>> {
            value.as_ref().map(|v| v.resolve(variables)).transpose()
        };

        let metalness = resolve_opt(&self.metalness)?;
        let glossiness = resolve_opt(&self.glossiness)?;

        Ok(Material::new(
            self.metalness_min
                .resolve(variables)?
                .max(metalness.unwrap_or(0.0)),
            self.metalness_max
                .resolve(variables)?
                .min(metalness.unwrap_or(1.0)),
            self.metalness_multiplier.resolve(variables)?,
            resolve_opt(&self.metalness_average)?,
            self.glossiness_min
                .resolve(variables)?
                .max(glossiness.unwrap_or(0.0)),
            self.glossiness_max
                .resolve(variables)?
                .min(glossiness.unwrap_or(1.0)),
            self.glossiness_multiplier.resolve(variables)?,
            resolve_opt(&self.glossiness_average)?,
        ))
    }

    /// True when either property requests multiplier normalization.
    pub fn has_average(&self) -> bool {
        self.metalness_average.is_some() || self.glossiness_average.is_some()
    }
}

/// A concrete, fully resolved material descriptor.
///
/// Min/max are additionally materialized as 8-bit clamp bounds for use during
/// compositing. Rebuilt every run from configuration plus optional
/// statistics; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Lower metalness bound in `[0, 1]`.
    pub metalness_min: f64,
    /// Upper metalness bound in `[0, 1]`.
    pub metalness_max: f64,
    /// Metalness channel multiplier.
    pub metalness_multiplier: f64,
    /// Desired metalness average awaiting normalization, if any.
    pub metalness_average: Option<f64>,
    /// Lower glossiness bound in `[0, 1]`.
    pub glossiness_min: f64,
    /// Upper glossiness bound in `[0, 1]`.
    pub glossiness_max: f64,
    /// Glossiness channel multiplier.
    pub glossiness_multiplier: f64,
    /// Desired glossiness average awaiting normalization, if any.
    pub glossiness_average: Option<f64>,
    /// `metalness_min` as an 8-bit clamp bound.
    pub metalness_min_byte: u8,
    /// `metalness_max` as an 8-bit clamp bound.
    pub metalness_max_byte: u8,
    /// `glossiness_min` as an 8-bit clamp bound.
    pub glossiness_min_byte: u8,
    /// `glossiness_max` as an 8-bit clamp bound.
    pub glossiness_max_byte: u8,
}

impl Material {
    /// Build a descriptor, materializing the 8-bit clamp bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metalness_min: f64,
        metalness_max: f64,
        metalness_multiplier: f64,
        metalness_average: Option<f64>,
        glossiness_min: f64,
        glossiness_max: f64,
        glossiness_multiplier: f64,
        glossiness_average: Option<f64>,
    ) -> Self {
        Self {
            metalness_min,
            metalness_max,
            metalness_multiplier,
            metalness_average,
            glossiness_min,
            glossiness_max,
            glossiness_multiplier,
            glossiness_average,
            metalness_min_byte: unit_to_byte(metalness_min),
            metalness_max_byte: unit_to_byte(metalness_max),
            glossiness_min_byte: unit_to_byte(glossiness_min),
            glossiness_max_byte: unit_to_byte(glossiness_max),
        }
    }

    /// True when either property still carries a desired average.
    pub fn has_average(&self) -> bool {
        self.metalness_average.is_some() || self.glossiness_average.is_some()
    }
}
