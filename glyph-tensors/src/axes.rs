//! Encoding of variation axes.

use serde::Serialize;
use skrifa::Tag;

use crate::normalize::normalize;

/// Value emitted in place of axis data for fonts without variations.
pub const NO_AXES_SENTINEL: f32 = 0.0;

/// An axis from the `fvar` table, in user space units.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariationAxis {
    #[serde(serialize_with = "serialize_tag")]
    pub tag: Tag,
    /// Name id of the axis name in the `name` table.
    pub name_id: u16,
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

impl VariationAxis {
    pub fn new(tag: Tag, name_id: u16, min: f32, default: f32, max: f32) -> Self {
        if !(min <= default && default <= max) {
            log::warn!("axis {tag} has unordered values min {min}, default {default}, max {max}");
        }
        Self {
            tag,
            name_id,
            min,
            default,
            max,
        }
    }
}

fn serialize_tag<S: serde::Serializer>(tag: &Tag, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(tag)
}

/// Flattens axes into `min, default, max` triples scaled like coordinates.
///
/// An empty axis list encodes as `[0.0]`, never as an empty vector.
pub fn encode_axes(axes: &[VariationAxis]) -> Vec<f32> {
    if axes.is_empty() {
        return vec![NO_AXES_SENTINEL];
    }
    axes.iter()
        .flat_map(|axis| {
            [
                normalize(axis.min),
                normalize(axis.default),
                normalize(axis.max),
            ]
        })
        .collect()
}
