//! Style vectors attached to each font record.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::describe::FontDescription;

/// Length of every style vector.
pub const STYLE_VECTOR_LEN: usize = 256;

/// Produces the style vector for a font from its description.
pub trait StyleEncoder {
    fn encode(&self, description: &FontDescription) -> Vec<f32>;
}

/// Placeholder encoder that ignores the description and returns standard
/// normal noise.
///
/// The values carry no information about the font. Replace this with a real
/// encoder once one exists.
#[derive(Clone, Debug, Default)]
pub struct PlaceholderStyle {
    seed: Option<u64>,
}

impl PlaceholderStyle {
    /// Every call produces the same vector for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl StyleEncoder for PlaceholderStyle {
    fn encode(&self, _description: &FontDescription) -> Vec<f32> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // Box-Muller transform, two samples per pair of uniforms
        let mut values = Vec::with_capacity(STYLE_VECTOR_LEN);
        while values.len() < STYLE_VECTOR_LEN {
            // (0, 1] so the logarithm stays finite
            let u1: f32 = 1.0 - rng.gen::<f32>();
            let u2: f32 = rng.gen();
            let radius = (-2.0 * u1.ln()).sqrt();
            let angle = std::f32::consts::TAU * u2;
            values.push(radius * angle.cos());
            if values.len() < STYLE_VECTOR_LEN {
                values.push(radius * angle.sin());
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_length() {
        let style = PlaceholderStyle::default().encode(&FontDescription::default());
        assert_eq!(style.len(), STYLE_VECTOR_LEN);
        assert!(style.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn seeded_is_repeatable() {
        let description = FontDescription::default();
        let style = PlaceholderStyle::seeded(7);
        assert_eq!(style.encode(&description), style.encode(&description));
        assert_ne!(
            style.encode(&description),
            PlaceholderStyle::seeded(8).encode(&description)
        );
    }
}
