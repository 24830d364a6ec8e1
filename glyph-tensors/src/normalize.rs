//! Scaling of font unit coordinates into model input range.

use crate::pen::PathPoint;

/// Divisor applied to every coordinate.
///
/// This is a fixed scale, not the font's units per em: values only land near
/// [-1, 1] for fonts designed on a 1000 unit em.
pub const COORD_DIVISOR: f32 = 1000.0;

/// Number of scalars each point contributes to a flattened sequence.
pub const VALUES_PER_POINT: usize = 2;

#[inline]
pub fn normalize(value: f32) -> f32 {
    value / COORD_DIVISOR
}

/// Yields `x, y` for each point in order, divided by [`COORD_DIVISOR`].
pub fn flatten(points: &[PathPoint]) -> impl Iterator<Item = f32> + '_ {
    points
        .iter()
        .flat_map(|point| [normalize(point.x), normalize(point.y)])
}

/// Number of values [`flatten`] yields for `points`.
pub fn flattened_len(points: &[PathPoint]) -> usize {
    points.len() * VALUES_PER_POINT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::PointKind;

    #[test]
    fn fixed_divisor() {
        let points = [PathPoint::new(500.0, -250.0, PointKind::Move)];
        assert_eq!(flatten(&points).collect::<Vec<_>>(), [0.5, -0.25]);
    }

    #[test]
    fn preserves_order() {
        let points = [
            PathPoint::new(1000.0, 2000.0, PointKind::Move),
            PathPoint::new(-3000.0, 0.0, PointKind::Line),
        ];
        assert_eq!(
            flatten(&points).collect::<Vec<_>>(),
            [1.0, 2.0, -3.0, 0.0]
        );
        assert_eq!(flattened_len(&points), 4);
    }

    #[test]
    fn ignores_units_per_em() {
        // A 2048 unit em is not rescaled to fit.
        assert_eq!(normalize(2048.0), 2.048);
    }
}
