//! TrueType style outline to pen conversion for simple `glyf` glyphs.

use skrifa::{
    outline::OutlinePen,
    raw::{
        tables::glyf::{CurvePoint, SimpleGlyph},
        ReadError,
    },
};

/// Draws the contours of a simple glyph in font units.
///
/// Only the `glyf` data is needed, so this works for fonts whose metrics
/// tables are missing or broken.
pub(crate) fn draw_simple(
    glyph: &SimpleGlyph,
    pen: &mut impl OutlinePen,
) -> Result<(), ReadError> {
    let points = glyph.points().collect::<Vec<_>>();
    let mut start = 0;
    for end in glyph.end_pts_of_contours() {
        let end = end.get() as usize;
        if end < start || end >= points.len() {
            return Err(ReadError::MalformedData(
                "contour end point out of order or past the last point",
            ));
        }
        draw_contour(&points[start..=end], pen);
        start = end + 1;
    }
    Ok(())
}

/// Emits one closed contour.
///
/// A contour starting off curve begins at its last point when that is on
/// curve, and at the midpoint of the last and first points otherwise.
/// Consecutive off curve points have an implied on curve point between them.
fn draw_contour(points: &[CurvePoint], pen: &mut impl OutlinePen) {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return;
    };
    let (start, rest) = if first.on_curve {
        (coords(first), &points[1..])
    } else if last.on_curve {
        (coords(last), &points[..points.len() - 1])
    } else {
        (midpoint(coords(last), coords(first)), points)
    };
    pen.move_to(start.0, start.1);
    let mut pending: Option<(f32, f32)> = None;
    for point in rest {
        let (x, y) = coords(point);
        match (pending, point.on_curve) {
            (None, true) => pen.line_to(x, y),
            (None, false) => pending = Some((x, y)),
            (Some((cx, cy)), true) => {
                pen.quad_to(cx, cy, x, y);
                pending = None;
            }
            (Some((cx, cy)), false) => {
                let (mx, my) = midpoint((cx, cy), (x, y));
                pen.quad_to(cx, cy, mx, my);
                pending = Some((x, y));
            }
        }
    }
    if let Some((cx, cy)) = pending {
        pen.quad_to(cx, cy, start.0, start.1);
    }
    pen.close();
}

fn coords(point: &CurvePoint) -> (f32, f32) {
    (point.x as f32, point.y as f32)
}

fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
