//! Extraction of typed points from glyph outlines.

use std::ops::Range;

use serde::Serialize;
use skrifa::{outline::pen::OutlinePen, GlyphId};

use crate::{font::OutlineSource, GlyphError};

/// Role of a point within its outline segment.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Move,
    Line,
    Control1,
    Control2,
    CurveEnd,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
    pub kind: PointKind,
}

impl PathPoint {
    pub fn new(x: f32, y: f32, kind: PointKind) -> Self {
        Self { x, y, kind }
    }
}

/// Points of one glyph in decode order, split into contours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphOutline {
    points: Vec<PathPoint>,
    contours: Vec<Range<usize>>,
}

impl GlyphOutline {
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    pub fn contours(&self) -> impl Iterator<Item = &[PathPoint]> + '_ {
        self.contours
            .iter()
            .map(|range| &self.points[range.clone()])
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Draws the glyph from `source` and collects its points.
pub fn extract_outline(
    source: &impl OutlineSource,
    glyph_id: GlyphId,
) -> Result<GlyphOutline, GlyphError> {
    let mut pen = PointPen::default();
    source.draw(glyph_id, &mut pen)?;
    Ok(pen.finish())
}

/// Pen that records every drawing command as typed points.
///
/// Each cubic segment yields exactly three points. Quadratic segments are
/// elevated to cubics so they yield three points as well. Close commands
/// produce nothing; a contour ends at the next move or when the outline is
/// finished.
#[derive(Default)]
pub struct PointPen {
    points: Vec<PathPoint>,
    contours: Vec<Range<usize>>,
    open: Option<usize>,
    current: (f32, f32),
    start: (f32, f32),
}

impl PointPen {
    /// Finalizes any open contour and returns the collected outline.
    pub fn finish(mut self) -> GlyphOutline {
        self.close_contour();
        GlyphOutline {
            points: self.points,
            contours: self.contours,
        }
    }

    fn close_contour(&mut self) {
        if let Some(start) = self.open.take() {
            if start < self.points.len() {
                self.contours.push(start..self.points.len());
            }
        }
    }

    fn push(&mut self, x: f32, y: f32, kind: PointKind) {
        // Segments without a preceding move still open a contour.
        if self.open.is_none() {
            self.open = Some(self.points.len());
        }
        self.points.push(PathPoint::new(x, y, kind));
        self.current = (x, y);
    }
}

impl OutlinePen for PointPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.close_contour();
        self.start = (x, y);
        self.push(x, y, PointKind::Move);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y, PointKind::Line);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        const TWO_THIRDS: f32 = 2.0 / 3.0;
        let (x0, y0) = self.current;
        let cx1 = x0 + TWO_THIRDS * (cx0 - x0);
        let cy1 = y0 + TWO_THIRDS * (cy0 - y0);
        let cx2 = x + TWO_THIRDS * (cx0 - x);
        let cy2 = y + TWO_THIRDS * (cy0 - y);
        self.curve_to(cx1, cy1, cx2, cy2, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.push(cx0, cy0, PointKind::Control1);
        self.push(cx1, cy1, PointKind::Control2);
        self.push(x, y, PointKind::CurveEnd);
    }

    fn close(&mut self) {
        self.current = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PointKind::*;

    fn kinds(outline: &GlyphOutline) -> Vec<PointKind> {
        outline.points().iter().map(|p| p.kind).collect()
    }

    #[test]
    fn moves_split_contours() {
        let mut pen = PointPen::default();
        pen.move_to(0.0, 0.0);
        pen.line_to(100.0, 0.0);
        pen.line_to(100.0, 100.0);
        pen.close();
        pen.move_to(10.0, 10.0);
        pen.line_to(20.0, 20.0);
        pen.close();
        let outline = pen.finish();
        assert_eq!(outline.contour_count(), 2);
        let lens = outline.contours().map(|c| c.len()).collect::<Vec<_>>();
        assert_eq!(lens, [3, 2]);
        assert_eq!(kinds(&outline), [Move, Line, Line, Move, Line]);
        assert_eq!(outline.contours().nth(1).unwrap()[0].x, 10.0);
    }

    #[test]
    fn cubic_emits_three_points() {
        let mut pen = PointPen::default();
        pen.move_to(0.0, 0.0);
        pen.curve_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        pen.curve_to(7.0, 8.0, 9.0, 10.0, 11.0, 12.0);
        let outline = pen.finish();
        assert_eq!(
            kinds(&outline),
            [Move, Control1, Control2, CurveEnd, Control1, Control2, CurveEnd]
        );
        assert_eq!(
            outline.points()[1..4],
            [
                PathPoint::new(1.0, 2.0, Control1),
                PathPoint::new(3.0, 4.0, Control2),
                PathPoint::new(5.0, 6.0, CurveEnd),
            ]
        );
    }

    #[test]
    fn quad_is_elevated_to_cubic() {
        let mut pen = PointPen::default();
        pen.move_to(0.0, 0.0);
        pen.quad_to(300.0, 600.0, 600.0, 0.0);
        let outline = pen.finish();
        assert_eq!(kinds(&outline), [Move, Control1, Control2, CurveEnd]);
        let points = outline.points();
        assert_eq!((points[1].x, points[1].y), (200.0, 400.0));
        assert_eq!((points[2].x, points[2].y), (400.0, 400.0));
        assert_eq!((points[3].x, points[3].y), (600.0, 0.0));
    }

    #[test]
    fn quad_after_close_starts_from_contour_start() {
        let mut pen = PointPen::default();
        pen.move_to(0.0, 0.0);
        pen.line_to(90.0, 0.0);
        pen.close();
        pen.quad_to(0.0, 90.0, 0.0, 0.0);
        let outline = pen.finish();
        // Control point is 2/3 of the way from (0, 0) to (0, 90).
        assert_eq!((outline.points()[2].x, outline.points()[2].y), (0.0, 60.0));
    }

    #[test]
    fn empty_outline_has_no_contours() {
        let mut pen = PointPen::default();
        pen.close();
        let outline = pen.finish();
        assert!(outline.is_empty());
        assert_eq!(outline.contour_count(), 0);
    }

    #[test]
    fn line_without_move_opens_contour() {
        let mut pen = PointPen::default();
        pen.line_to(1.0, 1.0);
        pen.move_to(2.0, 2.0);
        let outline = pen.finish();
        assert_eq!(outline.contour_count(), 2);
        assert_eq!(kinds(&outline), [Line, Move]);
    }
}
