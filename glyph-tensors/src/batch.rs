//! Packing glyph outlines into a rectangular tensor.
//!
//! Batching makes two passes over the outline table. The first measures the
//! flattened length of every eligible glyph to find the row width; the second
//! extracts each glyph again and writes it, zero padded, into its row of a
//! matrix allocated up front. Rows are addressed by their position in the
//! eligible set so the result does not depend on worker scheduling.

use rayon::prelude::*;
use serde::Serialize;
use skrifa::GlyphId;

use crate::{
    font::OutlineSource,
    normalize::{flatten, flattened_len},
    pen::extract_outline,
    GlyphError,
};

/// Row-major matrix of normalized glyph coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GlyphTensor {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
    glyph_ids: Vec<u32>,
    lengths: Vec<usize>,
}

impl GlyphTensor {
    /// `[rows, cols]`; `[0, 0]` when no glyph was eligible.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        (index < self.rows).then(|| &self.data[index * self.cols..(index + 1) * self.cols])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).filter_map(|ix| self.row(ix))
    }

    /// Glyph id of each row.
    pub fn glyph_ids(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.glyph_ids.iter().map(|gid| GlyphId::new(*gid))
    }

    /// Number of values in each row before padding starts.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }
}

/// Why a glyph contributed no row.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchDiagnostics {
    pub glyph_count: u32,
    pub rows: usize,
    pub max_values: usize,
    /// Glyphs with zero contours or no drawable points.
    pub skipped_empty: usize,
    /// Glyphs with a negative contour count.
    pub skipped_composite: usize,
    pub failed: Vec<FailedGlyph>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailedGlyph {
    pub glyph_id: u32,
    pub name: String,
    pub error: String,
}

#[derive(Copy, Clone, Debug)]
pub struct BatchOptions {
    /// Distribute glyphs over the rayon thread pool.
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

enum Measure {
    Eligible(usize),
    Composite,
    Empty,
    Failed(GlyphError),
}

#[derive(Clone, Debug, Default)]
pub struct GlyphBatcher {
    options: BatchOptions,
}

impl GlyphBatcher {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    pub fn batch(&self, source: &impl OutlineSource) -> (GlyphTensor, BatchDiagnostics) {
        let glyph_count = source.glyph_count();
        log::debug!("batching {glyph_count} glyphs");

        // Pass 1: measure
        let measures = self.map_glyphs(glyph_count, |gid| measure(source, gid));
        let mut diagnostics = BatchDiagnostics {
            glyph_count,
            ..Default::default()
        };
        let mut eligible = Vec::new();
        for (gid, measure) in measures.into_iter().enumerate() {
            let gid = GlyphId::new(gid as u32);
            match measure {
                Measure::Eligible(len) => {
                    diagnostics.max_values = diagnostics.max_values.max(len);
                    eligible.push(gid);
                }
                Measure::Composite => diagnostics.skipped_composite += 1,
                Measure::Empty => diagnostics.skipped_empty += 1,
                Measure::Failed(e) => record_failure(source, &mut diagnostics, e),
            }
        }
        let cols = diagnostics.max_values;
        log::debug!("{} eligible glyphs, row width {cols}", eligible.len());
        if eligible.is_empty() {
            log::info!("no eligible glyphs in {glyph_count}, producing an empty tensor");
            return (GlyphTensor::default(), diagnostics);
        }

        // Pass 2: materialize
        let mut data = vec![0.0f32; eligible.len() * cols];
        let results: Vec<Result<usize, GlyphError>> = if self.options.parallel {
            data.par_chunks_mut(cols)
                .zip(eligible.par_iter())
                .map(|(row, gid)| fill_row(source, *gid, row))
                .collect()
        } else {
            data.chunks_mut(cols)
                .zip(eligible.iter())
                .map(|(row, gid)| fill_row(source, *gid, row))
                .collect()
        };

        let mut glyph_ids = Vec::with_capacity(eligible.len());
        let mut lengths = Vec::with_capacity(eligible.len());
        let mut kept = 0;
        for (ix, (gid, result)) in eligible.into_iter().zip(results).enumerate() {
            match result {
                Ok(len) => {
                    if kept != ix {
                        data.copy_within(ix * cols..(ix + 1) * cols, kept * cols);
                    }
                    glyph_ids.push(gid.to_u32());
                    lengths.push(len);
                    kept += 1;
                }
                Err(e) => record_failure(source, &mut diagnostics, e),
            }
        }
        data.truncate(kept * cols);
        diagnostics.rows = kept;
        log::info!(
            "produced {kept} rows of width {cols} from {glyph_count} glyphs ({} failed)",
            diagnostics.failed.len()
        );
        let tensor = GlyphTensor {
            rows: kept,
            cols,
            data,
            glyph_ids,
            lengths,
        };
        (tensor, diagnostics)
    }

    fn map_glyphs<T: Send>(&self, glyph_count: u32, f: impl Fn(GlyphId) -> T + Sync) -> Vec<T> {
        if self.options.parallel {
            (0..glyph_count)
                .into_par_iter()
                .map(|gid| f(GlyphId::new(gid)))
                .collect()
        } else {
            (0..glyph_count).map(|gid| f(GlyphId::new(gid))).collect()
        }
    }
}

fn measure(source: &impl OutlineSource, glyph_id: GlyphId) -> Measure {
    match source.contour_count(glyph_id) {
        Ok(count) if count < 0 => return Measure::Composite,
        Ok(0) => return Measure::Empty,
        Ok(_) => {}
        Err(e) => return Measure::Failed(e),
    }
    match extract_outline(source, glyph_id) {
        Ok(outline) if outline.is_empty() => Measure::Empty,
        Ok(outline) => Measure::Eligible(flattened_len(outline.points())),
        Err(e) => Measure::Failed(e),
    }
}

/// Writes the normalized points of a glyph into the front of `row`, leaving
/// the zeroed tail as padding. Returns the number of values written.
fn fill_row(
    source: &impl OutlineSource,
    glyph_id: GlyphId,
    row: &mut [f32],
) -> Result<usize, GlyphError> {
    let outline = extract_outline(source, glyph_id)?;
    let len = flattened_len(outline.points());
    if len > row.len() {
        return Err(GlyphError::ShapeChanged {
            glyph_id,
            expected: row.len(),
            found: len,
        });
    }
    for (slot, value) in row.iter_mut().zip(flatten(outline.points())) {
        *slot = value;
    }
    Ok(len)
}

fn record_failure(
    source: &impl OutlineSource,
    diagnostics: &mut BatchDiagnostics,
    error: GlyphError,
) {
    let glyph_id = error.glyph_id();
    let name = source.glyph_name(glyph_id);
    log::warn!("skipping glyph {name}: {error}");
    diagnostics.failed.push(FailedGlyph {
        glyph_id: glyph_id.to_u32(),
        name,
        error: error.to_string(),
    });
}
