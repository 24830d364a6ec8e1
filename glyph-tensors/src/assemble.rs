//! Combining glyph, axis and style tensors into per font records.

use std::path::{Path, PathBuf};

use serde::Serialize;
use skrifa::GlyphId;

use crate::{
    axes::{encode_axes, VariationAxis},
    batch::{BatchDiagnostics, GlyphBatcher, GlyphTensor},
    describe::{DescriptionCatalog, FontDescription},
    font::{FontFile, FontMetadata, FontTable, GlyphMetrics, NamedInstance, OutlineSource},
    pen::{extract_outline, PathPoint},
    style::{PlaceholderStyle, StyleEncoder},
    Error, GlyphError,
};

/// Tensors handed to downstream model code.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FontRecord {
    /// `[G, P]`, row-major.
    pub glyphs: GlyphTensor,
    /// `3 * axis_count` values, or `[0.0]` without axes.
    pub variations: Vec<f32>,
    pub style: Vec<f32>,
}

/// Everything extracted from one font file.
#[derive(Clone, Debug, Serialize)]
pub struct ProcessedFont {
    pub path: PathBuf,
    pub metadata: FontMetadata,
    pub description: FontDescription,
    pub axes: Vec<VariationAxis>,
    pub instances: Vec<NamedInstance>,
    /// Glyph name of each row of `record.glyphs`.
    pub glyph_names: Vec<String>,
    pub record: FontRecord,
    pub diagnostics: BatchDiagnostics,
}

/// Points, contours and metrics of a single glyph.
#[derive(Clone, Debug, Serialize)]
pub struct GlyphProfile {
    pub glyph_id: u32,
    pub name: String,
    pub contours: Vec<Vec<PathPoint>>,
    pub points: Vec<PathPoint>,
    pub metrics: GlyphMetrics,
}

pub struct FontTensorAssembler<S = PlaceholderStyle> {
    batcher: GlyphBatcher,
    style: S,
    descriptions: DescriptionCatalog,
}

impl Default for FontTensorAssembler {
    fn default() -> Self {
        Self::new(
            GlyphBatcher::default(),
            PlaceholderStyle::default(),
            DescriptionCatalog::default(),
        )
    }
}

impl<S: StyleEncoder> FontTensorAssembler<S> {
    pub fn new(batcher: GlyphBatcher, style: S, descriptions: DescriptionCatalog) -> Self {
        Self {
            batcher,
            style,
            descriptions,
        }
    }

    /// Opens, decodes and converts the face at `index` of the font at `path`.
    ///
    /// Unsupported extensions and undecodable files fail; glyph level errors
    /// are reported in the diagnostics instead.
    pub fn process_path(&self, path: impl AsRef<Path>, index: u32) -> Result<ProcessedFont, Error> {
        let file = FontFile::open(path)?;
        let table = file.table(index)?;
        let description = self.descriptions.lookup(&file.file_name());
        let axes = table.axes();
        let (record, diagnostics) = self.assemble(&table, &axes, &description);
        let glyph_names = record
            .glyphs
            .glyph_ids()
            .map(|gid| table.glyph_name(gid))
            .collect();
        Ok(ProcessedFont {
            path: file.path().to_owned(),
            metadata: table.metadata(),
            instances: table.named_instances(),
            description,
            axes,
            glyph_names,
            record,
            diagnostics,
        })
    }

    /// Builds the record for an already decoded outline source.
    pub fn assemble(
        &self,
        source: &impl OutlineSource,
        axes: &[VariationAxis],
        description: &FontDescription,
    ) -> (FontRecord, BatchDiagnostics) {
        let (glyphs, diagnostics) = self.batcher.batch(source);
        let record = FontRecord {
            glyphs,
            variations: encode_axes(axes),
            style: self.style.encode(description),
        };
        (record, diagnostics)
    }
}

/// Extracts the profile of the glyph named `name`.
///
/// Returns `Ok(None)` when the font has no glyph with that name.
pub fn glyph_profile(table: &FontTable, name: &str) -> Result<Option<GlyphProfile>, GlyphError> {
    let Some(glyph_id) = table.glyph_id(name) else {
        return Ok(None);
    };
    profile(table, glyph_id).map(Some)
}

fn profile(table: &FontTable, glyph_id: GlyphId) -> Result<GlyphProfile, GlyphError> {
    let outline = extract_outline(table, glyph_id)?;
    Ok(GlyphProfile {
        glyph_id: glyph_id.to_u32(),
        name: table.glyph_name(glyph_id),
        contours: outline.contours().map(|c| c.to_vec()).collect(),
        points: outline.points().to_vec(),
        metrics: table.glyph_metrics(glyph_id),
    })
}
