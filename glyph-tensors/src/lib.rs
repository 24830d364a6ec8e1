//! Conversion of TrueType glyph outlines into fixed-shape numeric tensors.
//!
//! A font is read through [`FontTable`], each glyph's outline is walked by a
//! [`PointPen`](pen::PointPen) into typed points, the points are scaled by a
//! fixed divisor and flattened, and [`GlyphBatcher`] packs every eligible
//! glyph into one zero padded `[glyphs, values]` matrix. The
//! [`FontTensorAssembler`] combines that matrix with encoded variation axes
//! and a style vector into a [`FontRecord`].
//!
//! ```no_run
//! use glyph_tensors::FontTensorAssembler;
//!
//! let processed = FontTensorAssembler::default()
//!     .process_path("fonts/Example-Regular.ttf", 0)
//!     .unwrap();
//! let [rows, cols] = processed.record.glyphs.shape();
//! println!("{rows} glyphs of {cols} values");
//! ```

pub mod assemble;
pub mod axes;
pub mod batch;
pub mod describe;
mod error;
pub mod font;
mod glyf;
pub mod normalize;
pub mod pen;
pub mod style;

pub use assemble::{glyph_profile, FontRecord, FontTensorAssembler, GlyphProfile, ProcessedFont};
pub use axes::{encode_axes, VariationAxis};
pub use batch::{BatchDiagnostics, BatchOptions, GlyphBatcher, GlyphTensor};
pub use describe::{DescriptionCatalog, FontDescription};
pub use error::{Error, GlyphError};
pub use font::{FontFile, FontTable, OutlineSource};
pub use pen::{extract_outline, GlyphOutline, PathPoint, PointKind};
pub use style::{PlaceholderStyle, StyleEncoder, STYLE_VECTOR_LEN};
