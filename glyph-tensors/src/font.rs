//! Loading font files and reading their tables.

use std::path::{Path, PathBuf};

use serde::Serialize;
use skrifa::{
    instance::{LocationRef, Size},
    metrics::GlyphMetrics as SkrifaGlyphMetrics,
    outline::{DrawError, DrawSettings, OutlineGlyphCollection, OutlinePen},
    raw::{
        tables::{
            glyf::{Glyf, Glyph},
            loca::Loca,
        },
        FileRef, FontRef, ReadError, TableProvider,
    },
    string::StringId,
    GlyphId, GlyphNames, MetadataProvider,
};

use crate::{axes::VariationAxis, glyf, Error, GlyphError};

/// File extensions accepted by [`FontFile::open`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ttf", "ttc"];

/// Memory mapped contents of a font file.
pub struct FontFile {
    path: PathBuf,
    data: memmap2::Mmap,
}

impl FontFile {
    /// Maps the font at `path` after checking that its extension is supported.
    ///
    /// No table is read here; decoding happens in [`FontFile::table`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_owned();
        check_extension(&path)?;
        let file = std::fs::File::open(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        // SAFETY: the mapping is read only and lives no longer than `self`.
        // Concurrent truncation of the file by another process is not
        // guarded against, which matches how font tooling commonly maps
        // inputs.
        let data = unsafe { memmap2::Mmap::map(&file) }.map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Returns the number of faces in the file; more than one for a
    /// collection.
    pub fn face_count(&self) -> Result<u32, Error> {
        match FileRef::new(self.data()).map_err(|source| self.load_error(source))? {
            FileRef::Font(_) => Ok(1),
            FileRef::Collection(collection) => Ok(collection.len()),
        }
    }

    /// Decodes the face at `index`.
    pub fn table(&self, index: u32) -> Result<FontTable<'_>, Error> {
        let font = FontRef::from_index(self.data(), index)
            .map_err(|source| self.load_error(source))?;
        FontTable::new(font).map_err(|source| self.load_error(source))
    }

    fn load_error(&self, source: ReadError) -> Error {
        Error::Load {
            path: self.path.clone(),
            source,
        }
    }
}

fn check_extension(path: &Path) -> Result<(), Error> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_owned(),
            extension,
        }),
    }
}

/// Access to the outline table of a font, one glyph at a time.
///
/// Every extraction takes the source as an explicit parameter so that no
/// table state outlives a single call.
pub trait OutlineSource: Sync {
    /// Number of glyphs in the outline table.
    fn glyph_count(&self) -> u32;

    /// Contour count from the glyph header; zero for empty glyphs and
    /// negative for composites.
    fn contour_count(&self, glyph_id: GlyphId) -> Result<i16, GlyphError>;

    /// Draws the unscaled outline of the glyph at its default location.
    fn draw(&self, glyph_id: GlyphId, pen: &mut impl OutlinePen) -> Result<(), GlyphError>;

    /// Name of the glyph, used for diagnostics.
    fn glyph_name(&self, glyph_id: GlyphId) -> String {
        format!("gid{}", glyph_id.to_u32())
    }
}

/// Read-only view of the tables of one decoded font.
pub struct FontTable<'a> {
    font: FontRef<'a>,
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    outlines: OutlineGlyphCollection<'a>,
    names: GlyphNames<'a>,
    glyph_count: u32,
}

impl<'a> FontTable<'a> {
    /// Fails if the font has no `glyf`/`loca` outline table.
    pub fn new(font: FontRef<'a>) -> Result<Self, ReadError> {
        let loca = font.loca(None)?;
        let glyf = font.glyf()?;
        let glyph_count = font.maxp()?.num_glyphs() as u32;
        Ok(Self {
            outlines: font.outline_glyphs(),
            names: font.glyph_names(),
            font,
            loca,
            glyf,
            glyph_count,
        })
    }

    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    pub fn metadata(&self) -> FontMetadata {
        let head = self.font.head().ok();
        let hhea = self.font.hhea().ok();
        let os2 = self.font.os2().ok();
        FontMetadata {
            name: self.string(StringId::FAMILY_NAME),
            version: head.as_ref().map(|head| head.font_revision().to_f64()),
            units_per_em: head.as_ref().map(|head| head.units_per_em()),
            ascent: hhea.as_ref().map(|hhea| hhea.ascender().to_i16()),
            descent: hhea.as_ref().map(|hhea| hhea.descender().to_i16()),
            x_height: os2.as_ref().and_then(|os2| os2.sx_height()),
            cap_height: os2.as_ref().and_then(|os2| os2.s_cap_height()),
            is_variable: !self.font.axes().is_empty(),
        }
    }

    /// Variation axes in declaration order; empty for static fonts.
    pub fn axes(&self) -> Vec<VariationAxis> {
        self.font
            .axes()
            .iter()
            .map(|axis| {
                VariationAxis::new(
                    axis.tag(),
                    axis.name_id().to_u16(),
                    axis.min_value(),
                    axis.default_value(),
                    axis.max_value(),
                )
            })
            .collect()
    }

    pub fn named_instances(&self) -> Vec<NamedInstance> {
        let axes = self.font.axes();
        self.font
            .named_instances()
            .iter()
            .map(|instance| {
                let mut user_coords = instance.user_coords();
                let coordinates = axes
                    .iter()
                    .map(|axis| InstanceCoordinate {
                        axis: axis.tag().to_string(),
                        value: user_coords.next().unwrap_or_default(),
                    })
                    .collect();
                NamedInstance {
                    name: self.string(instance.subfamily_name_id()),
                    coordinates,
                }
            })
            .collect()
    }

    /// Finds a glyph by name, searching in glyph id order.
    pub fn glyph_id(&self, name: &str) -> Option<GlyphId> {
        self.names
            .iter()
            .find(|(_, glyph_name)| glyph_name.as_str() == name)
            .map(|(gid, _)| gid)
    }

    pub fn glyph_metrics(&self, glyph_id: GlyphId) -> GlyphMetrics {
        let metrics = self.unscaled_metrics();
        let bounds = metrics.bounds(glyph_id);
        GlyphMetrics {
            advance_width: metrics.advance_width(glyph_id).unwrap_or_default(),
            left_side_bearing: metrics.left_side_bearing(glyph_id),
            height: bounds.map(|bounds| bounds.y_max - bounds.y_min),
            bounds: bounds
                .map(|bounds| Bounds {
                    x_min: bounds.x_min,
                    y_min: bounds.y_min,
                    x_max: bounds.x_max,
                    y_max: bounds.y_max,
                })
                .unwrap_or_default(),
        }
    }

    fn draw_composite(
        &self,
        glyph_id: GlyphId,
        pen: &mut impl OutlinePen,
    ) -> Result<(), GlyphError> {
        let glyph = self
            .outlines
            .get(glyph_id)
            .ok_or(GlyphError::Draw(glyph_id, DrawError::GlyphNotFound(glyph_id)))?;
        glyph
            .draw(
                DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
                pen,
            )
            .map(|_| ())
            .map_err(|e| GlyphError::Draw(glyph_id, e))
    }

    fn unscaled_metrics(&self) -> SkrifaGlyphMetrics<'a> {
        self.font
            .glyph_metrics(Size::unscaled(), LocationRef::default())
    }

    fn string(&self, id: StringId) -> Option<String> {
        self.font
            .localized_strings(id)
            .english_or_first()
            .map(|s| s.to_string())
    }
}

impl OutlineSource for FontTable<'_> {
    fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    fn contour_count(&self, glyph_id: GlyphId) -> Result<i16, GlyphError> {
        match self.loca.get_glyf(glyph_id, &self.glyf) {
            Ok(Some(glyph)) => Ok(glyph.number_of_contours()),
            Ok(None) => Ok(0),
            Err(e) => Err(GlyphError::Read(glyph_id, e)),
        }
    }

    /// Simple glyphs are drawn from the same `glyf` data that supplied their
    /// contour count. Composites are resolved through skrifa's scaler.
    fn draw(&self, glyph_id: GlyphId, pen: &mut impl OutlinePen) -> Result<(), GlyphError> {
        match self.loca.get_glyf(glyph_id, &self.glyf) {
            Ok(None) => Ok(()),
            Ok(Some(Glyph::Simple(glyph))) => {
                glyf::draw_simple(&glyph, pen).map_err(|e| GlyphError::Read(glyph_id, e))
            }
            Ok(Some(Glyph::Composite(_))) => self.draw_composite(glyph_id, pen),
            Err(e) => Err(GlyphError::Read(glyph_id, e)),
        }
    }

    fn glyph_name(&self, glyph_id: GlyphId) -> String {
        self.names
            .get(glyph_id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("gid{}", glyph_id.to_u32()))
    }
}

/// Font wide values from the `name`, `head`, `hhea` and `OS/2` tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FontMetadata {
    pub name: Option<String>,
    pub version: Option<f64>,
    pub units_per_em: Option<u16>,
    pub ascent: Option<i16>,
    pub descent: Option<i16>,
    pub x_height: Option<i16>,
    pub cap_height: Option<i16>,
    pub is_variable: bool,
}

/// A named instance from the `fvar` table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedInstance {
    pub name: Option<String>,
    pub coordinates: Vec<InstanceCoordinate>,
}

/// User space position of a named instance on one axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstanceCoordinate {
    pub axis: String,
    pub value: f32,
}

/// Per glyph metrics in font units.
///
/// Fields that a glyph may lack are resolved once here: `height` and
/// `left_side_bearing` stay `None`, while missing bounds become all zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GlyphMetrics {
    pub advance_width: f32,
    pub left_side_bearing: Option<f32>,
    pub height: Option<f32>,
    pub bounds: Bounds,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check() {
        assert!(check_extension(Path::new("fonts/Roboto.ttf")).is_ok());
        assert!(check_extension(Path::new("fonts/Roboto.TTF")).is_ok());
        assert!(check_extension(Path::new("fonts/NotoSansCJK.ttc")).is_ok());
        let err = check_extension(Path::new("fonts/Roboto.woff2")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedFormat { extension: Some(ref ext), .. } if ext == "woff2"
        ));
        let err = check_extension(Path::new("fonts/Roboto")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedFormat {
                extension: None,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_format_fails_before_reading() {
        // The file does not exist, so reaching the filesystem would produce
        // an Io error instead.
        let err = FontFile::open("does/not/exist.otf").err().unwrap();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
        let err = FontFile::open("does/not/exist.ttf").err().unwrap();
        assert!(matches!(err, Error::Io { .. }));
    }
}
