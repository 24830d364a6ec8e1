//! Error types for font and glyph processing.

use std::{fmt, io, path::PathBuf};

use skrifa::{outline::DrawError, raw::ReadError, GlyphId};

/// Errors that abort processing of a whole font.
#[derive(Debug)]
pub enum Error {
    /// The file extension does not name a supported font format.
    UnsupportedFormat {
        path: PathBuf,
        extension: Option<String>,
    },
    /// The file could not be opened or mapped.
    Io { path: PathBuf, source: io::Error },
    /// The font container, or a table required for extraction, could not be
    /// decoded.
    Load { path: PathBuf, source: ReadError },
    /// The description catalog exists but could not be parsed.
    Descriptions {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A record could not be serialized for output.
    Output {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { path, extension } => match extension {
                Some(ext) => write!(f, "unsupported font format '.{ext}' for {path:?}"),
                None => write!(f, "missing font extension for {path:?}"),
            },
            Self::Io { path, source } => write!(f, "failed to read {path:?}: {source}"),
            Self::Load { path, source } => write!(f, "failed to load {path:?}: {source}"),
            Self::Descriptions { path, source } => {
                write!(f, "malformed font descriptions in {path:?}: {source}")
            }
            Self::Output { path, source } => {
                write!(f, "failed to serialize output for {path:?}: {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedFormat { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Load { source, .. } => Some(source),
            Self::Descriptions { source, .. } | Self::Output { source, .. } => Some(source),
        }
    }
}

/// Errors that exclude a single glyph from a batch.
///
/// These never abort processing of the font that contains the glyph.
#[derive(Clone, Debug)]
pub enum GlyphError {
    /// The glyph header could not be read from the outline table.
    Read(GlyphId, ReadError),
    /// The outline program could not be traversed.
    Draw(GlyphId, DrawError),
    /// A second extraction produced more points than the first.
    ShapeChanged {
        glyph_id: GlyphId,
        expected: usize,
        found: usize,
    },
}

impl GlyphError {
    pub fn glyph_id(&self) -> GlyphId {
        match self {
            Self::Read(gid, _) | Self::Draw(gid, _) => *gid,
            Self::ShapeChanged { glyph_id, .. } => *glyph_id,
        }
    }
}

impl fmt::Display for GlyphError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read(gid, e) => write!(f, "glyph {gid}: {e}"),
            Self::Draw(gid, e) => write!(f, "glyph {gid}: {e}"),
            Self::ShapeChanged {
                glyph_id,
                expected,
                found,
            } => write!(
                f,
                "glyph {glyph_id}: expected at most {expected} values, found {found}"
            ),
        }
    }
}

impl std::error::Error for GlyphError {}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, error::Error as _};

    use super::*;

    #[test]
    fn output_error_keeps_serializer_source() {
        // Maps with non string keys cannot be written as JSON objects.
        let source = serde_json::to_string(&BTreeMap::from([((1, 2), 0)])).unwrap_err();
        let err = Error::Output {
            path: PathBuf::from("out/Example.json"),
            source,
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to serialize output for \"out/Example.json\""));
        assert!(err.source().is_some());
        assert!(!matches!(err, Error::Io { .. }));
    }
}
