//! Human authored font descriptions, keyed by file name.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    io,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescription {
    pub description: String,
    pub tags: BTreeSet<String>,
    pub characteristics: BTreeMap<String, serde_json::Value>,
}

/// Catalog of descriptions read from a JSON file of the form
/// `{"fonts": {"<file name>": {"description": ..., "tags": [...], ...}}}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DescriptionCatalog {
    #[serde(default)]
    fonts: HashMap<String, FontDescription>,
}

impl DescriptionCatalog {
    /// Loads the catalog at `path`.
    ///
    /// A missing file yields an empty catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no font descriptions at {path:?}");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        Self::from_json(&text).map_err(|source| Error::Descriptions {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Returns the description for `file_name`, or an empty one.
    pub fn lookup(&self, file_name: &str) -> FontDescription {
        self.fonts.get(file_name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static CATALOG: &str = r#"{
        "fonts": {
            "Example-Regular.ttf": {
                "description": "A humanist sans",
                "tags": ["sans", "humanist"],
                "characteristics": {"contrast": "low", "x_height": 0.52}
            },
            "Sparse.ttf": {"tags": ["display"]}
        }
    }"#;

    #[test]
    fn lookup_known_font() {
        let catalog = DescriptionCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        let desc = catalog.lookup("Example-Regular.ttf");
        assert_eq!(desc.description, "A humanist sans");
        assert_eq!(
            desc.tags.iter().map(String::as_str).collect::<Vec<_>>(),
            ["humanist", "sans"]
        );
        assert_eq!(desc.characteristics["contrast"], "low");
    }

    #[test]
    fn missing_fields_default() {
        let catalog = DescriptionCatalog::from_json(CATALOG).unwrap();
        let desc = catalog.lookup("Sparse.ttf");
        assert_eq!(desc.description, "");
        assert!(desc.characteristics.is_empty());
    }

    #[test]
    fn unknown_font_is_empty() {
        let catalog = DescriptionCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.lookup("Other.ttf"), FontDescription::default());
    }

    #[test]
    fn missing_file_is_empty_catalog() {
        let catalog = DescriptionCatalog::load("no/such/descriptions.json").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_fonts_key_is_empty_catalog() {
        assert!(DescriptionCatalog::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_error() {
        assert!(DescriptionCatalog::from_json("{\"fonts\": [").is_err());
    }
}
