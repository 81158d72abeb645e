use crate::error::{Result, TemplateError};
use serde::Deserialize;
use std::path::Path;

/// Column positions of the overlay template sheet (0-based).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    pub index_column: usize,
    pub name_column: usize,
    pub content_column: usize,
    pub param_column: usize,
    pub preprocess_column: usize,
    /// First row to scan. A header row does not need skipping: its index
    /// cell is not numeric, so the loader passes over it.
    pub first_data_row: usize,
    /// Content strings at or under this length are malformed.
    pub min_tag_length: usize,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        TemplateLayout {
            index_column: 0,
            name_column: 1,
            content_column: 2,
            param_column: 3,
            preprocess_column: 4,
            first_data_row: 0,
            min_tag_length: 6,
        }
    }
}

/// Column positions of the record-id sheet (0-based).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordLayout {
    pub index_column: usize,
    pub key_column: usize,
    pub identifier_column: usize,
    pub first_data_row: usize,
}

impl Default for RecordLayout {
    fn default() -> Self {
        RecordLayout {
            index_column: 0,
            key_column: 1,
            identifier_column: 2,
            first_data_row: 0,
        }
    }
}

/// `overlay-tags.toml`:
///
/// ```toml
/// [template]
/// content_column = 2
/// min_tag_length = 6
///
/// [records]
/// key_column = 1
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub template: TemplateLayout,
    pub records: RecordLayout,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TemplateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}
