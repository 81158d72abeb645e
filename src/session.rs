use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A source workbook opened in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
}

/// What a user had open, so the next run can pick it up again.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub pdf_file_name: String,
    pub template_file_name: String,
    #[serde(default)]
    pub source_files: Vec<SourceFile>,
}

impl Session {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TemplateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let input = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&input)?)
    }
}
