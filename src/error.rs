use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    // File errors
    #[error("FILE_NOT_FOUND: '{}' does not exist", .path.display())]
    FileNotFound { path: PathBuf },

    // Overlay errors
    #[error("MALFORMED_DIRECTIVE: '{0}' is not of the form !<CONCAT><NAME>")]
    MalformedDirective(String),

    #[error("MISSING_TAG: overlay '{name}' has no '{key}' tag")]
    MissingTag { name: String, key: String },

    // Source workbook errors
    #[error("WORKBOOK_NOT_FOUND: no source workbook named '{0}'")]
    WorkbookNotFound(String),

    #[error("SHEET_NOT_FOUND: workbook '{file}' has no sheet '{sheet}'")]
    SheetNotFound { file: String, sheet: String },

    #[error("INVALID_COLUMN: '{0}' is not a column reference")]
    InvalidColumn(String),

    // Config / session errors
    #[error("CONFIG_INVALID: {0}")]
    ConfigInvalid(String),

    #[error("SESSION_INVALID: {0}")]
    SessionInvalid(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV_ERROR: {0}")]
    Csv(#[from] csv::Error),
}

impl TemplateError {
    /// Machine-readable code, the prefix of the display message.
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::FileNotFound { .. } => "FILE_NOT_FOUND",
            TemplateError::MalformedDirective(_) => "MALFORMED_DIRECTIVE",
            TemplateError::MissingTag { .. } => "MISSING_TAG",
            TemplateError::WorkbookNotFound(_) => "WORKBOOK_NOT_FOUND",
            TemplateError::SheetNotFound { .. } => "SHEET_NOT_FOUND",
            TemplateError::InvalidColumn(_) => "INVALID_COLUMN",
            TemplateError::ConfigInvalid(_) => "CONFIG_INVALID",
            TemplateError::SessionInvalid(_) => "SESSION_INVALID",
            TemplateError::Io(_) => "IO_ERROR",
            TemplateError::Csv(_) => "CSV_ERROR",
        }
    }
}

impl From<toml::de::Error> for TemplateError {
    fn from(err: toml::de::Error) -> Self {
        TemplateError::ConfigInvalid(err.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::SessionInvalid(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
