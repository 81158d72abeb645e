pub mod config;
pub mod error;
pub mod files;
pub mod loader;
pub mod parser;
pub mod preprocess;
pub mod session;
pub mod source;
pub mod store;
pub mod value;

use error::TemplateError;
use source::SourceBook;
use store::OverlayStore;
use value::OverlayRecord;

pub use config::{Config, RecordLayout, TemplateLayout};
pub use files::collect_files;
pub use loader::{load_record_ids, load_template, load_template_file};
pub use parser::{coerce, extract_call, parse_tags};
pub use preprocess::preprocess;
pub use source::{RowSource, Table};

// ── Core API ───────────────────────────────────────────────────────

/// The overlays of one rendered record.
pub struct RenderResult {
    pub store: OverlayStore,
    pub errors: Vec<TemplateError>,
}

/// Render the template overlays for one source record, returning the
/// finished overlays and any non-fatal errors (unresolvable file values,
/// malformed directives). The template overlays themselves are not changed.
pub fn render_record(
    overlays: &[OverlayRecord],
    book: &SourceBook,
    primary_key: &str,
) -> RenderResult {
    let mut store = OverlayStore::new(overlays.to_vec());
    let errors = store.render(book, primary_key);
    RenderResult { store, errors }
}
