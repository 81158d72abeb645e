use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A coerced tag value: integer, float, or the trimmed string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            // Whole floats keep their decimal point so `3.0` does not read back as an integer.
            Scalar::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// A `name(arg,arg,...)` found inside a tag value. Arguments are scalars only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub params: Vec<Scalar>,
}

/// What a tag key maps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Call(FunctionCall),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Call(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_call(&self) -> Option<&FunctionCall> {
        match self {
            Value::Call(c) => Some(c),
            Value::Scalar(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Call(c) => {
                write!(f, "{}(", c.name)?;
                for (i, p) in c.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", p)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

/// Keys of a parsed tag string in order of first appearance.
///
/// A cell with no tags at all is represented by `Option::<TagMap>::None`,
/// never by an empty map.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TagMap(IndexMap<String, Value>);

impl TagMap {
    pub fn new() -> Self {
        TagMap(IndexMap::new())
    }

    /// Insert a value. A repeated key keeps its original position but takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display string of `key`'s value, if present.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Overlay records ─────────────────────────────────────────────────

/// Tag key naming an overlay's kind.
pub const TAG_TYPE: &str = "Type";
/// Literal output text of a `Text` overlay.
pub const TAG_TEXT: &str = "Text";
/// Source workbook name of a `File` overlay.
pub const TAG_FILE: &str = "File";
/// Sheet inside the source workbook.
pub const TAG_SHEET: &str = "Sheet";
/// Column letters holding the primary key.
pub const TAG_KEY_COL: &str = "KeyCol";
/// Column letters holding the value to fetch.
pub const TAG_VALUE_COL: &str = "ValueCol";
/// Preprocess tag holding the function call.
pub const TAG_FUNCTION: &str = "Function";

pub const TYPE_TEXT: &str = "Text";
pub const TYPE_FILE: &str = "File";

/// Recognized overlay kinds, read from `content.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Text,
    File,
}

/// One named unit of output content, as loaded from a template row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayRecord {
    pub(crate) name: String,
    pub(crate) content: TagMap,
    pub(crate) param: Option<TagMap>,
    #[serde(rename = "preProcess")]
    pub(crate) pre_process: Option<TagMap>,
    /// Current output text. Only `OverlayStore` changes it after loading.
    pub(crate) text: Option<String>,
}

impl OverlayRecord {
    pub fn new(
        name: impl Into<String>,
        content: TagMap,
        param: Option<TagMap>,
        pre_process: Option<TagMap>,
    ) -> Self {
        let mut record = OverlayRecord {
            name: name.into(),
            content,
            param,
            pre_process,
            text: None,
        };
        if record.kind() == Some(OverlayKind::Text) {
            record.text = record.content.text(TAG_TEXT);
        }
        record
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &TagMap {
        &self.content
    }

    pub fn param(&self) -> Option<&TagMap> {
        self.param.as_ref()
    }

    pub fn pre_process(&self) -> Option<&TagMap> {
        self.pre_process.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Raw `content.Type` string, if it is a string.
    pub fn type_name(&self) -> Option<&str> {
        self.content.get(TAG_TYPE).and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<OverlayKind> {
        match self.type_name() {
            Some(TYPE_TEXT) => Some(OverlayKind::Text),
            Some(TYPE_FILE) => Some(OverlayKind::File),
            _ => None,
        }
    }

    /// `content.File` of a `File` overlay.
    pub fn file_name(&self) -> Option<String> {
        match self.kind() {
            Some(OverlayKind::File) => self.content.text(TAG_FILE),
            _ => None,
        }
    }
}

/// One entry of the record-id sheet: which source record to render and under what label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordId {
    pub key: u64,
    pub identifier: String,
}
