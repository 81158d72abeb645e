use crate::value::{FunctionCall, Scalar, TagMap, Value};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `<key=value>`: the key stops at the first `=`, the value at the first `>`.
    static ref TAG: Regex = Regex::new(r"<([^<>=]*?)=(.*?)>").unwrap();
    /// `name(args)` anchored at the start; anything after `)` is ignored.
    static ref CALL: Regex = Regex::new(r"^(\w+)\((.*?)\)").unwrap();
}

// ── Scalars ─────────────────────────────────────────────────────────

/// Coerce a raw token into an integer, a float, or the trimmed string.
///
/// All-digit tokens are integers. Anything else that parses as a float is a
/// float. Everything else is kept as text; this never fails.
pub fn coerce(raw: &str) -> Scalar {
    let token = raw.trim();
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = token.parse::<i64>() {
            return Scalar::Int(n);
        }
        // Digit strings too wide for i64 still read as numbers.
    }
    match token.parse::<f64>() {
        Ok(x) => Scalar::Float(x),
        Err(_) => Scalar::Str(token.to_string()),
    }
}

// ── Function calls ──────────────────────────────────────────────────

/// Turn a string scalar of the form `name(a,b,...)` into a [`FunctionCall`].
///
/// Arguments are coerced but never re-examined for calls, so calls do not nest.
/// Non-strings and strings that do not match pass through unchanged.
pub fn extract_call(value: Scalar) -> Value {
    let call = match &value {
        Scalar::Str(s) => CALL.captures(s).map(|caps| {
            let args = &caps[2];
            // `name()` takes no arguments rather than a single empty one.
            let params = if args.trim().is_empty() {
                Vec::new()
            } else {
                args.split(',').map(coerce).collect()
            };
            FunctionCall {
                name: caps[1].to_string(),
                params,
            }
        }),
        _ => None,
    };
    match call {
        Some(call) => Value::Call(call),
        None => Value::Scalar(value),
    }
}

// ── Tag maps ────────────────────────────────────────────────────────

/// Parse every `<key=value>` in `source`.
///
/// Returns `None` when the string holds no tags. Keys keep the order they
/// first appear in; a repeated key takes the value of its last occurrence.
pub fn parse_tags(source: &str) -> Option<TagMap> {
    let mut tags = TagMap::new();
    for caps in TAG.captures_iter(source) {
        let value = extract_call(coerce(&caps[2]));
        tags.insert(&caps[1], value);
    }
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}
