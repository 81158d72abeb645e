use crate::value::{Scalar, TagMap, Value, TAG_FUNCTION};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap();
}

pub const FN_NUMBER_TO_TEXT: &str = "NumberToText";
pub const FN_ADD_SPACE: &str = "AddSpace";

/// Default name of the hundredths unit in [`number_to_text`].
pub const DEFAULT_MINOR_UNIT: &str = "cents";

/// Apply the `Function` of a preprocess tag map to `text`.
///
/// - `NumberToText(major?, minor?)`: the first number in `text`, spelled out.
/// - `AddSpace`: `text` plus one trailing space.
///
/// A bare function name (`<Function=AddSpace>`) is a call without arguments.
/// Without a map, without a `Function` tag, or with an unknown function the
/// text comes back unchanged.
pub fn preprocess(text: &str, process_tags: Option<&TagMap>) -> String {
    let function = process_tags.and_then(|tags| tags.get(TAG_FUNCTION));
    match function {
        Some(Value::Call(call)) => apply_function(text, &call.name, &call.params),
        Some(Value::Scalar(Scalar::Str(name))) => apply_function(text, name, &[]),
        _ => text.to_string(),
    }
}

fn apply_function(text: &str, name: &str, params: &[Scalar]) -> String {
    match name {
        FN_NUMBER_TO_TEXT => {
            let major = param_text(params, 0);
            let minor = param_text(params, 1);
            number_to_text(
                extract_number(text),
                major.as_deref(),
                minor.as_deref().unwrap_or(DEFAULT_MINOR_UNIT),
            )
        }
        FN_ADD_SPACE => format!("{} ", text),
        other => {
            warn!(function = other, "unsupported preprocess function");
            text.to_string()
        }
    }
}

fn param_text(params: &[Scalar], index: usize) -> Option<String> {
    params
        .get(index)
        .map(|p| p.to_string())
        .filter(|p| !p.is_empty())
}

/// First number in `text`, thousands separators dropped. Zero when there is none.
pub fn extract_number(text: &str) -> f64 {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}

// ── Number words ────────────────────────────────────────────────────

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spell out 0..100.
fn tens_words(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{}-{}", TENS[(n / 10) as usize], ONES[(n % 10) as usize])
    }
}

/// Spell out 1..1000, British style ("one hundred and two").
fn hundreds_words(n: u64) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    match (hundreds, rest) {
        (0, r) => tens_words(r),
        (h, 0) => format!("{} hundred", ONES[h as usize]),
        (h, r) => format!("{} hundred and {}", ONES[h as usize], tens_words(r)),
    }
}

/// Spell out a whole number: `1005` is "one thousand and five".
pub fn integer_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut words = hundreds_words(group);
        if scale == 0 && group < 100 && groups.len() > 1 {
            words = format!("and {}", words);
        }
        if !SCALES[scale].is_empty() {
            words = format!("{} {}", words, SCALES[scale]);
        }
        parts.push(words);
    }
    parts.join(" ")
}

/// Currency-style words for `value`, rounded to hundredths.
///
/// `1234.5` with no major unit is "one thousand two hundred and thirty-four
/// and fifty cents". A major unit is appended after the whole part
/// ("one hundred and two dollars"). Negative and non-finite values read as zero.
pub fn number_to_text(value: f64, major_unit: Option<&str>, minor_unit: &str) -> String {
    let total = if value.is_finite() && value > 0.0 {
        (value * 100.0).round() as u64
    } else {
        0
    };
    let (whole, cents) = (total / 100, total % 100);

    let mut words = String::new();
    if whole > 0 || cents == 0 {
        words.push_str(&integer_words(whole));
        if let Some(unit) = major_unit {
            words.push(' ');
            words.push_str(unit);
        }
    }
    if cents > 0 {
        if !words.is_empty() {
            words.push_str(" and ");
        }
        words.push_str(&tens_words(cents));
        words.push(' ');
        words.push_str(minor_unit);
    }
    words
}
