//! Leaf rendering: turn the JSON values found at a path into display strings.

use serde_json::{Number, Value};

use crate::cfg::NormalizeCfg;
use crate::nav::{lookup, paths, Segment};

/// Number text as JavaScript's `String(n)` prints it: shortest round-trip
/// digits, integral floats without a fraction (`1200.0` -> `"1200"`),
/// negative zero as `"0"`, and exponent form (`1e+21`, `1.5e-7`) when the
/// magnitude is below `1e-6` or at least `1e21`.
pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if (1e-6..1e21).contains(&f.abs()) => f.to_string(),
        Some(f) => exponent_text(f),
        None => n.to_string(),
    }
}

// `{:e}` gives `1e21` / `1.5e-7`; JS signs positive exponents.
fn exponent_text(f: f64) -> String {
    let s = format!("{f:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// Display text for a descriptive leaf, or `None` when the leaf is missing
/// or blank: `null`, `false`, `0`, `""`, objects and arrays all count as absent.
pub fn present_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0 && f.is_finite()) => {
            Some(number_text(n))
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

pub fn text_at(root: &Value, path: &[Segment]) -> Option<String> {
    present_text(lookup(root, path))
}

/// `"$" + totalPremium` whenever the premium key is present. Zero, empty
/// strings and `null` are all present values and still get the prefix
/// (`null` renders as `"$null"`). Objects and arrays have no text form and
/// fall back to the placeholder.
pub fn annual_premium(root: &Value, cfg: &NormalizeCfg) -> String {
    let amount = match lookup(root, paths::TOTAL_PREMIUM) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(number_text(n)),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Null) => Some("null".to_string()),
        _ => None,
    };
    match amount {
        Some(a) => format!("{}{}", cfg.currency_prefix, a),
        None => cfg.placeholder.clone(),
    }
}

fn date_at<'v>(root: &'v Value, path: &[Segment]) -> Option<&'v str> {
    lookup(root, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// `"<effective> - <expiration>"` with the midnight suffix removed from each
/// bound; the placeholder when either bound is missing or empty.
pub fn effective_dates(root: &Value, cfg: &NormalizeCfg) -> String {
    let (Some(start), Some(end)) = (
        date_at(root, paths::EFFECTIVE_DATE),
        date_at(root, paths::EXPIRATION_DATE),
    ) else {
        return cfg.placeholder.clone();
    };

    // Only the first occurrence is removed.
    let start = start.replacen(cfg.midnight_suffix.as_str(), "", 1);
    let end = end.replacen(cfg.midnight_suffix.as_str(), "", 1);
    format!("{}{}{}", start, cfg.date_separator, end)
}
