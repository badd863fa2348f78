use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Known coverage codes on a term. Declaration order is display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageCode {
    CoverageA,
    CoverageB,
    CoverageC,
    CoverageD,
    CoverageE,
    CoverageF,
    CoverageL,
    CoverageM,
    AllOtherPerilsDeductible,
}

/// Applicable coverage limits of the current term, values exactly as the
/// backend sent them.
pub type Coverages = BTreeMap<CoverageCode, Value>;

impl CoverageCode {
    pub const ALL: [CoverageCode; 9] = [
        CoverageCode::CoverageA,
        CoverageCode::CoverageB,
        CoverageCode::CoverageC,
        CoverageCode::CoverageD,
        CoverageCode::CoverageE,
        CoverageCode::CoverageF,
        CoverageCode::CoverageL,
        CoverageCode::CoverageM,
        CoverageCode::AllOtherPerilsDeductible,
    ];

    /// Key used by the backend under `terms[n].coverages`.
    pub fn as_key(self) -> &'static str {
        match self {
            CoverageCode::CoverageA => "coverageA",
            CoverageCode::CoverageB => "coverageB",
            CoverageCode::CoverageC => "coverageC",
            CoverageCode::CoverageD => "coverageD",
            CoverageCode::CoverageE => "coverageE",
            CoverageCode::CoverageF => "coverageF",
            CoverageCode::CoverageL => "coverageL",
            CoverageCode::CoverageM => "coverageM",
            CoverageCode::AllOtherPerilsDeductible => "allOtherPerilsDeductible",
        }
    }

    /// Display label for the details screen. Codes without a product name
    /// show their key split at capitals (`coverageL` -> `"coverage L"`).
    pub fn label(self) -> Cow<'static, str> {
        match self {
            CoverageCode::CoverageA => "Dwelling".into(),
            CoverageCode::CoverageB => "Other Structures".into(),
            CoverageCode::CoverageC => "Personal Property".into(),
            CoverageCode::CoverageD => "Loss of Use".into(),
            CoverageCode::CoverageE => "Personal Liability".into(),
            CoverageCode::CoverageF => "Medical Payments".into(),
            CoverageCode::AllOtherPerilsDeductible => "All Other Perils Deductible".into(),
            CoverageCode::CoverageL | CoverageCode::CoverageM => split_camel(self.as_key()).into(),
        }
    }
}

/// Space before every ASCII capital.
fn split_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for CoverageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown coverage code: {0}")]
pub struct UnknownCoverageCode(pub String);

impl FromStr for CoverageCode {
    type Err = UnknownCoverageCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoverageCode::ALL
            .into_iter()
            .find(|c| c.as_key() == s)
            .ok_or_else(|| UnknownCoverageCode(s.to_string()))
    }
}

/// A limit counts when it is present, not numeric zero, and not `""`.
/// `null` is treated as absent.
pub fn is_applicable(limit: &Value) -> bool {
    match limit {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Keep the applicable entries of a term's `coverages` object, iterating the
/// fixed code set. Anything that is not an object yields an empty mapping;
/// keys outside the set are ignored.
pub fn filter_coverages(term_coverages: Option<&Value>) -> Coverages {
    let Some(map) = term_coverages.and_then(Value::as_object) else {
        return Coverages::new();
    };

    CoverageCode::ALL
        .into_iter()
        .filter_map(|code| {
            map.get(code.as_key())
                .filter(|v| is_applicable(v))
                .map(|v| (code, v.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_like_limits_are_dropped() {
        assert!(!is_applicable(&json!(0)));
        assert!(!is_applicable(&json!(0.0)));
        assert!(!is_applicable(&json!(-0.0)));
        assert!(!is_applicable(&json!("")));
        assert!(!is_applicable(&Value::Null));
        assert!(is_applicable(&json!("0")));
        assert!(is_applicable(&json!(250)));
    }

    #[test]
    fn parses_backend_keys() {
        assert_eq!("coverageL".parse::<CoverageCode>(), Ok(CoverageCode::CoverageL));
        assert_eq!(
            "allOtherPerilsDeductible".parse::<CoverageCode>(),
            Ok(CoverageCode::AllOtherPerilsDeductible)
        );
        assert!("coverageZ".parse::<CoverageCode>().is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(CoverageCode::CoverageA.label(), "Dwelling");
        assert_eq!(CoverageCode::CoverageD.label(), "Loss of Use");
        assert_eq!(
            CoverageCode::AllOtherPerilsDeductible.label(),
            "All Other Perils Deductible"
        );
        assert_eq!(CoverageCode::CoverageL.label(), "coverage L");
        assert_eq!(CoverageCode::CoverageM.label(), "coverage M");
        assert_eq!(split_camel("medPayLimit"), "med Pay Limit");
    }
}
