use serde_json::Value;

// ---------------------------------------------------------------------
// Safe navigation over an untrusted JSON tree
// ---------------------------------------------------------------------

/// One step into a JSON tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(&'static str),
    Index(usize),
}

/// Follow `path` from `root`, yielding `None` as soon as any node is missing
/// or has the wrong shape (a key into an array, an index into an object, ...).
///
/// Every level is checked on its own, so a present `terms[0]` with an absent
/// `billing` resolves to `None` without disturbing sibling lookups.
pub fn lookup<'v>(root: &'v Value, path: &[Segment]) -> Option<&'v Value> {
    path.iter().try_fold(root, |node, seg| match *seg {
        Segment::Key(k) => node.as_object().and_then(|m| m.get(k)),
        Segment::Index(i) => node.as_array().and_then(|a| a.get(i)),
    })
}

/// Field paths read by the normalizer. `terms[0]` is the current term.
pub mod paths {
    use super::Segment::{self, Index, Key};

    pub const POLICY_NUMBER: &[Segment] = &[Key("policyNumber")];
    pub const ADDRESS: &[Segment] = &[Key("address"), Key("formattedAddress")];
    pub const PREMIUM_DUE: &[Segment] = &[Key("billing"), Key("currentAmountDueDisplay")];
    pub const AGENCY_NAME: &[Segment] = &[Key("agency"), Key("name")];
    pub const LOB_TYPE: &[Segment] = &[Key("lobType")];

    pub const STATUS: &[Segment] = &[Key("terms"), Index(0), Key("statusDisplay")];
    pub const TOTAL_PREMIUM: &[Segment] =
        &[Key("terms"), Index(0), Key("billing"), Key("totalPremium")];
    pub const EFFECTIVE_DATE: &[Segment] = &[Key("terms"), Index(0), Key("effectiveDate")];
    pub const EXPIRATION_DATE: &[Segment] = &[Key("terms"), Index(0), Key("expirationDate")];
    // Agency address comes from the term's billing address, not the agency record.
    pub const AGENCY_ADDRESS: &[Segment] = &[
        Key("terms"),
        Index(0),
        Key("billing"),
        Key("billingAddress"),
        Key("formattedAddress"),
    ];
    pub const TERM_COVERAGES: &[Segment] = &[Key("terms"), Index(0), Key("coverages")];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stops_at_wrong_shape() {
        let v = json!({ "terms": { "0": { "statusDisplay": "Active" } } });
        assert_eq!(lookup(&v, paths::STATUS), None);

        let v = json!({ "terms": [ { "billing": null } ] });
        assert_eq!(lookup(&v, paths::TOTAL_PREMIUM), None);
    }

    #[test]
    fn follows_nested_path() {
        let v = json!({ "terms": [ { "billing": { "totalPremium": 950 } } ] });
        assert_eq!(lookup(&v, paths::TOTAL_PREMIUM), Some(&json!(950)));
        assert_eq!(lookup(&v, &[]), Some(&v));
    }
}
