//policyview_core/normalize.rs

use crate::{
    cfg::NormalizeCfg,
    coverage::filter_coverages,
    nav::{lookup, paths},
    policy::NormalizedPolicy,
    raw::RawPolicy,
    render::{annual_premium, effective_dates, text_at},
};

/// Build the view of one raw policy with default constants.
///
/// Total: any JSON value (including `{}` or a non-object) yields a fully
/// populated record. Each field is resolved on its own path, so a missing
/// branch only defaults the fields below it.
pub fn normalize(raw: &RawPolicy) -> NormalizedPolicy {
    normalize_with_cfg(raw, &NormalizeCfg::default())
}

pub fn normalize_with_cfg(raw: &RawPolicy, cfg: &NormalizeCfg) -> NormalizedPolicy {
    let root = raw.value();
    let or_placeholder = |v: Option<String>| v.unwrap_or_else(|| cfg.placeholder.clone());

    NormalizedPolicy {
        policy_number: text_at(root, paths::POLICY_NUMBER).unwrap_or_default(),
        address: text_at(root, paths::ADDRESS).unwrap_or_default(),
        status: or_placeholder(text_at(root, paths::STATUS)),
        annual_premium: annual_premium(root, cfg),
        effective_dates: effective_dates(root, cfg),
        premium_due: or_placeholder(text_at(root, paths::PREMIUM_DUE)),
        agency_name: or_placeholder(text_at(root, paths::AGENCY_NAME)),
        agency_address: or_placeholder(text_at(root, paths::AGENCY_ADDRESS)),
        coverage: or_placeholder(text_at(root, paths::LOB_TYPE)),
        coverages: filter_coverages(lookup(root, paths::TERM_COVERAGES)),
        raw_policy: raw.clone(),
    }
}

/// Element-wise `normalize`, output order matches input order.
pub fn normalize_all(raws: &[RawPolicy]) -> Vec<NormalizedPolicy> {
    normalize_all_with_cfg(raws, &NormalizeCfg::default())
}

pub fn normalize_all_with_cfg(raws: &[RawPolicy], cfg: &NormalizeCfg) -> Vec<NormalizedPolicy> {
    raws.iter().map(|raw| normalize_with_cfg(raw, cfg)).collect()
}
