//! Policy presenter: payload in, display cards out.
//!
//! Joins normalized policies with the overlay's per-item view state. The
//! policies themselves are never modified; each call builds fresh cards.

use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use policyview_core::{normalize_with_cfg, NormalizeCfg, NormalizedPolicy, RawPolicy};

use crate::adapter::{policies_from_body, BackendPayloadExtractor, PolicyExtractor};
use crate::overlay::ViewOverlay;

/// One policy as a screen shows it: the immutable view plus its UI state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyCard {
    /// Overlay key for this card.
    pub key: String,
    pub policy: NormalizedPolicy,
    pub expanded: bool,
}

/// Overlay keys for a list of presented policies, one per policy and all
/// distinct:
/// - `policy:<number>` for the first card carrying a policy number
/// - `policy#<n>:<number>` for its `n`-th repeat (`n >= 2`)
/// - `index:<i>` for a card without a number at list position `i`
///
/// The prefixes never overlap, and `n` ends at the first `:`, so no policy
/// number can produce another card's key.
pub fn card_keys(policies: &[NormalizedPolicy]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    policies
        .iter()
        .enumerate()
        .map(|(idx, policy)| {
            let number = policy.policy_number();
            if number.is_empty() {
                return format!("index:{idx}");
            }
            let n = seen.entry(number).or_default();
            *n += 1;
            match *n {
                1 => format!("policy:{number}"),
                n => format!("policy#{n}:{number}"),
            }
        })
        .collect()
}

#[derive(Debug)]
pub struct PolicyPresenter<X = BackendPayloadExtractor> {
    cfg: NormalizeCfg,
    extractor: X,
    overlay: ViewOverlay,
}

impl Default for PolicyPresenter {
    fn default() -> Self {
        Self::new(NormalizeCfg::default())
    }
}

impl PolicyPresenter {
    /// Presenter over the standard backend envelope.
    pub fn new(cfg: NormalizeCfg) -> Self {
        Self::with_extractor(cfg, BackendPayloadExtractor::default())
    }
}

impl<X: PolicyExtractor> PolicyPresenter<X> {
    pub fn with_extractor(cfg: NormalizeCfg, extractor: X) -> Self {
        Self {
            cfg,
            extractor,
            overlay: ViewOverlay::new(),
        }
    }

    pub fn cfg(&self) -> &NormalizeCfg {
        &self.cfg
    }

    pub fn overlay(&self) -> &ViewOverlay {
        &self.overlay
    }

    /// Cards for a parsed payload, in payload order.
    #[instrument(level = "debug", skip_all)]
    pub fn present(&self, payload: &Value) -> Vec<PolicyCard> {
        let raws = self.extractor.extract(payload);
        self.cards(&raws)
    }

    /// Cards for a fetch result. Transport errors and bad bodies give `[]`.
    pub fn present_body<E: Display>(&self, body: Result<&str, E>) -> Vec<PolicyCard> {
        let raws = policies_from_body(&self.extractor, body);
        self.cards(&raws)
    }

    /// Cards for records the caller already extracted.
    pub fn cards(&self, raws: &[RawPolicy]) -> Vec<PolicyCard> {
        let policies: Vec<NormalizedPolicy> = raws
            .iter()
            .map(|raw| normalize_with_cfg(raw, &self.cfg))
            .collect();
        let keys = card_keys(&policies);
        let cards: Vec<PolicyCard> = keys
            .into_iter()
            .zip(policies)
            .map(|(key, policy)| {
                let expanded = self.overlay.is_expanded(&key);
                PolicyCard {
                    key,
                    policy,
                    expanded,
                }
            })
            .collect();
        debug!(count = cards.len(), "presented policy cards");
        cards
    }

    /// Flip a card's expanded flag; returns the new value.
    pub fn toggle(&self, key: &str) -> bool {
        self.overlay.toggle_expanded(key)
    }
}
