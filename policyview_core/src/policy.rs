use serde::{Deserialize, Serialize};

use crate::coverage::Coverages;
use crate::raw::RawPolicy;

/// Flat, display-ready view of one policy.
///
/// Every text field is always populated (falling back to `""` for the
/// identifying fields and the placeholder for the rest), `coverages` is
/// always a mapping, and the record cannot be changed once built. UI state
/// such as "expanded" lives in the presenter's overlay, never here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPolicy {
    pub(crate) policy_number: String,
    pub(crate) address: String,
    pub(crate) status: String,
    pub(crate) annual_premium: String,
    pub(crate) effective_dates: String,
    pub(crate) premium_due: String,
    pub(crate) agency_name: String,
    pub(crate) agency_address: String,
    pub(crate) coverage: String,
    pub(crate) coverages: Coverages,
    pub(crate) raw_policy: RawPolicy,
}

impl NormalizedPolicy {
    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn annual_premium(&self) -> &str {
        &self.annual_premium
    }

    pub fn effective_dates(&self) -> &str {
        &self.effective_dates
    }

    pub fn premium_due(&self) -> &str {
        &self.premium_due
    }

    pub fn agency_name(&self) -> &str {
        &self.agency_name
    }

    /// Taken from the current term's billing address.
    pub fn agency_address(&self) -> &str {
        &self.agency_address
    }

    /// Line-of-business label (`lobType`).
    pub fn coverage(&self) -> &str {
        &self.coverage
    }

    pub fn coverages(&self) -> &Coverages {
        &self.coverages
    }

    /// The record this view was built from, for fields not normalized yet.
    pub fn raw_policy(&self) -> &RawPolicy {
        &self.raw_policy
    }
}
