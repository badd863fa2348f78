//! policyview_presenter
//!
//! Outside-world facing layer around `policyview_core`.
//!
//! Responsibilities:
//! - unwrap the backend payload envelope into raw policy records
//! - turn fetch/parse failures into an empty list
//! - own per-card view state (expanded cards), keyed by collision-free card keys
//! - join normalized policies with their view state
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no field mapping (lives in core)

pub mod adapter;
pub mod overlay;
pub mod presenter;

pub use adapter::{
    parse_payload,
    policies_from_body,
    value_kind,
    BackendPayloadExtractor,
    PayloadError,
    PayloadKeys,
    PolicyExtractor,
};

pub use overlay::{OverlaySnapshot, RestoreStats, ViewOverlay, ViewState};

pub use presenter::{card_keys, PolicyCard, PolicyPresenter};
