pub mod nav;
pub mod raw;

pub mod cfg;
pub mod coverage;
pub mod render;
pub mod policy;
pub mod normalize;

pub use nav::{lookup, paths, Segment};
pub use raw::RawPolicy;

pub use cfg::{ConfigError, NormalizeCfg};
pub use coverage::{filter_coverages, is_applicable, CoverageCode, Coverages, UnknownCoverageCode};
pub use policy::NormalizedPolicy;
pub use normalize::{normalize, normalize_all, normalize_all_with_cfg, normalize_with_cfg};
