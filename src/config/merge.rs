//! Merge order and defaults for configuration sources.

pub mod merge_policy;
