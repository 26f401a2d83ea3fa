//! # Shared Constants
//!
//! This module provides a centralized location for constants shared across
//! the `berea` workspace. Using these constants helps to avoid "magic
//! numbers" and keeps the library and server in agreement.

/// Hard upper bound on the per-request result count. Bounds the size of the
/// batched enrichment join.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Result count used when the caller does not specify one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Score added per matching word when Strong's IDs are applied in boost
/// mode. Small on purpose: boosting reorders near-ties without letting a
/// lexically-matched verse leapfrog a semantically much closer one.
pub const DEFAULT_BOOST_WEIGHT: f64 = 0.05;
