//! Filter engine.
//!
//! Steps run in a fixed order: row limit first (top-N by source rank), then
//! name, then price bounds. Limiting before filtering can leave fewer than N
//! rows even when more would qualify further down the page; that matches
//! how the tracker has always behaved.

use crypts_core::{FilterConfig, RawAssetRecord};
use rust_decimal::Decimal;
use tracing::trace;

/// Apply all active predicates from `config`.
///
/// Never reorders or modifies records. An empty result is valid.
pub fn apply_filters(records: Vec<RawAssetRecord>, config: &FilterConfig) -> Vec<RawAssetRecord> {
    let input = records.len();
    let mut records = records;

    if config.row_limit > 0 {
        records.truncate(config.row_limit);
    }

    if let Some(needle) = config.name_substring.as_deref() {
        records.retain(|r| r.name_contains(needle));
    }

    // A zero bound is unset.
    if let Some(min) = config.min_price.filter(|b| !b.is_zero()) {
        records.retain(|r| above(r.price, min));
    }

    if let Some(max) = config.max_price.filter(|b| !b.is_zero()) {
        records.retain(|r| below(r.price, max));
    }

    trace!(input, output = records.len(), "Filters applied");
    records
}

/// Unparseable prices never satisfy a bound.
#[inline]
fn above(price: Option<Decimal>, min: Decimal) -> bool {
    price.is_some_and(|p| p > min)
}

#[inline]
fn below(price: Option<Decimal>, max: Decimal) -> bool {
    price.is_some_and(|p| p < max)
}
