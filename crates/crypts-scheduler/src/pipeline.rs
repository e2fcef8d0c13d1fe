//! One fetch cycle: fetch, extract, filter, map.

use std::sync::Arc;

use crypts_core::{FilterConfig, RenderRow};
use crypts_feed::{PageSource, RowExtractor};
use crypts_view::{apply_filters, map_records};
use tracing::debug;

use crate::error::{CycleError, CycleResult};

/// Run a full cycle against a snapshot of the filter settings.
///
/// Any stage failure aborts the cycle; there is no partial result.
/// Extraction runs on the blocking pool since parsing a full page is
/// CPU-bound.
pub async fn run_cycle(
    source: &dyn PageSource,
    extractor: Arc<RowExtractor>,
    filter: &FilterConfig,
) -> CycleResult<Vec<RenderRow>> {
    let markup = source.fetch().await?;

    let limit = filter.row_limit;
    let records = tokio::task::spawn_blocking(move || extractor.extract(&markup, limit))
        .await
        .map_err(|e| CycleError::Worker(e.to_string()))??;

    let extracted = records.len();
    let kept = apply_filters(records, filter);
    debug!(extracted, kept = kept.len(), "Cycle pipeline finished");

    Ok(map_records(&kept))
}
