//! Two-tier catalog retrieval.

use farmstand_core::Product;
use tracing::{instrument, warn};

use super::normalize::{normalize_rows, parse_csv};
use crate::backend::{BackendClient, BackendError};

/// Fetch the catalog, preferring the JSON action and falling back to the
/// published CSV export.
///
/// Any primary-tier failure - transport, HTTP status, envelope parse, or an
/// error envelope - falls through to the CSV tier. An `Err` therefore means
/// both tiers failed; callers degrade that to an empty catalog and a toast
/// rather than propagating it to rendering.
#[instrument(skip(client))]
pub async fn fetch(client: &BackendClient) -> Result<Vec<Product>, BackendError> {
    match client.get_products().await {
        Ok(rows) => Ok(normalize_rows(rows)),
        Err(primary) => {
            warn!(error = %primary, "primary catalog tier failed, trying CSV export");
            let text = client.get_csv_export().await?;
            Ok(normalize_rows(parse_csv(&text)))
        }
    }
}
