//! The daily work list: one GET against the feed endpoint, no retry.

use crate::endpoint::{redact, Endpoints};
use crate::error::StartupError;
use crate::http::HttpGet;
use crate::model::WorkItem;

/// Fetches and decodes the work list. Any failure is fatal to the run.
pub fn fetch_work_list<C: HttpGet + ?Sized>(
    client: &C,
    endpoints: &Endpoints,
    date: Option<&str>,
) -> Result<Vec<WorkItem>, StartupError> {
    let url = endpoints.list_url(date);
    tracing::info!(url = %redact(&url), "fetching work list");
    let body = client
        .get(url.as_str())
        .map_err(|source| StartupError::FetchList {
            url: redact(&url),
            source,
        })?;
    let items = decode_work_list(&body)?;
    tracing::info!(count = items.len(), "work list fetched");
    Ok(items)
}

/// Decodes a JSON array of feed entries.
pub fn decode_work_list(body: &[u8]) -> Result<Vec<WorkItem>, StartupError> {
    serde_json::from_slice(body).map_err(StartupError::DecodeList)
}
