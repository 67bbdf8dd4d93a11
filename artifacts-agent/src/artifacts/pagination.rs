//! Read-only collection fetches. These endpoints carry no cooldown.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::transport::{ApiRequest, Transport};

/// Maximum page size accepted by the API
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a paginated collection
#[derive(Debug, Clone, Deserialize)]
pub struct Page<D> {
    pub data: Vec<D>,
    #[serde(default)]
    pub pages: Option<u32>,
}

/// Single-object response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Single<D> {
    pub data: D,
}

/// Issue a GET and decode the JSON body, failing on non-2xx statuses
pub async fn fetch_json<T, D>(transport: &T, request: &ApiRequest) -> Result<D, ApiError>
where
    T: Transport,
    D: DeserializeOwned,
{
    let response = transport.send(request).await?;
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            path: request.path.clone(),
            message: response.message(),
        });
    }

    serde_json::from_value(response.body).map_err(|source| ApiError::InvalidResponse {
        path: request.path.clone(),
        source,
    })
}

/// Fetch every page of a collection, concatenated in server order.
///
/// Page 1 also reports the total page count.
pub async fn fetch_all<T, D>(transport: &T, path: &str, page_size: u32) -> Result<Vec<D>, ApiError>
where
    T: Transport,
    D: DeserializeOwned,
{
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let page_request = |page: u32| {
        ApiRequest::get(path)
            .with_query("page", page)
            .with_query("size", page_size)
    };

    let first: Page<D> = fetch_json(transport, &page_request(1)).await?;
    let total_pages = first.pages.unwrap_or(1);
    let mut all = first.data;

    for page in 2..=total_pages {
        let next: Page<D> = fetch_json(transport, &page_request(page)).await?;
        all.extend(next.data);
    }

    debug!(path, pages = total_pages, items = all.len(), "Fetched collection");
    Ok(all)
}
