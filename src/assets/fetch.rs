use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::assets::decode::decode_image;
use crate::assets::store::{OverlayImages, PreparedImage};
use crate::foundation::error::{AdrasterError, AdrasterResult};
use crate::template::OverlayUrls;

/// Remote fetch timeout; expiry surfaces as a `Fetch` error.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetch and decode a remote raster asset (mask or stroke overlay).
///
/// Every request carries a unique `cb` query parameter so intermediary
/// caches never serve a stale overlay for a template. Network failures,
/// non-2xx statuses and timeouts map to `Fetch`; a 2xx body that is not a
/// valid image maps to `Decode`.
pub async fn fetch_image(url: &str) -> AdrasterResult<PreparedImage> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| AdrasterError::fetch(format!("client init: {e}")))?;

    let res = client
        .get(url)
        .query(&[("cb", cache_buster())])
        .send()
        .await
        .map_err(|e| AdrasterError::fetch(format!("get '{url}': {e}")))?;

    let status = res.status();
    if !status.is_success() {
        return Err(AdrasterError::fetch(format!(
            "get '{url}': status {status}"
        )));
    }

    let body = res
        .bytes()
        .await
        .map_err(|e| AdrasterError::fetch(format!("read body '{url}': {e}")))?;
    decode_image(&body)
}

/// Fetch the mask and stroke overlays of a mask-crop template concurrently.
/// Either failure fails the pair; the caller decides the fallback.
pub async fn fetch_overlays(urls: &OverlayUrls) -> AdrasterResult<OverlayImages> {
    let (mask, stroke) = tokio::try_join!(fetch_image(&urls.mask), fetch_image(&urls.stroke))?;
    Ok(OverlayImages { mask, stroke })
}

fn cache_buster() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    nanos.to_string()
}
