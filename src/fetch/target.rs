// src/fetch/target.rs
// =============================================================================
// Turns the caller's string into a URL we are willing to request.
//
// Accepted: absolute http:// and https:// URLs with a host.
// Rejected (InvalidUrl): empty input, relative references, strings with no
// scheme, cannot-be-a-base URLs like `mailto:` and any other scheme.
// =============================================================================

use super::error::FetchError;
use url::Url;

pub fn parse_target(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|_| FetchError::InvalidUrl)?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl);
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::InvalidUrl);
    }

    Ok(url)
}
