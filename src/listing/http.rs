//! Blocking HTTP plumbing shared by the remote backends.

use super::backend::ListError;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, ListError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("scene-viewer/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send a request and decode a JSON body.
///
/// Non-2xx responses become [`ListError::Status`] carrying the response body,
/// so backend diagnostics (bad key, unknown folder) reach the user.
pub(crate) fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ListError> {
    let response = request.header(ACCEPT, "application/json").send()?;
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(ListError::status(status.as_u16(), &body));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Build a URL from a fixed base, extra path segments (percent-encoded) and
/// query parameters.
pub(crate) fn build_url(base: &'static str, segments: &[&str], params: &[(&str, &str)]) -> Url {
    let mut url = Url::parse(base).expect("base URLs are valid constants");
    if !segments.is_empty()
        && let Ok(mut path) = url.path_segments_mut()
    {
        path.pop_if_empty().extend(segments);
    }
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_appends_segments_and_params() {
        let url = build_url(
            "https://example.com/api/",
            &["b", "my file.png"],
            &[("q", "'x' in parents"), ("n", "1")],
        );
        assert_eq!(
            url.as_str(),
            "https://example.com/api/b/my%20file.png?q=%27x%27+in+parents&n=1"
        );
    }

    #[test]
    fn build_url_without_extras_is_base() {
        let url = build_url("https://example.com/files", &[], &[]);
        assert_eq!(url.as_str(), "https://example.com/files");
    }

    #[test]
    fn build_url_encodes_slashes_inside_segments() {
        let url = build_url("https://example.com/", &["a/b"], &[]);
        assert_eq!(url.as_str(), "https://example.com/a%2Fb");
    }

    #[test]
    fn client_builds() {
        assert!(build_http_client(30).is_ok());
    }
}
