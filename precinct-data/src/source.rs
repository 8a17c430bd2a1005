//! Fetching and classifying a single remote source.

use precinct_core::RawFeatureCollection;
use serde_json::Value;

use crate::{FetchDiagnostics, SourceFetchError, Transport};

/// A source that yielded a usable feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSource {
    /// Decoded collection.
    pub collection: RawFeatureCollection,
    /// Request diagnostics.
    pub diagnostics: FetchDiagnostics,
}

/// Fetch `url` and decode it as a raw feature collection.
///
/// # Errors
///
/// Failures are classified in this order: transport failure, non-2xx
/// status, HTML body, invalid JSON, and JSON without a `features` array.
pub async fn fetch_source<T>(transport: &T, url: &str) -> Result<FetchedSource, SourceFetchError>
where
    T: Transport + ?Sized,
{
    fetch_with_diagnostics(transport, url).await.1
}

/// Like [`fetch_source`] but keeps diagnostics for responses that were
/// rejected after arriving.
pub(crate) async fn fetch_with_diagnostics<T>(
    transport: &T,
    url: &str,
) -> (
    Option<FetchDiagnostics>,
    Result<FetchedSource, SourceFetchError>,
)
where
    T: Transport + ?Sized,
{
    let response = match transport.get(url).await {
        Ok(response) => response,
        Err(source) => return (None, Err(SourceFetchError::Transport { source })),
    };
    let diagnostics = response.diagnostics.clone();
    let outcome = if response.is_success() {
        decode_body(url, &response.body).map(|collection| FetchedSource {
            collection,
            diagnostics: response.diagnostics,
        })
    } else {
        Err(SourceFetchError::HttpStatus {
            url: url.to_owned(),
            status: response.status,
        })
    };
    (Some(diagnostics), outcome)
}

fn decode_body(url: &str, body: &str) -> Result<RawFeatureCollection, SourceFetchError> {
    if looks_like_html(body) {
        return Err(SourceFetchError::HtmlBody {
            url: url.to_owned(),
        });
    }
    let value: Value =
        serde_json::from_str(body).map_err(|source| SourceFetchError::InvalidJson {
            url: url.to_owned(),
            source,
        })?;
    RawFeatureCollection::from_value(value).map_err(|source| SourceFetchError::Malformed {
        url: url.to_owned(),
        source,
    })
}

fn looks_like_html(body: &str) -> bool {
    let trimmed = body.trim_start();
    ["<!doctype", "<html"].iter().any(|marker| {
        trimmed
            .get(..marker.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(marker))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubTransport;
    use crate::TransportError;
    use precinct_core::TransformError;
    use rstest::rstest;
    use serde_json::json;

    const URL: &str = "https://example.test/cd1.json";

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build Tokio runtime")
            .block_on(future)
    }

    #[rstest]
    #[case("<!DOCTYPE html><html></html>")]
    #[case("  \n<html><body>challenge</body></html>")]
    #[case("<HTML>")]
    fn html_bodies_are_detected(#[case] body: &str) {
        assert!(looks_like_html(body));
    }

    #[rstest]
    #[case("{\"features\": []}")]
    #[case("<h")]
    #[case("")]
    fn non_html_bodies_pass(#[case] body: &str) {
        assert!(!looks_like_html(body));
    }

    #[rstest]
    fn success_keeps_diagnostics() {
        let transport =
            StubTransport::new().with_json(URL, json!({"type": "FeatureCollection", "features": []}));
        let fetched = block_on(fetch_source(&transport, URL)).expect("fetch succeeds");
        assert!(fetched.collection.features.is_empty());
        assert_eq!(fetched.diagnostics.url, URL);
        assert_eq!(fetched.diagnostics.status, 200);
    }

    #[rstest]
    fn non_success_status_is_classified_before_body() {
        let transport = StubTransport::new().with_response(URL, 503, "<html>busy</html>");
        match block_on(fetch_source(&transport, URL)) {
            Err(SourceFetchError::HttpStatus { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[rstest]
    fn html_challenge_is_classified() {
        let transport = StubTransport::new().with_response(URL, 200, "<!doctype html><p>wait</p>");
        assert!(matches!(
            block_on(fetch_source(&transport, URL)),
            Err(SourceFetchError::HtmlBody { .. })
        ));
    }

    #[rstest]
    fn invalid_json_is_classified() {
        let transport = StubTransport::new().with_response(URL, 200, "{ not json");
        assert!(matches!(
            block_on(fetch_source(&transport, URL)),
            Err(SourceFetchError::InvalidJson { .. })
        ));
    }

    #[rstest]
    fn json_without_features_is_malformed() {
        let transport = StubTransport::new().with_json(URL, json!({"type": "FeatureCollection"}));
        assert!(matches!(
            block_on(fetch_source(&transport, URL)),
            Err(SourceFetchError::Malformed {
                source: TransformError::MissingFeatures,
                ..
            })
        ));
    }

    #[rstest]
    fn unscripted_url_is_a_transport_failure() {
        let (diagnostics, outcome) =
            block_on(fetch_with_diagnostics(&StubTransport::new(), URL));
        assert!(diagnostics.is_none());
        assert!(matches!(
            outcome,
            Err(SourceFetchError::Transport {
                source: TransportError::Network { .. }
            })
        ));
    }
}
