use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::uri::{Scheme, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client as VerbatimClient;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use reqwest::Client;
use reqwest::header::HeaderMap;
use tracing::{debug, trace};

use super::request::PreparedRequest;
use super::response::HttpResponse;
use crate::error::{Error, Result};

/// One `reqwest::Client` shared by the whole run, plus a plain HTTP/1
/// client for paths `reqwest` would rewrite.
///
/// `reqwest` parses every URL with the `url` crate, which resolves `.` and
/// `..` segments before the request leaves. Such paths go through hyper with
/// an `http::Uri` instead, which keeps them as written.
pub struct ApiClient {
    client: Client,
    verbatim: VerbatimClient<HttpConnector, Empty<Bytes>>,
    timeout: Option<Duration>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("client", &self.client)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// A zero timeout is the same as none. Without a timeout a hung request
    /// blocks the run.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let timeout = timeout.filter(|t| !t.is_zero());
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::ClientBuild)?;
        let verbatim = VerbatimClient::builder(TokioExecutor::new()).build_http();

        Ok(Self {
            client,
            verbatim,
            timeout,
        })
    }

    pub async fn send(&self, request: &PreparedRequest) -> Result<HttpResponse> {
        let started = Instant::now();
        let (status, headers, bytes) = if has_dot_segments(&request.url) {
            trace!(url = %request.url, "sending with the path kept verbatim");
            self.send_verbatim(request).await?
        } else {
            self.send_normalized(request).await?
        };

        let response = HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            duration_ms: started.elapsed().as_millis(),
        };
        debug!(
            method = %request.method,
            url = %request.url,
            status,
            content_type = response.content_type().unwrap_or_default(),
            size = bytes.len(),
            duration_ms = %response.duration_ms,
            "response received"
        );

        Ok(response)
    }

    async fn send_normalized(&self, request: &PreparedRequest) -> Result<(u16, HeaderMap, Bytes)> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.clone(), value.clone());
        }

        let response = builder.send().await.map_err(Error::Send)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(Error::Body)?;
        Ok((status, headers, bytes))
    }

    async fn send_verbatim(&self, request: &PreparedRequest) -> Result<(u16, HeaderMap, Bytes)> {
        let uri: Uri = request.url.parse().map_err(|err: http::uri::InvalidUri| Error::InvalidUrl {
            url: request.url.clone(),
            reason: err.to_string(),
        })?;
        if uri.scheme() != Some(&Scheme::HTTP) {
            return Err(Error::UnsupportedScheme(request.url.clone()));
        }

        let mut builder = http::Request::builder()
            .method(http::Method::from(request.method))
            .uri(uri);
        for (name, value) in &request.headers {
            builder = builder.header(name.clone(), value.clone());
        }
        let outgoing = builder.body(Empty::new()).map_err(Error::InvalidRequest)?;

        let exchange = async {
            let response = self.verbatim.request(outgoing).await.map_err(Error::VerbatimSend)?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(Error::VerbatimBody)?
                .to_bytes();
            Ok::<_, Error>((status, headers, bytes))
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| Error::Timeout(timeout))?,
            None => exchange.await,
        }
    }
}

/// Whether the path of `url` holds a segment the `url` crate would resolve
/// away, including its percent-encoded spellings.
fn has_dot_segments(url: &str) -> bool {
    let Ok(uri) = url.parse::<Uri>() else {
        return false;
    };
    uri.path().split('/').any(|segment| {
        matches!(
            segment.to_ascii_lowercase().as_str(),
            "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_segments_are_detected_in_the_path_only() {
        assert!(has_dot_segments("http://localhost:8080/api/v1/.."));
        assert!(has_dot_segments("http://localhost:8080/api/v1/./info"));
        assert!(has_dot_segments("http://localhost:8080/api/v1/%2E%2e"));
        assert!(!has_dot_segments("http://localhost:8080/api/v1/...?"));
        assert!(!has_dot_segments("http://localhost:8080/api/v1/info?next=.."));
        assert!(!has_dot_segments("http://localhost:8080/api/v1/"));
        assert!(!has_dot_segments("not a url"));
    }

    #[test]
    fn zero_timeout_means_none() {
        let client = ApiClient::new(Some(Duration::ZERO)).unwrap();
        assert_eq!(client.timeout, None);
        let client = ApiClient::new(Some(Duration::from_secs(3))).unwrap();
        assert_eq!(client.timeout, Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn https_dot_segments_are_refused() {
        let client = ApiClient::new(None).unwrap();
        let request = PreparedRequest {
            method: crate::http::method::HttpMethod::Get,
            url: "https://localhost:8443/api/v1/..".into(),
            headers: Vec::new(),
        };
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)), "{err:?}");
    }
}
