use reqwest::header::{HeaderName, HeaderValue};

use super::method::HttpMethod;
use crate::testing::TestCase;

/// A fully-addressed request, ready to be handed to the client.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl PreparedRequest {
    /// Target `base_url + endpoint` with the case's method.
    ///
    /// The endpoint is appended verbatim. Odd paths such as `..` or `...?`
    /// are part of the table on purpose, so nothing is validated here.
    pub fn for_case(base_url: &str, case: &TestCase) -> Self {
        let mut url = String::with_capacity(base_url.len() + case.endpoint.len());
        url.push_str(base_url);
        url.push_str(&case.endpoint);

        Self {
            method: case.method,
            url,
            headers: Vec::new(),
        }
    }

    pub fn header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.push((name, value));
    }

    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(header, _)| header.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
