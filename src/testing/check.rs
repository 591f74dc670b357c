//! Response checkers.
//!
//! Built-in expectations and custom checks share the [`Check`] trait, so the
//! runner has a single accumulation path for every kind of failure.

use std::collections::HashMap;
use std::fmt;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::Failure;
use crate::http::response::HttpResponse;

/// Status value the service reports on success.
pub const OK_STATUS: &str = "ok";

/// Keys every `info` payload must carry.
pub const INFO_KEYS: [&str; 5] = [
    "BuildBranch",
    "BuildCommit",
    "BuildTime",
    "BuildVersion",
    "UtilsVersion",
];

pub trait Check: fmt::Debug + Send + Sync {
    /// Every problem found; an empty list means the response passed.
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure>;
}

#[derive(Debug, Deserialize)]
struct StatusOnlyResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    status: String,
    info: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ClustersResponse {
    // must be present; names are not inspected
    #[allow(dead_code)]
    clusters: Vec<String>,
    status: String,
}

/// Exact status code.
#[derive(Debug, Clone, Copy)]
pub struct StatusCheck(pub u16);

impl Check for StatusCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        if response.status == self.0 {
            return Vec::new();
        }
        vec![Failure::new(
            "status",
            format!("Expected status {}, but got {}", self.0, response.status),
        )]
    }
}

/// Exact header value.
#[derive(Debug, Clone)]
pub struct HeaderCheck {
    pub name: String,
    pub expected: String,
}

impl HeaderCheck {
    pub fn content_type(expected: impl Into<String>) -> Self {
        Self {
            name: CONTENT_TYPE.as_str().to_string(),
            expected: expected.into(),
        }
    }
}

impl Check for HeaderCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        match response.header(&self.name) {
            Some(actual) if actual == self.expected => Vec::new(),
            Some(actual) => vec![Failure::new(
                "header",
                format!(
                    "Expected header {} to be '{}', but got '{}'",
                    self.name, self.expected, actual
                ),
            )],
            None => vec![Failure::new(
                "header",
                format!(
                    "Expected header {} to be '{}', but it is missing",
                    self.name, self.expected
                ),
            )],
        }
    }
}

/// Header value starting with a prefix, for values that may carry extra
/// parameters (e.g. `text/plain; version=0.0.4`).
#[derive(Debug, Clone)]
pub struct HeaderPrefixCheck {
    pub name: String,
    pub prefix: String,
}

impl HeaderPrefixCheck {
    pub fn content_type(prefix: impl Into<String>) -> Self {
        Self {
            name: CONTENT_TYPE.as_str().to_string(),
            prefix: prefix.into(),
        }
    }
}

impl Check for HeaderPrefixCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        let actual = response.header(&self.name).unwrap_or_default();
        if actual.starts_with(&self.prefix) {
            return Vec::new();
        }
        vec![Failure::new(
            "header",
            format!(
                "Expected header {} to start with '{}', but got '{}'",
                self.name, self.prefix, actual
            ),
        )]
    }
}

/// Exact match of the `status` field of a JSON body.
#[derive(Debug, Clone)]
pub struct ResponseStatusCheck(pub String);

impl Check for ResponseStatusCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        match response.json::<StatusOnlyResponse>() {
            Err(err) => vec![Failure::new("response-status", err.to_string())],
            Ok(body) if body.status == self.0 => Vec::new(),
            Ok(body) => vec![Failure::new(
                "response-status",
                format!(
                    "Expected status '{}', but got '{}' instead",
                    self.0, body.status
                ),
            )],
        }
    }
}

/// Body must report some status other than [`OK_STATUS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorStatusCheck;

impl Check for ErrorStatusCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        match response.json::<StatusOnlyResponse>() {
            Err(err) => vec![Failure::new("error-status", err.to_string())],
            Ok(body) if body.status == OK_STATUS => vec![Failure::new(
                "error-status",
                format!("Expected error status, but got '{}' instead", body.status),
            )],
            Ok(_) => Vec::new(),
        }
    }
}

/// `info` payload: ok status and every key of [`INFO_KEYS`] present.
/// Each missing key is reported separately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoPayloadCheck;

impl Check for InfoPayloadCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        let body = match response.json::<InfoResponse>() {
            Ok(body) => body,
            Err(err) => return vec![Failure::new("info", err.to_string())],
        };

        let mut failures = Vec::new();
        if body.status != OK_STATUS {
            failures.push(Failure::new(
                "info",
                format!("Expected status '{OK_STATUS}', but got '{}'", body.status),
            ));
        }
        if body.info.is_empty() {
            failures.push(Failure::new("info", "Info map is empty"));
        }
        for key in INFO_KEYS {
            if !body.info.contains_key(key) {
                failures.push(Failure::new("info", format!("Info map does not contain '{key}'")));
            }
        }
        failures
    }
}

/// Cluster listing: body parses as a cluster list with ok status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterListCheck;

impl Check for ClusterListCheck {
    fn evaluate(&self, response: &HttpResponse) -> Vec<Failure> {
        let body = match response.json::<ClustersResponse>() {
            Ok(body) => body,
            Err(err) => return vec![Failure::new("clusters", err.to_string())],
        };

        if body.status == OK_STATUS {
            return Vec::new();
        }
        vec![Failure::new(
            "clusters",
            format!("Expected status '{OK_STATUS}', but got '{}'", body.status),
        )]
    }
}
