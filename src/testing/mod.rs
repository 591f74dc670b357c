//! # Table-driven REST API checks
//!
//! A [`TestCase`] declares one request and the response expected for it. The
//! [`runner::Runner`] executes a table of them in order, and every mismatch
//! becomes a [`Failure`] inside the case's [`CaseReport`]. Nothing here aborts
//! a run: failures are data, reduced into a [`RunReport`] at the end.

pub mod check;
#[cfg(test)]
pub(crate) mod mock_service;
pub mod report;
pub mod runner;

use std::fmt;

use serde::Serialize;

use crate::http::method::HttpMethod;
use check::Check;

/// One declarative request/expected-response record.
///
/// `expected_status` is always checked. Every other expectation is optional
/// and an absent one is skipped, never failed.
pub struct TestCase {
    pub message: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub requires_auth: bool,
    pub auth_organization_id: Option<u32>,
    pub expected_status: u16,
    pub expected_content_type: Option<String>,
    pub expected_response_status: Option<String>,
    pub additional_check: Option<Box<dyn Check>>,
}

impl TestCase {
    pub fn new(
        message: impl Into<String>,
        method: HttpMethod,
        endpoint: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            message: message.into(),
            endpoint: endpoint.into(),
            method,
            requires_auth: false,
            auth_organization_id: None,
            expected_status,
            expected_content_type: None,
            expected_response_status: None,
            additional_check: None,
        }
    }

    /// Authenticate as the default organization.
    pub fn with_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn with_auth_for(mut self, organization_id: u32) -> Self {
        self.requires_auth = true;
        self.auth_organization_id = Some(organization_id);
        self
    }

    pub fn expect_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.expected_content_type = Some(content_type.into());
        self
    }

    pub fn expect_response_status(mut self, status: impl Into<String>) -> Self {
        self.expected_response_status = Some(status.into());
        self
    }

    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.additional_check = Some(Box::new(check));
        self
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("message", &self.message)
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("requires_auth", &self.requires_auth)
            .field("auth_organization_id", &self.auth_organization_id)
            .field("expected_status", &self.expected_status)
            .field("expected_content_type", &self.expected_content_type)
            .field("expected_response_status", &self.expected_response_status)
            .field("additional_check", &self.additional_check)
            .finish()
    }
}

/// A single mismatch between what a case expected and what happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub check: &'static str,
    pub message: String,
}

impl Failure {
    pub fn new(check: &'static str, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check, self.message)
    }
}

/// Outcome of one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub message: String,
    pub method: HttpMethod,
    pub url: String,
    /// Status code actually received; `None` when no response arrived.
    pub status: Option<u16>,
    pub duration_ms: Option<u64>,
    pub failures: Vec<Failure>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failed_assertions: usize,
    pub duration_ms: u64,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn from_cases(cases: Vec<CaseReport>, duration_ms: u64) -> Self {
        let failed = cases.iter().filter(|case| !case.passed()).count();
        let failed_assertions = cases.iter().map(|case| case.failures.len()).sum();
        Self {
            total: cases.len(),
            passed: cases.len() - failed,
            failed,
            failed_assertions,
            duration_ms,
            cases,
        }
    }

    /// Number of failed cases, saturated so a large count never wraps to 0.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.failed).unwrap_or(u8::MAX)
    }
}
