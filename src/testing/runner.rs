use std::fmt;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::check::{Check, HeaderCheck, ResponseStatusCheck, StatusCheck};
use super::{CaseReport, Failure, RunReport, TestCase};
use crate::auth;
use crate::error::Result;
use crate::http::client::ApiClient;
use crate::http::request::PreparedRequest;
use crate::http::response::HttpResponse;

/// Lifecycle of one case. `Reported` is reached whatever happens on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseState {
    Pending,
    Sent,
    Validated,
    Reported,
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CaseState::Pending => "pending",
            CaseState::Sent => "sent",
            CaseState::Validated => "validated",
            CaseState::Reported => "reported",
        };
        f.write_str(label)
    }
}

/// Executes a table sequentially, one case at a time.
#[derive(Debug)]
pub struct Runner {
    client: ApiClient,
    base_url: String,
}

impl Runner {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Run every case in order. `on_case` sees each report as soon as its
    /// case completes.
    pub async fn run<F>(&self, cases: &[TestCase], mut on_case: F) -> RunReport
    where
        F: FnMut(&CaseReport),
    {
        let started = Instant::now();
        let mut reports = Vec::with_capacity(cases.len());

        for case in cases {
            let report = self.run_case(case).await;
            on_case(&report);
            reports.push(report);
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let report = RunReport::from_cases(reports, duration_ms);
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            failed_assertions = report.failed_assertions,
            duration_ms = report.duration_ms,
            "run finished"
        );
        report
    }

    pub async fn run_case(&self, case: &TestCase) -> CaseReport {
        let mut state = CaseState::Pending;
        debug!(message = %case.message, method = %case.method, endpoint = %case.endpoint, "running case");

        let mut request = PreparedRequest::for_case(&self.base_url, case);
        let (response, failures) = match self.send(case, &mut request).await {
            Ok(response) => {
                enter(&mut state, CaseState::Sent, case);
                let failures = validate(case, &response);
                enter(&mut state, CaseState::Validated, case);
                (Some(response), failures)
            }
            Err(err) => {
                warn!(message = %case.message, url = %request.url, error = %err, "request not completed");
                (None, vec![Failure::new("transport", err.to_string())])
            }
        };
        enter(&mut state, CaseState::Reported, case);

        CaseReport {
            message: case.message.clone(),
            method: case.method,
            url: request.url,
            status: response.as_ref().map(|response| response.status),
            duration_ms: response
                .as_ref()
                .map(|response| u64::try_from(response.duration_ms).unwrap_or(u64::MAX)),
            failures,
        }
    }

    async fn send(&self, case: &TestCase, request: &mut PreparedRequest) -> Result<HttpResponse> {
        auth::apply_identity(request, case)?;
        self.client.send(request).await
    }
}

fn enter(state: &mut CaseState, next: CaseState, case: &TestCase) {
    trace!(message = %case.message, from = %state, to = %next, "case state");
    *state = next;
}

/// Check a response against every expectation of the case.
///
/// Order: status, content type, additional check, JSON status field. A
/// failing check never stops the ones after it.
pub fn validate(case: &TestCase, response: &HttpResponse) -> Vec<Failure> {
    let mut failures = StatusCheck(case.expected_status).evaluate(response);

    if let Some(expected) = &case.expected_content_type {
        failures.extend(HeaderCheck::content_type(expected.as_str()).evaluate(response));
    }

    if let Some(check) = &case.additional_check {
        failures.extend(check.evaluate(response));
    }

    if let Some(expected) = &case.expected_response_status {
        failures.extend(ResponseStatusCheck(expected.clone()).evaluate(response));
    }

    failures
}
