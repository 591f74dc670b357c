use std::io::{self, Write};

use super::{CaseReport, RunReport};
use crate::cli::OutputFormat;

/// Writes case outcomes and the final summary in the configured format.
pub struct Reporter<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    /// Called as soon as a case completes. JSON output waits for the summary.
    pub fn case(&mut self, case: &CaseReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }

        let verdict = if case.passed() { "PASS" } else { "FAIL" };
        writeln!(self.out, "[{verdict}] {}", case.message)?;
        match (case.status, case.duration_ms) {
            (Some(status), Some(ms)) => {
                writeln!(self.out, "       {} {} -> {status} ({ms} ms)", case.method, case.url)?
            }
            (Some(status), None) => writeln!(self.out, "       {} {} -> {status}", case.method, case.url)?,
            (None, _) => writeln!(self.out, "       {} {} -> no response", case.method, case.url)?,
        }
        for failure in &case.failures {
            writeln!(self.out, "       {failure}")?;
        }
        Ok(())
    }

    pub fn summary(&mut self, report: &RunReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "{} test cases: {} passed, {} failed ({} failed assertions) in {} ms",
                    report.total,
                    report.passed,
                    report.failed,
                    report.failed_assertions,
                    report.duration_ms
                )?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, report)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;
    use crate::testing::Failure;

    fn reports() -> (CaseReport, CaseReport) {
        let passed = CaseReport {
            message: "Check the entry point".into(),
            method: HttpMethod::Get,
            url: "http://localhost:8080/api/v1/".into(),
            status: Some(200),
            duration_ms: Some(4),
            failures: Vec::new(),
        };
        let failed = CaseReport {
            message: "Check unknown endpoint".into(),
            method: HttpMethod::Get,
            url: "http://localhost:8080/api/v1/foobar".into(),
            status: Some(200),
            duration_ms: Some(4),
            failures: vec![Failure::new("status", "Expected status 404, but got 200")],
        };
        (passed, failed)
    }

    #[test]
    fn text_output_lists_cases_and_summary() {
        let (passed, failed) = reports();
        let mut reporter = Reporter::new(OutputFormat::Text, Vec::new());
        reporter.case(&passed).unwrap();
        reporter.case(&failed).unwrap();
        reporter
            .summary(&RunReport::from_cases(vec![passed, failed], 12))
            .unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("[PASS] Check the entry point"));
        assert!(text.contains("GET http://localhost:8080/api/v1/ -> 200 (4 ms)"));
        assert!(text.contains("[FAIL] Check unknown endpoint"));
        assert!(text.contains("status: Expected status 404, but got 200"));
        assert!(text.contains("2 test cases: 1 passed, 1 failed (1 failed assertions) in 12 ms"));
    }

    #[test]
    fn text_output_without_response() {
        let (_, mut failed) = reports();
        failed.status = None;
        failed.duration_ms = None;
        let mut reporter = Reporter::new(OutputFormat::Text, Vec::new());
        reporter.case(&failed).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("-> no response"));
    }

    #[test]
    fn json_output_is_a_single_document() {
        let (passed, failed) = reports();
        let mut reporter = Reporter::new(OutputFormat::Json, Vec::new());
        reporter.case(&passed).unwrap();
        reporter.case(&failed).unwrap();
        reporter
            .summary(&RunReport::from_cases(vec![passed, failed], 3))
            .unwrap();

        let raw = reporter.into_inner();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["cases"][1]["method"], "GET");
        assert_eq!(json["cases"][1]["failures"][0]["check"], "status");
    }
}
