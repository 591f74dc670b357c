//! The fixed test table for the results aggregator REST API.
//!
//! Cases run top to bottom, each independent of the others. Some entries
//! repeat the same templated expectation for different organizations; that
//! duplication is intended.

use crate::http::method::HttpMethod;
use crate::testing::TestCase;
use crate::testing::check::{
    ClusterListCheck, ErrorStatusCheck, HeaderPrefixCheck, InfoPayloadCheck, OK_STATUS,
};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_METRICS: &str = "text/plain";

pub const MISSING_AUTH_TOKEN: &str = "Missing auth token";
pub const IMPROPER_ORGANIZATION_ID: &str = "foobar";
pub const UNKNOWN_ORGANIZATION_ID: u32 = 100_000;

const KNOWN_ORGANIZATION_ID: u32 = 1;

fn clusters_for(organization: impl std::fmt::Display) -> String {
    format!("organizations/{organization}/clusters")
}

fn not_found_message(organization: u32) -> String {
    format!("Item with ID {organization} was not found in the storage")
}

fn org_id_parse_error(value: &str) -> String {
    format!("Error during parsing param 'org_id' with value '{value}'. Error: 'unsigned integer expected'")
}

pub fn test_cases() -> Vec<TestCase> {
    let mut cases = vec![
        TestCase::new(
            "Check the entry point to REST API using HTTP GET method",
            HttpMethod::Get,
            "",
            200,
        )
        .with_auth()
        .expect_content_type(CONTENT_TYPE_JSON)
        .expect_response_status(OK_STATUS),
    ];

    for method in [
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ] {
        cases.push(
            TestCase::new(
                format!("Check the entry point to REST API using HTTP {method} method"),
                method,
                "",
                405,
            )
            .with_auth(),
        );
    }

    cases.extend([
        TestCase::new(
            "Check the entry point to REST API without identity",
            HttpMethod::Get,
            "",
            401,
        )
        .expect_content_type(CONTENT_TYPE_JSON)
        .expect_response_status(MISSING_AUTH_TOKEN),
        TestCase::new("Check non-existing endpoint", HttpMethod::Get, "foobar", 404).with_auth(),
        TestCase::new("Check path leaving the API prefix", HttpMethod::Get, "..", 404).with_auth(),
        TestCase::new("Check path with dots and empty query", HttpMethod::Get, "...?", 404)
            .with_auth(),
        TestCase::new(
            "Check the endpoint to retrieve version info",
            HttpMethod::Get,
            "info",
            200,
        )
        .with_auth()
        .expect_content_type(CONTENT_TYPE_JSON)
        .with_check(InfoPayloadCheck),
        TestCase::new(
            "Check the endpoint to retrieve version info without identity",
            HttpMethod::Get,
            "info",
            401,
        )
        .expect_response_status(MISSING_AUTH_TOKEN),
        TestCase::new("Check the metrics endpoint", HttpMethod::Get, "metrics", 200)
            .with_check(HeaderPrefixCheck::content_type(CONTENT_TYPE_METRICS)),
        TestCase::new(
            "Check the endpoint to retrieve clusters for organization",
            HttpMethod::Get,
            clusters_for(KNOWN_ORGANIZATION_ID),
            200,
        )
        .with_auth()
        .expect_content_type(CONTENT_TYPE_JSON)
        .expect_response_status(OK_STATUS)
        .with_check(ClusterListCheck),
        TestCase::new(
            "Check the endpoint to retrieve clusters for organization without identity",
            HttpMethod::Get,
            clusters_for(KNOWN_ORGANIZATION_ID),
            401,
        )
        .expect_content_type(CONTENT_TYPE_JSON)
        .expect_response_status(MISSING_AUTH_TOKEN),
        TestCase::new(
            "Check the endpoint to retrieve clusters using HTTP POST method",
            HttpMethod::Post,
            clusters_for(KNOWN_ORGANIZATION_ID),
            405,
        )
        .with_auth(),
        TestCase::new(
            "Check the endpoint to retrieve clusters for improper organization",
            HttpMethod::Get,
            clusters_for(IMPROPER_ORGANIZATION_ID),
            400,
        )
        .with_auth()
        .expect_content_type(CONTENT_TYPE_JSON)
        .expect_response_status(org_id_parse_error(IMPROPER_ORGANIZATION_ID))
        .with_check(ErrorStatusCheck),
    ]);

    for organization in [UNKNOWN_ORGANIZATION_ID, UNKNOWN_ORGANIZATION_ID + 1] {
        cases.push(
            TestCase::new(
                "Check the endpoint to retrieve clusters for unknown organization",
                HttpMethod::Get,
                clusters_for(organization),
                404,
            )
            .with_auth_for(organization)
            .expect_content_type(CONTENT_TYPE_JSON)
            .expect_response_status(not_found_message(organization)),
        );
    }

    cases
}
