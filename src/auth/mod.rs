//! # Identity header
//!
//! The service under test trusts a gateway-provided identity instead of doing
//! authentication itself. Requests carry a base64-encoded JSON document under
//! [`IDENTITY_HEADER`]:
//!
//! ```json
//! {"identity": {"internal": {"org_id": "1"}}, "account_number": "1"}
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::request::PreparedRequest;
use crate::testing::TestCase;

pub const IDENTITY_HEADER: &str = "x-rh-identity";

/// Organization used when a case asks for auth without naming one.
pub const DEFAULT_ORGANIZATION_ID: u32 = 1;

/// Account number baked into every identity.
pub const TEST_ACCOUNT_NUMBER: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub identity: Identity,
    pub account_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub internal: Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internal {
    pub org_id: String,
}

impl IdentityPayload {
    pub fn for_organization(organization_id: u32) -> Self {
        Self {
            identity: Identity {
                internal: Internal {
                    org_id: organization_id.to_string(),
                },
            },
            account_number: TEST_ACCOUNT_NUMBER.to_string(),
        }
    }
}

/// Organization a case authenticates as; zero counts as unset.
pub fn effective_organization(case: &TestCase) -> u32 {
    case.auth_organization_id
        .filter(|id| *id != 0)
        .unwrap_or(DEFAULT_ORGANIZATION_ID)
}

pub fn identity_header(organization_id: u32) -> Result<HeaderValue> {
    let json = serde_json::to_vec(&IdentityPayload::for_organization(organization_id))?;
    let encoded = STANDARD.encode(json);
    HeaderValue::from_str(&encoded).map_err(|e| Error::InvalidHeader {
        name: IDENTITY_HEADER.to_string(),
        reason: e.to_string(),
    })
}

/// Attach the identity header when the case requires auth; otherwise leave
/// the request untouched so unauthorized paths can be exercised.
pub fn apply_identity(request: &mut PreparedRequest, case: &TestCase) -> Result<()> {
    if !case.requires_auth {
        return Ok(());
    }
    let value = identity_header(effective_organization(case))?;
    request.header(HeaderName::from_static(IDENTITY_HEADER), value);
    Ok(())
}

#[cfg(test)]
pub(crate) fn decode_identity(value: &str) -> Option<IdentityPayload> {
    let raw = STANDARD.decode(value).ok()?;
    serde_json::from_slice(&raw).ok()
}
