//! In-process stand-in for the service under test.

use axum::{
    Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::auth::{IDENTITY_HEADER, decode_identity};
use crate::table::{CONTENT_TYPE_JSON, MISSING_AUTH_TOKEN};

const KNOWN_ORGANIZATIONS: [u32; 2] = [1, 2];

/// Serve the mock on an ephemeral port and return its API base URL.
pub async fn spawn() -> String {
    let app = Router::new()
        .route("/api/v1/", get(root).head(method_not_allowed))
        .route("/api/v1/info", get(info))
        .route("/api/v1/metrics", get(metrics))
        .route("/api/v1/organizations/{org_id}/clusters", get(clusters));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1/")
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    (status, [(CONTENT_TYPE, CONTENT_TYPE_JSON)], body.to_string()).into_response()
}

fn status_response(status: StatusCode, message: &str) -> Response {
    json_response(status, json!({ "status": message }))
}

/// Organization from the identity header, or the 401 to send back.
fn organization(headers: &HeaderMap) -> Result<u32, Response> {
    let unauthorized = || status_response(StatusCode::UNAUTHORIZED, MISSING_AUTH_TOKEN);
    let value = headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(unauthorized)?;
    decode_identity(value)
        .and_then(|payload| payload.identity.internal.org_id.parse().ok())
        .ok_or_else(unauthorized)
}

async fn root(headers: HeaderMap) -> Response {
    match organization(&headers) {
        Ok(_) => status_response(StatusCode::OK, "ok"),
        Err(response) => response,
    }
}

async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn info(headers: HeaderMap) -> Response {
    if let Err(response) = organization(&headers) {
        return response;
    }
    json_response(
        StatusCode::OK,
        json!({
            "status": "ok",
            "info": {
                "BuildBranch": "master",
                "BuildCommit": "0123456",
                "BuildTime": "Mon Jan 1 00:00:00 UTC 2024",
                "BuildVersion": "v1.0.0",
                "UtilsVersion": "v1.2.3",
            },
        }),
    )
}

async fn metrics() -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        "api_endpoints_requests{endpoint=\"\"} 1\n",
    )
        .into_response()
}

async fn clusters(Path(org_id): Path<String>, headers: HeaderMap) -> Response {
    let identity_org = match organization(&headers) {
        Ok(org) => org,
        Err(response) => return response,
    };
    let Ok(path_org) = org_id.parse::<u32>() else {
        let message = format!(
            "Error during parsing param 'org_id' with value '{org_id}'. Error: 'unsigned integer expected'"
        );
        return status_response(StatusCode::BAD_REQUEST, &message);
    };
    if path_org != identity_org || !KNOWN_ORGANIZATIONS.contains(&identity_org) {
        let message = format!("Item with ID {identity_org} was not found in the storage");
        return status_response(StatusCode::NOT_FOUND, &message);
    }
    json_response(
        StatusCode::OK,
        json!({
            "clusters": ["34c3ecc5-624a-49a5-bab8-4fdc5e51a266", "74ae54aa-6577-4e80-85e7-697cb646ff37"],
            "status": "ok",
        }),
    )
}
