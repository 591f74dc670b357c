use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;

/// A completed response, fully buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
    pub duration_ms: u128,
}

impl HttpResponse {
    /// Header value as text; missing or non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
pub(crate) fn fake_response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
    use reqwest::header::HeaderValue;

    let mut headers = HeaderMap::new();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    }
    HttpResponse {
        status,
        headers,
        body: body.to_string(),
        duration_ms: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Status {
        status: String,
    }

    #[test]
    fn content_type_is_read_from_headers() {
        let response = fake_response(200, Some("application/json; charset=utf-8"), "{}");
        assert_eq!(response.content_type(), Some("application/json; charset=utf-8"));
        assert_eq!(response.header("Content-Type"), response.content_type());
    }

    #[test]
    fn missing_content_type_is_none() {
        let response = fake_response(404, None, "");
        assert!(response.content_type().is_none());
    }

    #[test]
    fn json_body_is_decoded() {
        let response = fake_response(200, None, r#"{"status":"ok"}"#);
        let decoded: Status = response.json().unwrap();
        assert_eq!(decoded.status, "ok");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let response = fake_response(200, None, "not json");
        assert!(response.json::<Status>().is_err());
    }
}
