//! HTTP response assertions.

use axum_test::TestResponse;
use regex::Regex;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual,
        expected,
        "Expected status {}, got {}: {}",
        expected,
        actual,
        response.text()
    );
}

/// Asserts the JSON content type every non-text response carries.
pub fn assert_json_content_type(response: &TestResponse) {
    assert_eq!(
        response.header("content-type"),
        "application/json; charset=utf-8"
    );
}

/// Asserts a plain-text error body.
pub fn assert_text_error(response: &TestResponse, status: u16, body: &str) {
    assert_status(response, status);
    assert_eq!(response.header("content-type"), "text/plain; charset=utf-8");
    assert_eq!(response.text(), body);
}

/// Asserts the wildcard CORS origin header.
pub fn assert_cors_origin(response: &TestResponse) {
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

/// Asserts that the body is an OperationOutcome with one issue.
pub fn assert_operation_outcome(body: &Value, severity: &str, code: &str) {
    assert_eq!(body["resourceType"], "OperationOutcome");
    assert_eq!(body["issue"][0]["severity"], severity);
    assert_eq!(body["issue"][0]["code"], code);
}

/// Asserts that `id` is a 24 character lowercase hex string.
pub fn assert_valid_id(id: &str) {
    let re = Regex::new(r"^[0-9a-f]{24}$").unwrap();
    assert!(re.is_match(id), "not a valid id: {}", id);
}

/// Returns the id at the end of the `Location` header.
pub fn location_id(response: &TestResponse) -> String {
    let location = response.header("location");
    let location = location.to_str().expect("Location is not ASCII");
    let id = location
        .rsplit('/')
        .next()
        .expect("Location has no path")
        .to_string();
    assert_valid_id(&id);
    id
}

/// Asserts the `Location` header shape for a kind and port.
pub fn assert_location(response: &TestResponse, host: &str, port: u16, resource_type: &str) {
    let location = response.header("location");
    let pattern = format!(
        r"^http://{}:{}/{}/[0-9a-f]{{24}}$",
        regex::escape(host),
        port,
        resource_type
    );
    let re = Regex::new(&pattern).unwrap();
    assert!(
        re.is_match(location.to_str().unwrap()),
        "unexpected Location {:?}",
        location
    );
}

/// Returns the records of a searchset or legacy bundle, checking the count.
pub fn bundle_records(bundle: &Value) -> Vec<Value> {
    if bundle["type"] == "searchset" {
        let entries = bundle["entry"].as_array().expect("entry is not an array");
        assert_eq!(bundle["total"], entries.len());
        entries.iter().map(|e| e["resource"].clone()).collect()
    } else {
        let entries = bundle["entries"]
            .as_array()
            .expect("entries is not an array");
        assert_eq!(bundle["totalResults"], entries.len());
        entries.clone()
    }
}
