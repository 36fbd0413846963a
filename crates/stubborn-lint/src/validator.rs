//! Checks applied to each stub in a stub file.

use crate::types::{LintIssue, LintOptions, LintResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::path::Path;
use stubborn_http::codec::{decode_stub_value, HEADER_SEPARATOR};
use stubborn_http::{StubRecord, StubRequest};
use tracing::debug;
use url::Url;

/// Validate a parsed stub file: a JSON array of stubs.
pub fn validate_stub_file(file: &Path, value: &Value, result: &mut LintResult, options: &LintOptions) {
    let Some(stubs) = value.as_array() else {
        result.add_issue(
            LintIssue::error("E003", "Stub file must contain a JSON array", file)
                .with_suggestion("Wrap the stubs in [ ... ]"),
        );
        return;
    };

    let mut decoded: Vec<(usize, StubRecord)> = Vec::new();
    for (idx, stub) in stubs.iter().enumerate() {
        let errors_before = result.errors;
        validate_stub(file, stub, idx, result);

        if result.errors == errors_before {
            match decode_stub_value(stub.clone()) {
                Ok(record) => decoded.push((idx, record)),
                Err(e) => debug!("stubs[{idx}] in {} did not decode: {e}", file.display()),
            }
        }
    }

    check_duplicates(file, &decoded, result, options);
}

/// Validate a single stub object.
pub fn validate_stub(file: &Path, stub: &Value, idx: usize, result: &mut LintResult) {
    let location = format!("stubs[{idx}]");

    match stub.get("request") {
        Some(request) if request.is_object() => {
            validate_request(file, request, &format!("{location}.request"), result)
        }
        _ => result.add_issue(
            LintIssue::error("E004", "Missing required field: request", file)
                .with_location(&location),
        ),
    }

    let response = stub.get("response").filter(|r| !r.is_null());
    if let Some(response) = response {
        validate_response(file, response, &format!("{location}.response"), result);
    }
    check_base64(file, stub.get("data"), &format!("{location}.data"), result);

    check_outcome(file, stub, response, &location, result);
}

fn validate_request(file: &Path, request: &Value, location: &str, result: &mut LintResult) {
    let method = request.get("method").and_then(Value::as_str);
    if method.is_none() {
        result.add_issue(
            LintIssue::error("E004", "Missing required field: method", file)
                .with_location(format!("{location}.method")),
        );
    }

    match request.get("url").and_then(Value::as_str) {
        None => result.add_issue(
            LintIssue::error("E004", "Missing required field: url", file)
                .with_location(format!("{location}.url")),
        ),
        Some(url) => {
            if StubRequest::parse(method.unwrap_or("GET"), url).is_err() {
                result.add_issue(
                    LintIssue::error("E005", format!("Invalid request URL '{url}'"), file)
                        .with_location(format!("{location}.url"))
                        .with_suggestion("Use an absolute URL such as https://api.example.com/path"),
                );
            }
        }
    }

    validate_headers(file, request.get("headerFields"), &format!("{location}.headerFields"), result);
    check_base64(file, request.get("requestData"), &format!("{location}.requestData"), result);
}

fn validate_response(file: &Path, response: &Value, location: &str, result: &mut LintResult) {
    if let Some(url) = response.get("url").and_then(Value::as_str) {
        if Url::parse(url).is_err() {
            result.add_issue(
                LintIssue::error("E008", format!("Invalid response URL '{url}'"), file)
                    .with_location(format!("{location}.url")),
            );
        }
    }

    validate_headers(file, response.get("headerFields"), &format!("{location}.headerFields"), result);
    check_base64(file, response.get("responseData"), &format!("{location}.responseData"), result);
}

/// Every header entry must be a `name[:::]value` string.
pub fn validate_headers(file: &Path, headers: Option<&Value>, location: &str, result: &mut LintResult) {
    let Some(entries) = headers.and_then(Value::as_array) else {
        return;
    };

    for (idx, entry) in entries.iter().enumerate() {
        let valid = entry
            .as_str()
            .is_some_and(|field| field.contains(HEADER_SEPARATOR));
        if !valid {
            result.add_issue(
                LintIssue::error(
                    "E007",
                    format!("Header field {entry} has no '{HEADER_SEPARATOR}' separator"),
                    file,
                )
                .with_location(format!("{location}[{idx}]"))
                .with_suggestion(format!("Write headers as \"Name{HEADER_SEPARATOR}Value\"")),
            );
        }
    }
}

fn check_base64(file: &Path, data: Option<&Value>, location: &str, result: &mut LintResult) {
    let Some(encoded) = data.and_then(Value::as_str) else {
        return;
    };

    if STANDARD.decode(encoded).is_err() {
        result.add_issue(
            LintIssue::error("E006", "Body is not valid base64", file).with_location(location),
        );
    }
}

fn check_outcome(
    file: &Path,
    stub: &Value,
    response: Option<&Value>,
    location: &str,
    result: &mut LintResult,
) {
    let has_status = response.is_some_and(|r| r.get("statusCode").is_some_and(|s| !s.is_null()));
    let has_body = response.is_some_and(|r| r.get("responseData").is_some_and(Value::is_string))
        || stub.get("data").is_some_and(Value::is_string);
    let has_error = stub.get("error").is_some_and(|e| !e.is_null());

    if !(has_status || has_body || has_error) {
        result.add_issue(
            LintIssue::warning(
                "W001",
                "Stub has no recorded outcome: no status code, body or error",
                file,
            )
            .with_location(location)
            .with_suggestion("Record the stub again or add a response"),
        );
    }
}

/// Later stubs whose request is answered by an earlier one are never played back.
fn check_duplicates(
    file: &Path,
    decoded: &[(usize, StubRecord)],
    result: &mut LintResult,
    options: &LintOptions,
) {
    for (pos, (idx, record)) in decoded.iter().enumerate() {
        let first = decoded[..pos]
            .iter()
            .find(|(_, earlier)| earlier.answers(&record.request, &options.match_options));

        if let Some((first_idx, _)) = first {
            result.add_issue(
                LintIssue::warning(
                    "W002",
                    format!(
                        "Duplicate of stubs[{first_idx}] for {} {}",
                        record.request.method, record.request.url
                    ),
                    file,
                )
                .with_location(format!("stubs[{idx}]"))
                .with_suggestion("Only the first matching stub is played back; remove this one"),
            );
        }
    }
}
