//! JSON stub file format.
//!
//! A stub file is a top-level array of records:
//!
//! ```json
//! [{
//!   "request":  { "url": "...", "method": "GET", "headerFields": ["Accept[:::]*/*"], "requestData": null },
//!   "response": { "url": "...", "statusCode": 200, "headerFields": [], "responseData": "YWJj" }
//! }]
//! ```
//!
//! Headers are flat `name[:::]value` strings so duplicates keep their order.
//! Bodies are standard base64. A record without response metadata encodes
//! `response` as an (almost) empty object. The legacy top-level `data` field
//! is read as the response body but never written.

use crate::error::{StubError, TransportError};
use crate::request::{HeaderFields, StubRequest, StubResponse};
use crate::stub::StubRecord;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Separator between header name and value in encoded header fields.
pub const HEADER_SEPARATOR: &str = "[:::]";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStub {
    request: WireRequest,
    #[serde(default)]
    response: WireResponse,
    #[serde(default, skip_serializing)]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<WireError>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    #[serde(default)]
    url: Option<String>,
    method: String,
    #[serde(default)]
    header_fields: Vec<String>,
    #[serde(default)]
    request_data: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireError {
    message: String,
}

/// Encode headers as `name[:::]value` strings.
pub fn encode_header_fields(headers: &HeaderFields) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| format!("{name}{HEADER_SEPARATOR}{value}"))
        .collect()
}

/// Decode `name[:::]value` strings, splitting on the first separator.
pub fn decode_header_fields(fields: &[String]) -> Result<HeaderFields, StubError> {
    fields
        .iter()
        .map(|field| {
            field
                .split_once(HEADER_SEPARATOR)
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| StubError::MalformedHeader(field.clone()))
        })
        .collect()
}

fn encode_body(body: &Option<Bytes>) -> Option<String> {
    body.as_ref().map(|b| STANDARD.encode(b))
}

fn decode_body(data: Option<&str>, field: &'static str) -> Result<Option<Bytes>, StubError> {
    data.map(|encoded| {
        STANDARD
            .decode(encoded)
            .map(Bytes::from)
            .map_err(|source| StubError::InvalidBase64 { field, source })
    })
    .transpose()
}

fn to_wire(record: &StubRecord) -> WireStub {
    let request = WireRequest {
        url: Some(record.request.url.to_string()),
        method: record.request.method.clone(),
        header_fields: encode_header_fields(&record.request.headers),
        request_data: encode_body(&record.request.body),
    };

    let mut response = WireResponse {
        response_data: encode_body(&record.body),
        ..WireResponse::default()
    };
    if let Some(meta) = &record.response {
        response.url = meta.url.as_ref().map(Url::to_string);
        response.status_code = Some(meta.status);
        response.header_fields = Some(encode_header_fields(&meta.headers));
    }

    WireStub {
        request,
        response,
        data: None,
        error: record.error.as_ref().map(|e| WireError {
            message: e.message.clone(),
        }),
    }
}

fn from_wire(wire: WireStub) -> Result<StubRecord, StubError> {
    let raw_url = wire.request.url.ok_or(StubError::MissingRequestUrl)?;
    let url = Url::parse(&raw_url).map_err(|_| StubError::InvalidRequestUrl(raw_url.clone()))?;

    let request = StubRequest {
        method: wire.request.method,
        url,
        headers: decode_header_fields(&wire.request.header_fields)?,
        body: decode_body(wire.request.request_data.as_deref(), "requestData")?,
    };

    let response_url = wire
        .response
        .url
        .as_deref()
        .map(|raw| Url::parse(raw).map_err(|_| StubError::InvalidResponseUrl(raw.to_string())))
        .transpose()?;

    let response = match wire.response.status_code {
        Some(status) => Some(StubResponse {
            status,
            url: response_url,
            headers: decode_header_fields(
                wire.response.header_fields.as_deref().unwrap_or_default(),
            )?,
        }),
        None => {
            if wire.response.url.is_some() || wire.response.header_fields.is_some() {
                warn!(
                    "Dropping response metadata without statusCode for {} {}",
                    request.method, request.url
                );
            }
            None
        }
    };

    let body = match wire.response.response_data.as_deref() {
        Some(data) => decode_body(Some(data), "responseData")?,
        None => decode_body(wire.data.as_deref(), "data")?,
    };

    Ok(StubRecord {
        request,
        response,
        body,
        error: wire.error.map(|e| TransportError::new(e.message)),
    })
}

/// Encode a single record as a JSON value.
pub fn encode_stub_value(record: &StubRecord) -> Result<serde_json::Value, StubError> {
    Ok(serde_json::to_value(to_wire(record))?)
}

/// Decode a single record from a JSON value.
pub fn decode_stub_value(value: serde_json::Value) -> Result<StubRecord, StubError> {
    let wire: WireStub = serde_json::from_value(value)?;
    from_wire(wire)
}

/// Encode records as a pretty-printed JSON array.
pub fn encode_stubs(records: &[StubRecord]) -> Result<String, StubError> {
    let wire: Vec<WireStub> = records.iter().map(to_wire).collect();
    Ok(serde_json::to_string_pretty(&wire)?)
}

/// Decode a JSON array of records. Fails on the first malformed record.
pub fn decode_stubs(json: &str) -> Result<Vec<StubRecord>, StubError> {
    let wire: Vec<WireStub> = serde_json::from_str(json)?;
    wire.into_iter().map(from_wire).collect()
}
