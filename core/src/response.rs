//! Interpreting a raw response: header parsing and the JSON status contract.

use serde_json::Value;

use crate::error::Error;
use crate::headers::{parse_headers, split_response, ParsedHeaders};
use crate::http::RawResponse;
use crate::types::ApiResult;

/// What a successful `request` produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<R> {
    /// JSON mode: the handler's return value.
    Handled(R),
    /// Raw mode: the response as received.
    Raw { headers: ParsedHeaders, body: Vec<u8> },
}

impl<R> Reply<R> {
    pub fn handled(self) -> Option<R> {
        match self {
            Reply::Handled(value) => Some(value),
            Reply::Raw { .. } => None,
        }
    }

    pub fn into_raw(self) -> Option<(ParsedHeaders, Vec<u8>)> {
        match self {
            Reply::Raw { headers, body } => Some((headers, body)),
            Reply::Handled(_) => None,
        }
    }
}

/// Split `raw` into parsed headers and the body bytes.
pub fn read_response(raw: &RawResponse) -> Result<(ParsedHeaders, Vec<u8>), Error> {
    let (head, body) = split_response(raw.as_bytes())?;
    let headers = parse_headers(&String::from_utf8_lossy(head));
    Ok((headers, body.to_vec()))
}

/// Decode `body` and enforce the status contract.
///
/// A parse failure or an empty value (`null`, `false`, `0`, `""`, `"0"`,
/// `[]`, `{}`) is `InvalidResponseBody`. Any other value whose `status` is
/// not `true` is `Api` with the response's `message`; a non-object has
/// neither field, so its message is empty.
pub fn decode_result(body: &[u8]) -> Result<ApiResult, Error> {
    let value: Value = serde_json::from_slice(body).map_err(|_| Error::InvalidResponseBody)?;
    if is_empty_value(&value) {
        return Err(Error::InvalidResponseBody);
    }
    let Value::Object(map) = value else {
        return Err(Error::Api(String::new()));
    };
    let result = ApiResult::new(map);
    if !result.is_success() {
        return Err(Error::Api(result.message()));
    }
    Ok(result)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
