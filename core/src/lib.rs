//! Blocking client for the Picsmize image processing API.
//!
//! # Overview
//! A `PicsmizeClient` sends one `POST /image/process` per `request` call and
//! turns the response into either a decoded `ApiResult` (JSON mode) or the
//! raw headers and body.
//!
//! # Design
//! - `validate` runs every client-side check before the network is touched.
//! - `build_request` produces a `RequestSpec` as plain data.
//! - A `Transport` hands out single-use sessions; `UreqTransport` is the
//!   default, and tests substitute their own.
//! - `read_response` and `decode_result` split, parse and check the reply.
//! - Every failure comes back through the one `Error` type.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod validate;

#[cfg(test)]
mod testing;

pub use client::PicsmizeClient;
pub use config::{ClientConfig, ProxyConfig, API_ENDPOINT};
pub use error::{Error, FailureKind, TransportFailure};
pub use headers::{parse_headers, split_response, ParsedHeaders};
pub use http::{HttpMethod, RawResponse, RequestSpec};
pub use request::build_request;
pub use response::{decode_result, read_response, Reply};
pub use transport::{Capabilities, Session, Transport, UreqTransport};
pub use types::{ApiResult, FetchPayload};
pub use validate::validate;
