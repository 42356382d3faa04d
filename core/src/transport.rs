//! Executing a `RequestSpec` over the network.
//!
//! # Design
//! A `Transport` reports what it can do and opens a `Session`. A session
//! runs exactly one request: `Session::execute` takes `self` by value, so
//! the session is released when the call returns and cannot be reused.
//!
//! `UreqTransport` re-serializes the ureq response into raw HTTP form
//! (status line, headers, blank line, body) so header parsing works on the
//! same bytes any raw transport would hand back.

use tracing::{debug, trace};

use crate::error::{FailureKind, TransportFailure};
use crate::http::{HttpMethod, RawResponse, RequestSpec};

/// Version of this client, sent in the User-Agent.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum supported Rust version, sent in the User-Agent as the runtime.
pub const RUST_MSRV: &str = env!("CARGO_PKG_RUST_VERSION");

const UREQ_NAME: &str = "ureq";
/// Major version of the ureq dependency.
const UREQ_MAJOR: &str = "3";

/// What a transport supports, checked before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub available: bool,
    /// Can speak HTTPS.
    pub secure: bool,
    pub name: &'static str,
    pub version: &'static str,
}

/// A source of single-use HTTP sessions.
pub trait Transport {
    type Session: Session;

    fn capabilities(&self) -> Capabilities;

    /// Acquire a fresh session, or `None` if one cannot be set up.
    fn open(&self) -> Option<Self::Session>;
}

/// One request's worth of transport.
pub trait Session {
    /// Send `request` and return the raw response. HTTP error statuses are
    /// returned as data; only network faults are `Err`.
    fn execute(self, request: &RequestSpec) -> Result<RawResponse, TransportFailure>;
}

/// `Picsmize/<client version> Rust/<msrv> <transport>/<transport version>`.
pub fn user_agent(capabilities: &Capabilities) -> String {
    format!(
        "Picsmize/{CLIENT_VERSION} Rust/{RUST_MSRV} {}/{}",
        capabilities.name, capabilities.version
    )
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    type Session = UreqSession;

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            available: true,
            secure: cfg!(feature = "tls"),
            name: UREQ_NAME,
            version: UREQ_MAJOR,
        }
    }

    fn open(&self) -> Option<UreqSession> {
        Some(UreqSession { _private: () })
    }
}

/// A single ureq round trip. The agent is built for the request and
/// dropped with it.
#[derive(Debug)]
pub struct UreqSession {
    _private: (),
}

impl Session for UreqSession {
    fn execute(self, request: &RequestSpec) -> Result<RawResponse, TransportFailure> {
        let options = &request.transport;

        let mut config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(options.max_redirects)
            .timeout_connect(Some(options.timeout))
            .timeout_global(Some(options.timeout));
        if let Some(proxy) = &options.proxy {
            let proxy = ureq::Proxy::new(&proxy.to_url()).map_err(classify)?;
            config = config.proxy(Some(proxy));
        }
        if options.accept_invalid_certs {
            config = config.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }
        let agent = config.build().new_agent();

        let url = request.url();
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = match request.method {
            HttpMethod::Post => agent.post(&url),
        };
        builder = builder.header("User-Agent", options.user_agent.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let result = match &request.body {
            Some(body) => builder.send(body.as_bytes()),
            None => builder.send_empty(),
        };
        let mut response = result.map_err(classify)?;

        let status = response.status();
        let mut raw = format!(
            "{:?} {} {}\r\n",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .into_bytes();
        for (name, value) in response.headers() {
            raw.extend_from_slice(name.as_str().as_bytes());
            raw.extend_from_slice(b": ");
            raw.extend_from_slice(value.as_bytes());
            raw.extend_from_slice(b"\r\n");
        }
        raw.extend_from_slice(b"\r\n");

        // No size cap; raw mode hands whole image bodies back.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;
        debug!(status = status.as_u16(), body_len = body.len(), "received response");
        raw.extend_from_slice(&body);
        trace!(raw_len = raw.len(), "assembled raw response");

        Ok(RawResponse(raw))
    }
}

fn classify(err: ureq::Error) -> TransportFailure {
    let kind = match &err {
        ureq::Error::Timeout(_) => FailureKind::Timeout,
        ureq::Error::HostNotFound => FailureKind::Dns,
        ureq::Error::ConnectionFailed | ureq::Error::Io(_) => FailureKind::Connect,
        ureq::Error::InvalidProxyUrl => FailureKind::Proxy,
        ureq::Error::TooManyRedirects | ureq::Error::RedirectFailed => FailureKind::Redirect,
        _ => FailureKind::Other,
    };
    TransportFailure::new(kind, err.to_string())
}
