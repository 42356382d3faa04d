//! The `PicsmizeClient` facade.
//!
//! # Design
//! `request` runs validation, request building, one transport round trip
//! and response interpretation in that order, stopping at the first error.
//! The only state kept between calls is the header map of the most recent
//! response, so `header` can be consulted after a call, including a call
//! that failed on the API's status contract. Each call clears that map
//! first: a call that got no response leaves nothing to look up.
//!
//! `request` takes `&mut self`: one client cannot run two requests at once.

use tracing::trace;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::headers::ParsedHeaders;
use crate::request::build_request;
use crate::response::{decode_result, read_response, Reply};
use crate::transport::{user_agent, Session, Transport, UreqTransport};
use crate::types::ApiResult;
use crate::validate::validate;

/// Blocking client for the image processing endpoint.
#[derive(Debug)]
pub struct PicsmizeClient<T: Transport = UreqTransport> {
    config: ClientConfig,
    transport: T,
    last_headers: Option<ParsedHeaders>,
}

impl PicsmizeClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport)
    }
}

impl<T: Transport> PicsmizeClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            last_headers: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send the configured request.
    ///
    /// In JSON mode the decoded result is passed to `handler` and its return
    /// value comes back as `Reply::Handled`. Otherwise the handler is not
    /// called and the headers and body come back as `Reply::Raw`.
    pub fn request<F, R>(&mut self, handler: F) -> Result<Reply<R>, Error>
    where
        F: FnOnce(ApiResult) -> R,
    {
        self.last_headers = None;
        let (capabilities, session) = validate(&self.config, &self.transport)?;
        let req = build_request(&self.config, &user_agent(&capabilities));

        let raw = session.execute(&req)?;
        let (headers, body) = read_response(&raw)?;
        trace!(
            status = ?headers.status_code(),
            header_count = headers.len(),
            "parsed response headers"
        );
        self.last_headers = Some(headers);

        if !self.config.to_json {
            let headers = self.last_headers.clone().unwrap_or_default();
            return Ok(Reply::Raw { headers, body });
        }

        let result = decode_result(&body)?;
        Ok(Reply::Handled(handler(result)))
    }

    /// Look up a header of the last response, ignoring case.
    ///
    /// Fails with `NoPriorRequest` until a call has received a response,
    /// and again after a call that failed before receiving one.
    pub fn header(&self, name: &str) -> Result<Option<&str>, Error> {
        let headers = self.last_headers.as_ref().ok_or(Error::NoPriorRequest)?;
        Ok(headers.get(name))
    }

    pub fn last_headers(&self) -> Option<&ParsedHeaders> {
        self.last_headers.as_ref()
    }
}
