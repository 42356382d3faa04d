//! Client configuration.
//!
//! # Design
//! Field names deserialize from the option names the Picsmize SDKs share
//! (`apiKey`, `toJSON`, `img_url`, ...), so a JSON options document maps
//! straight onto `ClientConfig`. Nothing here is validated eagerly; the
//! precondition checks in `validate` run at request time.

use serde::Deserialize;

use crate::error::Error;

/// Production endpoint of the Picsmize API.
pub const API_ENDPOINT: &str = "https://api.picsmize.com";

/// Timeout applied when none is configured, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP proxy the request is routed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
}

/// Options for a single `PicsmizeClient`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Connect and total timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub proxy: Option<ProxyConfig>,

    /// Fetch mode: the client sends `{img_url, process}` as JSON.
    #[serde(default)]
    pub input_fetch: bool,

    /// Decode the body as JSON and enforce the status contract.
    #[serde(default, rename = "toJSON")]
    pub to_json: bool,

    #[serde(default, rename = "img_url")]
    pub img_url: Option<String>,

    #[serde(default)]
    pub process: Option<String>,

    /// Forces every request to fail with this message.
    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Extra request headers, sent before the `apikey` header.
    #[serde(default)]
    pub headers: Vec<(String, String)>,

    /// Skip certificate verification. Off unless asked for.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_endpoint() -> String {
    API_ENDPOINT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            proxy: None,
            input_fetch: false,
            to_json: false,
            img_url: None,
            process: None,
            error_message: None,
            endpoint: default_endpoint(),
            headers: Vec::new(),
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Parse a JSON options document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Switch to fetch mode for the image at `img_url`.
    pub fn fetch(mut self, img_url: impl Into<String>, process: impl Into<String>) -> Self {
        self.input_fetch = true;
        self.img_url = Some(img_url.into());
        self.process = Some(process.into());
        self
    }

    pub fn decode_json(mut self) -> Self {
        self.to_json = true;
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
