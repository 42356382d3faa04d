//! Assembling the outgoing request from configuration.

use std::time::Duration;

use crate::config::{ClientConfig, ProxyConfig};
use crate::http::{HttpMethod, ProxyKind, ProxySettings, RequestSpec, TransportOptions};
use crate::types::FetchPayload;

pub const PROCESS_PATH: &str = "/image/process";

pub const MAX_REDIRECTS: u32 = 3;

/// Build the image-processing request described by `config`.
///
/// Fetch mode sends `{img_url, process}` as JSON with a `Content-Type`
/// header; otherwise the body is empty. Caller headers follow, and the
/// `apikey` header is always last.
pub fn build_request(config: &ClientConfig, user_agent: &str) -> RequestSpec {
    let mut headers = Vec::new();
    let mut body = None;

    if config.input_fetch {
        body = Some(FetchPayload::from_config(config).to_body());
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }

    headers.extend(config.headers.iter().cloned());
    headers.push((
        "apikey".to_string(),
        config.api_key.clone().unwrap_or_default(),
    ));

    RequestSpec {
        method: HttpMethod::Post,
        endpoint: config.endpoint.clone(),
        path: PROCESS_PATH.to_string(),
        headers,
        body,
        transport: TransportOptions {
            timeout: Duration::from_secs(config.timeout),
            max_redirects: MAX_REDIRECTS,
            proxy: config.proxy.as_ref().map(proxy_settings),
            accept_invalid_certs: config.accept_invalid_certs,
            user_agent: user_agent.to_string(),
        },
    }
}

fn proxy_settings(proxy: &ProxyConfig) -> ProxySettings {
    let mut auth = String::new();
    if let Some(user) = &proxy.user {
        auth.push_str(user);
    }
    if let Some(pass) = &proxy.pass {
        auth.push(':');
        auth.push_str(pass);
    }

    ProxySettings {
        kind: ProxyKind::Http,
        host: proxy.host.clone(),
        port: proxy.port,
        auth: (!auth.is_empty()).then_some(auth),
    }
}
