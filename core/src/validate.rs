//! Checks that must pass before any network call is attempted.

use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::{Capabilities, Transport};

/// Run the precondition checks in order and hand back an open session.
///
/// The first failing check wins:
/// forced message, API key, transport availability, TLS support, session setup.
pub fn validate<T: Transport>(
    config: &ClientConfig,
    transport: &T,
) -> Result<(Capabilities, T::Session), Error> {
    if let Some(message) = &config.error_message {
        return Err(Error::Forced(message.clone()));
    }

    if config.api_key.as_deref().is_none_or(str::is_empty) {
        return Err(Error::MissingCredential);
    }

    let capabilities = transport.capabilities();
    if !capabilities.available {
        return Err(Error::TransportUnavailable);
    }
    if !capabilities.secure {
        return Err(Error::InsecureTransport);
    }

    let session = transport.open().ok_or(Error::TransportInitFailed)?;
    Ok((capabilities, session))
}
