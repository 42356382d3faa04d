//! Recording transport for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::TransportFailure;
use crate::http::{RawResponse, RequestSpec};
use crate::transport::{Capabilities, Session, Transport};

/// Returns a canned outcome and records every request it is asked to send.
#[derive(Debug, Clone)]
pub struct SpyTransport {
    pub capabilities: Capabilities,
    pub can_open: bool,
    outcome: Result<RawResponse, TransportFailure>,
    sent: Rc<RefCell<Vec<RequestSpec>>>,
}

impl SpyTransport {
    pub fn returning(raw: &str) -> Self {
        Self::with_outcome(Ok(RawResponse::from(raw)))
    }

    pub fn failing(failure: TransportFailure) -> Self {
        Self::with_outcome(Err(failure))
    }

    fn with_outcome(outcome: Result<RawResponse, TransportFailure>) -> Self {
        Self {
            capabilities: Capabilities {
                available: true,
                secure: true,
                name: "spy",
                version: "1",
            },
            can_open: true,
            outcome,
            sent: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn sent(&self) -> Vec<RequestSpec> {
        self.sent.borrow().clone()
    }
}

impl Transport for SpyTransport {
    type Session = SpySession;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn open(&self) -> Option<SpySession> {
        self.can_open.then(|| SpySession {
            outcome: self.outcome.clone(),
            sent: Rc::clone(&self.sent),
        })
    }
}

pub struct SpySession {
    outcome: Result<RawResponse, TransportFailure>,
    sent: Rc<RefCell<Vec<RequestSpec>>>,
}

impl Session for SpySession {
    fn execute(self, request: &RequestSpec) -> Result<RawResponse, TransportFailure> {
        self.sent.borrow_mut().push(request.clone());
        self.outcome
    }
}
