//! Configurable provider used by unit tests.

use crate::error::{Error, Result};
use crate::extensions::header::{ExtensionHeader, ExtensionParam};
use crate::extensions::provider::{ExtensionProvider, NegotiatedExtension, NegotiationContext};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Accept,
    Decline,
    Fail,
}

/// Accepts the offer as-is and echoes its parameters back.
#[derive(Debug)]
pub(crate) struct MockNegotiated {
    token: String,
    params: Vec<ExtensionParam>,
}

impl NegotiatedExtension for MockNegotiated {
    fn token(&self) -> &str {
        &self.token
    }

    fn response_params(&self) -> Vec<ExtensionParam> {
        self.params.clone()
    }
}

pub(crate) struct MockProvider {
    name: String,
    outcome: Outcome,
    calls: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new(name: &str, outcome: Outcome) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn accepting(name: &str) -> Self {
        Self::new(name, Outcome::Accept)
    }

    pub(crate) fn declining(name: &str) -> Self {
        Self::new(name, Outcome::Decline)
    }

    pub(crate) fn failing(name: &str) -> Self {
        Self::new(name, Outcome::Fail)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExtensionProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn negotiate(
        &self,
        candidate: &ExtensionHeader,
        _context: &NegotiationContext,
    ) -> Result<Option<Box<dyn NegotiatedExtension>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Accept => Ok(Some(Box::new(MockNegotiated {
                token: candidate.token().to_string(),
                params: candidate.params().to_vec(),
            }))),
            Outcome::Decline => Ok(None),
            Outcome::Fail => Err(Error::protocol_violation(format!(
                "{} rejected '{}'",
                self.name, candidate
            ))),
        }
    }
}
