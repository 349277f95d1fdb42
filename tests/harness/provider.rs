//! Recording provider with a fixed outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;
use wsext::{
    Error, ExtensionHeader, ExtensionParam, ExtensionProvider, ExtensionRegistry,
    NegotiatedExtension, NegotiationContext, Negotiator, ResourceAddress, Result, Role,
};

/// What a [`RecordingProvider`] does when asked to negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accept,
    Decline,
    Violate,
}

/// Agrees to every offered parameter unchanged.
#[derive(Debug)]
struct Accepted {
    token: String,
    params: Vec<ExtensionParam>,
}

impl NegotiatedExtension for Accepted {
    fn token(&self) -> &str {
        &self.token
    }

    fn response_params(&self) -> Vec<ExtensionParam> {
        self.params.clone()
    }
}

/// Provider that counts its invocations.
#[derive(Debug)]
pub struct RecordingProvider {
    name: String,
    outcome: Outcome,
    calls: AtomicUsize,
}

impl RecordingProvider {
    pub fn new(name: &str, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExtensionProvider for RecordingProvider {
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
            Outcome::Accept => Ok(Some(Box::new(Accepted {
                token: candidate.token().to_string(),
                params: candidate.params().to_vec(),
            }))),
            Outcome::Decline => Ok(None),
            Outcome::Violate => Err(Error::ProtocolViolation(format!(
                "{} refused {}",
                self.name, candidate
            ))),
        }
    }
}

/// Build a negotiator over the given providers.
pub fn negotiator_with(providers: &[Arc<RecordingProvider>]) -> Negotiator {
    let registry = providers
        .iter()
        .fold(ExtensionRegistry::builder(), |builder, provider| {
            builder.register_shared(provider.clone())
        })
        .build()
        .expect("registry should build");
    Negotiator::new(registry)
}

/// Server-side context for a test resource.
pub fn context() -> NegotiationContext {
    NegotiationContext::new(ResourceAddress::new("localhost", "/test"), Role::Server)
}

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
