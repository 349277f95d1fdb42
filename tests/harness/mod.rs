//! Shared test utilities for negotiation tests.
//!
//! Provides configurable providers and tracing setup used by the
//! integration test suites.

mod provider;

pub use provider::{Outcome, RecordingProvider, context, init_tracing, negotiator_with};
