//! Immutable mapping from extension token to provider.
//!
//! Built once by bootstrap code from an explicit provider list, then shared
//! read-only by every handshake.

use crate::config::{Config, DuplicatePolicy};
use crate::error::{Error, Result};
use crate::extensions::header::{ExtensionHeader, is_token};
use crate::extensions::provider::ExtensionProvider;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of supported extension providers, keyed by token.
#[derive(Default)]
pub struct ExtensionRegistry {
    providers: HashMap<String, Arc<dyn ExtensionProvider>>,
    /// Bare headers for every supported token, sorted by token.
    supported: Vec<ExtensionHeader>,
}

impl ExtensionRegistry {
    /// Create a registry with no providers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start an explicit registration sequence.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from a provider list, iterating it exactly once.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidExtensionToken`] if a provider name is not a valid token.
    /// - [`Error::DuplicateProvider`] if two providers share a name and the
    ///   policy is [`DuplicatePolicy::Reject`].
    pub fn build<I>(providers: I, config: &Config) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn ExtensionProvider>>,
    {
        let mut map: HashMap<String, Arc<dyn ExtensionProvider>> = HashMap::new();

        for provider in providers {
            let name = provider.name().to_string();
            if !is_token(&name) {
                return Err(Error::invalid_token(format!(
                    "invalid provider name '{}'",
                    name
                )));
            }

            match map.entry(name) {
                Entry::Occupied(mut slot) => match config.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(Error::DuplicateProvider(slot.key().clone()));
                    }
                    DuplicatePolicy::LastWins => {
                        warn!(extension = %slot.key(), "replacing previously registered extension provider");
                        slot.insert(provider);
                    }
                },
                Entry::Vacant(slot) => {
                    debug!(extension = %slot.key(), "registered extension provider");
                    slot.insert(provider);
                }
            }
        }

        let mut names: Vec<&String> = map.keys().collect();
        names.sort();
        let supported = names
            .into_iter()
            .map(|name| ExtensionHeader::bare(name.as_str()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            providers: map,
            supported,
        })
    }

    /// Names of all supported extensions, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.supported.iter().map(ExtensionHeader::token)
    }

    /// Parameter-less headers for all supported extensions, sorted by token.
    pub fn supported_headers(&self) -> &[ExtensionHeader] {
        &self.supported
    }

    /// Find the provider registered for `name`.
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn ExtensionProvider>> {
        self.providers.get(name)
    }

    /// Check if `name` is supported.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Get the number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects providers during application bootstrap.
#[derive(Default)]
pub struct RegistryBuilder {
    providers: Vec<Arc<dyn ExtensionProvider>>,
    config: Config,
}

impl RegistryBuilder {
    /// Register a provider.
    #[must_use]
    pub fn register<P>(mut self, provider: P) -> Self
    where
        P: ExtensionProvider + 'static,
    {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Register an already shared provider.
    #[must_use]
    pub fn register_shared(mut self, provider: Arc<dyn ExtensionProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Use a custom configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the immutable registry.
    ///
    /// # Errors
    ///
    /// See [`ExtensionRegistry::build`].
    pub fn build(self) -> Result<ExtensionRegistry> {
        ExtensionRegistry::build(self.providers, &self.config)
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}
