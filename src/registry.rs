//! Provider client registry
//!
//! Selects a `ModelClient` implementation by provider key at the boundary
//! layer. The invoker itself knows nothing about other providers.

use crate::invoker::ModelClient;
use crate::models::ModelRequest;
use std::collections::HashMap;
use std::sync::Arc;

/// Provider key → client
#[derive(Default, Clone)]
pub struct ModelClientRegistry {
    clients: HashMap<String, Arc<dyn ModelClient>>,
}

impl ModelClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client` under `provider`, replacing any previous client
    pub fn register(&mut self, provider: impl Into<String>, client: Arc<dyn ModelClient>) {
        let provider = provider.into();
        if self.clients.insert(provider.clone(), client).is_some() {
            tracing::warn!(provider = %provider, "Replaced existing model client");
        }
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn ModelClient>> {
        self.clients.get(provider).cloned()
    }

    /// Registered provider keys, sorted
    pub fn providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = self.clients.keys().map(String::as_str).collect();
        providers.sort_unstable();
        providers
    }

    /// Invoke the client registered for `provider`
    ///
    /// An unknown provider is logged and treated like any other failure.
    pub async fn invoke(&self, provider: &str, request: &ModelRequest) -> Option<String> {
        let Some(client) = self.get(provider) else {
            tracing::error!(
                provider = provider,
                available = ?self.providers(),
                "No model client registered for provider"
            );
            return None;
        };
        client.invoke(request).await
    }
}
