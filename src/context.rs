//! Shared relay components
//!
//! `RelayContext` wires the store, transport, orchestrator, finalizer and
//! formatter together once at startup. Tools hold an `Arc` to it.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::conversation::{ConversationOrchestrator, PromptFormatter, SessionFinalizer};
use crate::core::RelayResult;
use crate::session::{SessionReaper, SessionStore};
use crate::webhook::{WebhookClient, WebhookTransport};

/// Everything a tool needs to talk to the webhooks
#[derive(Clone)]
pub struct RelayContext {
    pub config: RelayConfig,
    pub store: SessionStore,
    pub transport: Arc<dyn WebhookTransport>,
    pub orchestrator: ConversationOrchestrator,
    pub finalizer: SessionFinalizer,
    pub formatter: PromptFormatter,
}

impl RelayContext {
    /// Build the context with an HTTP webhook client and in-memory sessions
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let transport: Arc<dyn WebhookTransport> = Arc::new(WebhookClient::new(&config)?);
        Ok(Self::with_transport(config, transport, SessionStore::new()))
    }

    /// Build the context over a given transport and store
    pub fn with_transport(
        config: RelayConfig,
        transport: Arc<dyn WebhookTransport>,
        store: SessionStore,
    ) -> Self {
        Self {
            orchestrator: ConversationOrchestrator::new(store.clone(), transport.clone()),
            finalizer: SessionFinalizer::new(store.clone(), transport.clone()),
            formatter: PromptFormatter::new(store.clone()),
            config,
            store,
            transport,
        }
    }

    /// Reaper for this context's store, using the configured schedule
    pub fn reaper(&self) -> SessionReaper {
        SessionReaper::from_config(self.store.clone(), &self.config)
    }
}

impl std::fmt::Debug for RelayContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayContext")
            .field("base_url", &self.config.base_url)
            .field("store", &self.store)
            .field("routes", &self.transport.routes().tool_names())
            .finish()
    }
}
