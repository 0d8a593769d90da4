//! Borradores de referencia en memoria, con retardo e inyección de fallos
//! configurables para los tests de idempotencia y de carreras.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ProviderError;
use crate::providers::drafts::trait_drafts::DraftProvider;

#[derive(Debug, Clone)]
pub struct CreatedDraft {
    pub id: Uuid,
    pub service_slug: String,
    pub locale: String,
}

pub struct InMemoryDraftProvider {
    created: Mutex<Vec<CreatedDraft>>,
    fail_with_auth: AtomicBool,
    /// Retardo artificial antes de crear, para ensanchar la ventana de
    /// carrera en los tests de `ensure_draft` concurrente.
    creation_delay: Duration,
}

impl InMemoryDraftProvider {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            fail_with_auth: AtomicBool::new(false),
            creation_delay: Duration::ZERO,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { creation_delay: delay, ..Self::new() }
    }

    pub fn set_fail_with_auth(&self, fail: bool) {
        self.fail_with_auth.store(fail, Ordering::SeqCst);
    }

    /// Número de borradores realmente creados.
    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn last_created(&self) -> Option<CreatedDraft> {
        self.created.lock().unwrap().last().cloned()
    }
}

impl Default for InMemoryDraftProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftProvider for InMemoryDraftProvider {
    fn get_name(&self) -> &str {
        "in_memory_drafts"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Borradores en memoria con retardo e inyección de fallos"
    }

    async fn create_draft(&self, service_slug: &str, locale: &str) -> Result<Uuid, ProviderError> {
        if self.fail_with_auth.load(Ordering::SeqCst) {
            return Err(ProviderError::AuthRequired);
        }
        if !self.creation_delay.is_zero() {
            tokio::time::sleep(self.creation_delay).await;
        }
        let draft = CreatedDraft {
            id: Uuid::new_v4(),
            service_slug: service_slug.to_string(),
            locale: locale.to_string(),
        };
        let id = draft.id;
        self.created.lock().unwrap().push(draft);
        Ok(id)
    }
}
