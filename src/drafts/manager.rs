//! Materialización perezosa del borrador.
//!
//! La primera operación que necesita identidad de borrador (adjuntar un
//! archivo, enviar) la provoca; todas las demás esperan a que esa única
//! creación termine. La exclusión se consigue con un candado de creación y
//! doble comprobación, de modo que llamadas concurrentes nunca produzcan dos
//! borradores para la misma sesión.
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::data::session::WizardSession;
use crate::errors::WizardError;
use crate::providers::drafts::DraftProvider;

pub struct DraftManager {
    session: Arc<RwLock<WizardSession>>,
    provider: Arc<dyn DraftProvider>,
    locale: String,
    create_lock: Mutex<()>,
}

impl DraftManager {
    pub fn new(
        session: Arc<RwLock<WizardSession>>,
        provider: Arc<dyn DraftProvider>,
        locale: &str,
    ) -> Self {
        Self {
            session,
            provider,
            locale: locale.to_string(),
            create_lock: Mutex::new(()),
        }
    }

    /// Devuelve la identidad del borrador, creándolo si aún no existe.
    /// Idempotente bajo concurrencia: como mucho una llamada al colaborador
    /// por sesión.
    pub async fn ensure_draft(&self) -> Result<Uuid, WizardError> {
        let (slug, epoch) = {
            let session = self.session.read().await;
            if let Some(id) = session.draft_id {
                return Ok(id);
            }
            (session.service_slug.clone(), session.epoch)
        };

        let _guard = self.create_lock.lock().await;

        // Doble comprobación: otra llamada pudo materializarlo mientras
        // esperábamos el candado.
        {
            let session = self.session.read().await;
            if let Some(id) = session.draft_id {
                return Ok(id);
            }
        }

        let id = self.provider.create_draft(&slug, &self.locale).await?;

        let mut session = self.session.write().await;
        if session.epoch != epoch {
            // La sesión se reinició durante la creación: el borrador recién
            // creado no pertenece a la generación actual.
            return Err(WizardError::InvalidTransition(
                "la sesión se reinició durante la creación del borrador".into(),
            ));
        }
        session.draft_id = Some(id);
        Ok(id)
    }
}
