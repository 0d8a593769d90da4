//! Agregado en memoria de una ejecución del asistente.
//!
//! Invariantes que mantiene el controlador sobre esta estructura:
//! - `current_step_index` siempre indexa un paso válido del modo activo.
//! - `draft_id` se asigna como mucho una vez por sesión y nunca se reasigna
//!   (sólo `reset` y la destrucción terminal lo descartan, junto con el
//!   resto del estado).
//! - Un campo nunca figura a la vez en `attachments` y en `uploading_fields`
//!   más allá de la vida de su subida.
//! - `errors` no contiene entradas para campos que satisfacen su regla.
//! - `epoch` crece en cada `reset`: toda resolución asíncrona captura el
//!   valor al empezar y descarta su resultado si ya no coincide.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use servi_domain::{Attachment, PricingQuote};

use super::types::{FlowMode, PaymentSession, WizardStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSession {
    pub service_slug: String,
    pub flow_mode: FlowMode,
    pub status: WizardStatus,
    pub current_step_index: usize,
    /// Respuestas por nombre de campo, en orden de primera escritura.
    pub answers: IndexMap<String, String>,
    /// Mensajes de validación vigentes por campo.
    pub errors: IndexMap<String, String>,
    pub draft_id: Option<Uuid>,
    pub attachments: HashMap<String, Attachment>,
    pub uploading_fields: HashSet<String>,
    /// Presupuesto derivado vigente; nunca se persiste.
    pub quote: PricingQuote,
    /// Sólo en modo checkout mientras el estado es `Payment`.
    pub payment: Option<PaymentSession>,
    /// Generación de la sesión; ver nota del módulo.
    pub epoch: u64,
}

impl WizardSession {
    pub fn new(service_slug: &str, flow_mode: FlowMode) -> Self {
        Self {
            service_slug: service_slug.to_string(),
            flow_mode,
            status: WizardStatus::Checking,
            current_step_index: 0,
            answers: IndexMap::new(),
            errors: IndexMap::new(),
            draft_id: None,
            attachments: HashMap::new(),
            uploading_fields: HashSet::new(),
            quote: PricingQuote::zero(),
            payment: None,
            epoch: 0,
        }
    }

    /// Vuelve la sesión a su estado inicial (reset explícito o destrucción
    /// tras un envío terminal). Incrementa `epoch` para que las resoluciones
    /// asíncronas pendientes descarten su resultado.
    pub fn reset(&mut self) {
        self.status = WizardStatus::Checking;
        self.current_step_index = 0;
        self.answers.clear();
        self.errors.clear();
        self.draft_id = None;
        self.attachments.clear();
        self.uploading_fields.clear();
        self.quote = PricingQuote::zero();
        self.payment = None;
        self.epoch += 1;
    }

    /// Destrucción tras un envío terminal con éxito: mismo vaciado que
    /// `reset` (mapas, borrador, índice de paso, salto de `epoch`), pero la
    /// sesión queda en el estado terminal para que el cliente muestre la
    /// confirmación. Una ejecución posterior parte de cero.
    pub fn destroy(&mut self, terminal: WizardStatus) {
        self.reset();
        self.status = terminal;
    }

    /// Un campo con subida en vuelo bloquea el avance del paso que lo
    /// contiene (se trata como inválido, no como "pendiente").
    pub fn is_uploading(&self, field: &str) -> bool {
        self.uploading_fields.contains(field)
    }
}
