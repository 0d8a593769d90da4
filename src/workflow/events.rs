//! Eventos observables del asistente.
//! El controlador los emite en cada transición relevante; los observadores
//! los consumen para UI, analítica o registro. La emisión es síncrona y los
//! observadores no deben bloquear.
use std::sync::Mutex;

use serde::Serialize;

use servi_domain::PricingQuote;

use crate::data::types::{PaymentOutcome, WizardStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WizardEvent {
    StatusChanged { status: WizardStatus },
    /// También es el punto de enganche de analítica de navegación.
    StepChanged { step_index: usize, step_id: String },
    FieldUpdated { field: String, valid: bool },
    PricingUpdated { quote: PricingQuote },
    AttachmentStored { field: String, file_name: String },
    AttachmentRemoved { field: String },
    SubmissionCompleted { order_number: String },
    PaymentStarted { invoice_id: String },
    PaymentResolved { confirmed: bool },
    SessionReset,
}

impl WizardEvent {
    pub fn payment_resolved(outcome: PaymentOutcome) -> Self {
        WizardEvent::PaymentResolved { confirmed: outcome == PaymentOutcome::Confirmed }
    }
}

pub trait WizardObserver: Send + Sync {
    fn on_event(&self, event: &WizardEvent);
}

/// Observador que acumula los eventos recibidos; lo usan el binario de
/// demostración y los tests de integración.
pub struct RecordingObserver {
    events: Mutex<Vec<WizardEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    pub fn events(&self) -> Vec<WizardEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardObserver for RecordingObserver {
    fn on_event(&self, event: &WizardEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
