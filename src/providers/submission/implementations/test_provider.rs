//! Colaboradores de envío en memoria. Registran cada envío recibido y numeran
//! las órdenes secuencialmente (`ORD-0001`, `INV-0001`), con inyección de
//! fallos para probar la recuperación del estado `Submitting`.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::data::types::{CheckoutReceipt, SubmissionReceipt};
use crate::errors::ProviderError;
use crate::providers::submission::trait_submission::{CheckoutProvider, SubmissionProvider};

#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub draft_id: Uuid,
    pub answers: IndexMap<String, String>,
}

pub struct RecordingSubmissionProvider {
    submissions: Mutex<Vec<RecordedSubmission>>,
    order_seq: AtomicU64,
    fail_submit: AtomicBool,
    delay: Option<Duration>,
}

impl RecordingSubmissionProvider {
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            order_seq: AtomicU64::new(0),
            fail_submit: AtomicBool::new(false),
            delay: None,
        }
    }

    /// Variante que retrasa cada envío, para probar carreras con `reset`.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::new() }
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn last_submission(&self) -> Option<RecordedSubmission> {
        self.submissions.lock().unwrap().last().cloned()
    }
}

impl Default for RecordingSubmissionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionProvider for RecordingSubmissionProvider {
    fn get_name(&self) -> &str {
        "recording_submission"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Envío de solicitudes en memoria con numeración secuencial"
    }

    async fn submit(
        &self,
        draft_id: Uuid,
        answers: &IndexMap<String, String>,
    ) -> Result<SubmissionReceipt, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ProviderError::Transient("fallo de envío inyectado".into()));
        }
        let seq = self.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.submissions.lock().unwrap().push(RecordedSubmission {
            draft_id,
            answers: answers.clone(),
        });
        Ok(SubmissionReceipt { order_number: format!("ORD-{seq:04}") })
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCheckout {
    pub draft_id: Uuid,
    pub answers: IndexMap<String, String>,
    pub total: f64,
}

pub struct RecordingCheckoutProvider {
    checkouts: Mutex<Vec<RecordedCheckout>>,
    order_seq: AtomicU64,
    fail_submit: AtomicBool,
}

impl RecordingCheckoutProvider {
    pub fn new() -> Self {
        Self {
            checkouts: Mutex::new(Vec::new()),
            order_seq: AtomicU64::new(0),
            fail_submit: AtomicBool::new(false),
        }
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn checkout_count(&self) -> usize {
        self.checkouts.lock().unwrap().len()
    }

    pub fn last_checkout(&self) -> Option<RecordedCheckout> {
        self.checkouts.lock().unwrap().last().cloned()
    }
}

impl Default for RecordingCheckoutProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckoutProvider for RecordingCheckoutProvider {
    fn get_name(&self) -> &str {
        "recording_checkout"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Checkout en memoria que emite facturas pendientes de pago"
    }

    async fn submit_checkout(
        &self,
        draft_id: Uuid,
        answers: &IndexMap<String, String>,
        total: f64,
    ) -> Result<CheckoutReceipt, ProviderError> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ProviderError::Transient("fallo de checkout inyectado".into()));
        }
        let seq = self.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.checkouts.lock().unwrap().push(RecordedCheckout {
            draft_id,
            answers: answers.clone(),
            total,
        });
        Ok(CheckoutReceipt {
            invoice_id: format!("INV-{seq:04}"),
            order_number: format!("ORD-{seq:04}"),
        })
    }
}
