//! Colaborador de pago guionizado: resuelve cada invocación con el siguiente
//! resultado de una cola fija, registrando las facturas que se le pidieron.
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::data::types::PaymentOutcome;
use crate::errors::ProviderError;
use crate::providers::payment::trait_payment::PaymentFlowProvider;

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub invoice_id: String,
    pub amount: f64,
    pub currency: String,
}

pub struct ScriptedPaymentProvider {
    script: Mutex<Vec<PaymentOutcome>>,
    requests: Mutex<Vec<PaymentRequest>>,
    delay: Duration,
}

impl ScriptedPaymentProvider {
    /// Los resultados se consumen en orden; con el guion agotado se resuelve
    /// `Confirmed`.
    pub fn new(outcomes: Vec<PaymentOutcome>) -> Self {
        let mut script = outcomes;
        script.reverse();
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn always_confirming() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<PaymentRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentFlowProvider for ScriptedPaymentProvider {
    fn get_name(&self) -> &str {
        "scripted_payment"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Flujo de pago guionizado para pruebas"
    }

    async fn run(
        &self,
        invoice_id: &str,
        amount: f64,
        currency: &str,
    ) -> Result<PaymentOutcome, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.requests.lock().unwrap().push(PaymentRequest {
            invoice_id: invoice_id.to_string(),
            amount,
            currency: currency.to_string(),
        });
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(PaymentOutcome::Confirmed))
    }
}
