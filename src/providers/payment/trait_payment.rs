use async_trait::async_trait;

use crate::data::types::PaymentOutcome;
use crate::errors::ProviderError;

/// Colaborador de pago: ejecuta el flujo externo (pasarela, app bancaria)
/// para una factura y resuelve con confirmación o cancelación del usuario.
#[async_trait]
pub trait PaymentFlowProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    async fn run(
        &self,
        invoice_id: &str,
        amount: f64,
        currency: &str,
    ) -> Result<PaymentOutcome, ProviderError>;
}
