use async_trait::async_trait;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::data::types::{CheckoutReceipt, SubmissionReceipt};
use crate::errors::ProviderError;

/// Colaborador de envío final en modo presupuesto: convierte el borrador en
/// una solicitud de servicio y devuelve su número de orden.
#[async_trait]
pub trait SubmissionProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    async fn submit(
        &self,
        draft_id: Uuid,
        answers: &IndexMap<String, String>,
    ) -> Result<SubmissionReceipt, ProviderError>;
}

/// Colaborador de envío final en modo checkout: crea la orden junto con una
/// factura que queda pendiente de pago.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    async fn submit_checkout(
        &self,
        draft_id: Uuid,
        answers: &IndexMap<String, String>,
        total: f64,
    ) -> Result<CheckoutReceipt, ProviderError>;
}
