//! Tipos de datos compartidos del asistente: modo de flujo, estado del
//! controlador, referencias de usuario y los recibos que devuelven los
//! colaboradores de envío / checkout / pago.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use servi_domain::TariffType;

/// Moneda en la que se expresan tarifas y cobros del storefront.
pub const CURRENCY: &str = "USD";

/// Modo del asistente: presupuesto (termina en envío de solicitud) o
/// checkout (termina en pago).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    Quote,
    Checkout,
}

/// Estado observable del controlador del asistente.
/// `Payment` sólo existe en modo checkout; `Submitted` y `PaymentConfirmed`
/// son terminales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStatus {
    /// Comprobando autenticación; ninguna otra operación está disponible.
    Checking,
    /// Sin sesión de usuario; se bloquea todo hasta re-autenticar.
    Unauthenticated,
    /// Flujo normal de formulario por pasos.
    Ready,
    /// Envío final en vuelo (el botón queda deshabilitado).
    Submitting,
    /// Esperando el resultado del colaborador de pago.
    Payment,
    Submitted,
    PaymentConfirmed,
}

/// Usuario autenticado, tal y como lo reporta el colaborador de auth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub email: String,
}

/// Metadatos de tarificación de un servicio del catálogo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePricingMeta {
    pub tariff_type: TariffType,
    /// `None` para servicios de precio personalizado (`TariffType::Quote`).
    pub base_amount: Option<f64>,
    /// Descripciones de documentos requeridos (chequeo heurístico en Review).
    pub required_documents: Vec<String>,
}

impl ServicePricingMeta {
    /// Importe base a usar en el cálculo de precio; los servicios de precio
    /// personalizado no muestran importe numérico.
    pub fn pricing_base(&self) -> Option<f64> {
        match self.tariff_type {
            TariffType::Quote => None,
            TariffType::Fixed | TariffType::Starting => self.base_amount,
        }
    }
}

/// Archivo que el usuario selecciona en un campo de tipo `file`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.to_string(), bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Resultado de la fase 1 de un adjunto (objeto subido).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub storage_path: String,
}

/// Recibo del colaborador de envío (modo quote).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub order_number: String,
}

/// Recibo del colaborador de checkout: factura pendiente de pago.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub invoice_id: String,
    pub order_number: String,
}

/// Sesión de pago activa mientras el controlador está en `Payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub invoice_id: String,
    pub order_number: String,
    pub amount: f64,
    pub currency: String,
}

/// Resultado del colaborador de pago (el par de callbacks éxito/cancelación
/// expresado como valor de retorno).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Confirmed,
    Cancelled,
}

/// Resultado de `submit_final`.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalOutcome {
    /// Modo quote: solicitud enviada.
    Submitted { order_number: String },
    /// Modo checkout: factura creada, el controlador pasó a `Payment`.
    PaymentPending { invoice_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_base_for_quote_services_is_none() {
        let meta = ServicePricingMeta {
            tariff_type: TariffType::Quote,
            base_amount: Some(999.0),
            required_documents: vec![],
        };
        assert_eq!(meta.pricing_base(), None);
    }

    #[test]
    fn test_pricing_base_for_fixed_services() {
        let meta = ServicePricingMeta {
            tariff_type: TariffType::Fixed,
            base_amount: Some(100.0),
            required_documents: vec![],
        };
        assert_eq!(meta.pricing_base(), Some(100.0));
    }

    #[test]
    fn test_upload_file_size() {
        let f = UploadFile::new("doc.pdf", vec![0u8; 128]);
        assert_eq!(f.size(), 128);
    }
}
