use async_trait::async_trait;

use servi_domain::StepSchema;

use crate::data::types::ServicePricingMeta;
use crate::errors::ProviderError;

/// Colaborador de catálogo: dueño de los esquemas de campos y de los
/// metadatos de tarificación de cada servicio. El asistente sólo lee.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Pasos ordenados del formulario para un servicio, cada uno con sus
    /// campos ordenados. Qué campos son obligatorios varía por servicio.
    async fn get_step_schemas(&self, service_slug: &str) -> Result<Vec<StepSchema>, ProviderError>;

    /// Tipo de tarifa, importe base y documentos requeridos del servicio.
    async fn get_pricing_meta(&self, service_slug: &str) -> Result<ServicePricingMeta, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use servi_domain::{LocalizedText, TariffType};

    struct DummyCatalog;

    #[async_trait]
    impl CatalogProvider for DummyCatalog {
        fn get_name(&self) -> &str {
            "dummy"
        }
        fn get_version(&self) -> &str {
            "0.0"
        }
        fn get_description(&self) -> &str {
            "catálogo de prueba"
        }
        async fn get_step_schemas(&self, _slug: &str) -> Result<Vec<StepSchema>, ProviderError> {
            Ok(vec![StepSchema::new("contact", LocalizedText::new("تواصل", "Contact"), vec![])])
        }
        async fn get_pricing_meta(&self, _slug: &str) -> Result<ServicePricingMeta, ProviderError> {
            Ok(ServicePricingMeta {
                tariff_type: TariffType::Fixed,
                base_amount: Some(10.0),
                required_documents: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_dummy_catalog_methods() {
        let prov = DummyCatalog;
        assert_eq!(prov.get_name(), "dummy");
        assert_eq!(prov.get_version(), "0.0");
        assert_eq!(prov.get_description(), "catálogo de prueba");
        let steps = prov.get_step_schemas("x").await.unwrap();
        assert_eq!(steps.len(), 1);
        let meta = prov.get_pricing_meta("x").await.unwrap();
        assert_eq!(meta.base_amount, Some(10.0));
    }
}
