use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ProviderError;

/// Colaborador de creación de borradores: una fila por (servicio, sesión de
/// cliente), creada perezosamente. El asistente la trata como identidad
/// opaca; el payload se sobreescribe entero en el envío final.
#[async_trait]
pub trait DraftProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Crea el borrador y devuelve su identidad. Debe reportar
    /// `ProviderError::AuthRequired` como condición distinguible para que el
    /// controlador caiga a `Unauthenticated` y no a un error genérico.
    async fn create_draft(&self, service_slug: &str, locale: &str) -> Result<Uuid, ProviderError>;
}
