use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ProviderError;

/// Colaborador relacional de metadatos de adjuntos: la fase 2 de un adjunto.
/// Un `Attachment` sólo existe cuando el objeto está almacenado Y su fila de
/// metadatos fue insertada.
#[async_trait]
pub trait AttachmentRecordProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Inserta la fila de metadatos y devuelve el id asignado al adjunto.
    async fn insert(
        &self,
        draft_id: Uuid,
        field_name: &str,
        storage_path: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<Uuid, ProviderError>;

    /// Borra la fila de metadatos.
    async fn delete(&self, attachment_id: Uuid) -> Result<(), ProviderError>;
}
