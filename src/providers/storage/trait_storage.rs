use async_trait::async_trait;
use uuid::Uuid;

use crate::data::types::{StoredObject, UploadFile};
use crate::errors::ProviderError;

/// Colaborador de almacenamiento de objetos: la fase 1 de un adjunto.
/// La fase 2 (fila de metadatos) la cubre `AttachmentRecordProvider`; el
/// gestor de adjuntos orquesta ambas con compensación.
#[async_trait]
pub trait ObjectStorageProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Sube los bytes del archivo bajo el borrador y campo dados; devuelve
    /// la ruta del objeto almacenado.
    async fn upload(
        &self,
        draft_id: Uuid,
        field_name: &str,
        file: &UploadFile,
    ) -> Result<StoredObject, ProviderError>;

    /// Borra el objeto. Debe ser seguro invocarlo como compensación de una
    /// fase 2 fallida (el objeto puede no existir ya).
    async fn delete(&self, storage_path: &str) -> Result<(), ProviderError>;
}
