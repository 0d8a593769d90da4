//! Ciclo de vida de los adjuntos.
//!
//! Un adjunto son dos mitades: el objeto en el almacenamiento y su fila de
//! metadatos. Este gestor orquesta ambas fases con compensación (si la fila
//! no se puede insertar, el objeto recién subido se borra) y serializa las
//! operaciones por campo con un candado por nombre de campo, de modo que una
//! subida y un borrado sobre el mismo campo nunca se solapen.
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};

use servi_domain::Attachment;

use crate::data::session::WizardSession;
use crate::data::types::UploadFile;
use crate::drafts::DraftManager;
use crate::errors::WizardError;
use crate::providers::storage::{AttachmentRecordProvider, ObjectStorageProvider};

pub struct AttachmentManager {
    session: Arc<RwLock<WizardSession>>,
    drafts: Arc<DraftManager>,
    storage: Arc<dyn ObjectStorageProvider>,
    records: Arc<dyn AttachmentRecordProvider>,
    max_file_bytes: u64,
    field_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AttachmentManager {
    pub fn new(
        session: Arc<RwLock<WizardSession>>,
        drafts: Arc<DraftManager>,
        storage: Arc<dyn ObjectStorageProvider>,
        records: Arc<dyn AttachmentRecordProvider>,
        max_file_bytes: u64,
    ) -> Self {
        Self {
            session,
            drafts,
            storage,
            records,
            max_file_bytes,
            field_locks: DashMap::new(),
        }
    }

    fn field_lock(&self, field_name: &str) -> Arc<Mutex<()>> {
        self.field_locks
            .entry(field_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Adjunta un archivo a un campo. Si el campo ya tenía adjunto, el
    /// anterior se retira primero (reemplazo implícito). El tamaño se valida
    /// antes de tocar ningún colaborador.
    pub async fn attach(
        &self,
        field_name: &str,
        file: UploadFile,
    ) -> Result<Attachment, WizardError> {
        if file.size() > self.max_file_bytes {
            return Err(WizardError::Validation(format!(
                "el archivo supera el tamaño máximo de {} bytes",
                self.max_file_bytes
            )));
        }

        let lock = self.field_lock(field_name);
        let _guard = lock.lock().await;

        // El campo cuenta como "subiendo" desde este punto: una subida sin
        // resolver invalida su paso aunque el borrador aún se esté creando.
        let (epoch, previous) = {
            let mut session = self.session.write().await;
            session.uploading_fields.insert(field_name.to_string());
            session.errors.shift_remove(field_name);
            (session.epoch, session.attachments.get(field_name).cloned())
        };

        // El borrador debe existir antes de subir nada: la ruta del objeto
        // se deriva de su identidad.
        let draft_id = match self.drafts.ensure_draft().await {
            Ok(id) => id,
            Err(err) => {
                self.clear_uploading(field_name).await;
                return Err(err);
            }
        };

        // Reemplazo implícito: retirar el adjunto anterior antes de subir el
        // nuevo. Un fallo aquí aborta la subida y conserva el anterior.
        if let Some(old) = previous {
            if let Err(err) = self.delete_remote(&old).await {
                self.clear_uploading(field_name).await;
                return Err(err);
            }
            let mut session = self.session.write().await;
            session.attachments.remove(field_name);
        }

        // Fase 1: subir el objeto.
        let stored = match self.storage.upload(draft_id, field_name, &file).await {
            Ok(stored) => stored,
            Err(err) => {
                self.clear_uploading(field_name).await;
                return Err(err.into());
            }
        };

        // Fase 2: insertar la fila. Si falla, compensar borrando el objeto
        // para no dejar huérfanos.
        let attachment_id = match self
            .records
            .insert(draft_id, field_name, &stored.storage_path, &file.file_name, file.size())
            .await
        {
            Ok(id) => id,
            Err(err) => {
                let _ = self.storage.delete(&stored.storage_path).await;
                self.clear_uploading(field_name).await;
                return Err(err.into());
            }
        };

        let attachment =
            Attachment::new(attachment_id, &stored.storage_path, &file.file_name, file.size());

        let mut session = self.session.write().await;
        session.uploading_fields.remove(field_name);
        if session.epoch != epoch {
            // La sesión se reinició durante la subida: el adjunto ya no
            // pertenece a la generación actual; deshacer ambas fases.
            drop(session);
            let _ = self.records.delete(attachment_id).await;
            let _ = self.storage.delete(&stored.storage_path).await;
            return Err(WizardError::InvalidTransition(
                "la sesión se reinició durante la subida".into(),
            ));
        }
        session.attachments.insert(field_name.to_string(), attachment.clone());
        Ok(attachment)
    }

    /// Retira el adjunto de un campo: objeto, fila y entrada local, en ese
    /// orden. Si un colaborador falla, la entrada local se conserva para que
    /// el usuario pueda reintentar. Sin adjunto es una no-operación.
    pub async fn detach(&self, field_name: &str) -> Result<(), WizardError> {
        let lock = self.field_lock(field_name);
        let _guard = lock.lock().await;

        let attachment = {
            let session = self.session.read().await;
            match session.attachments.get(field_name) {
                Some(att) => att.clone(),
                None => return Ok(()),
            }
        };

        self.delete_remote(&attachment).await?;

        let mut session = self.session.write().await;
        session.attachments.remove(field_name);
        Ok(())
    }

    async fn delete_remote(&self, attachment: &Attachment) -> Result<(), WizardError> {
        self.storage.delete(&attachment.storage_path).await?;
        self.records.delete(attachment.id).await?;
        Ok(())
    }

    async fn clear_uploading(&self, field_name: &str) {
        let mut session = self.session.write().await;
        session.uploading_fields.remove(field_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::session::WizardSession;
    use crate::data::types::FlowMode;
    use crate::providers::drafts::implementations::InMemoryDraftProvider;
    use crate::providers::storage::implementations::{
        InMemoryRecordProvider, InMemoryStorageProvider,
    };

    struct Harness {
        session: Arc<RwLock<WizardSession>>,
        storage: Arc<InMemoryStorageProvider>,
        records: Arc<InMemoryRecordProvider>,
        manager: AttachmentManager,
    }

    fn harness(max_file_bytes: u64) -> Harness {
        let session = Arc::new(RwLock::new(WizardSession::new(
            "translation-certificate",
            FlowMode::Quote,
        )));
        let drafts = Arc::new(DraftManager::new(
            session.clone(),
            Arc::new(InMemoryDraftProvider::new()),
            "ar",
        ));
        let storage = Arc::new(InMemoryStorageProvider::new());
        let records = Arc::new(InMemoryRecordProvider::new());
        let manager = AttachmentManager::new(
            session.clone(),
            drafts,
            storage.clone(),
            records.clone(),
            max_file_bytes,
        );
        Harness { session, storage, records, manager }
    }

    #[tokio::test]
    async fn test_attach_stores_both_halves() {
        let h = harness(1024);
        let att = h
            .manager
            .attach("passport", UploadFile::new("passport.pdf", vec![1; 100]))
            .await
            .unwrap();

        assert_eq!(h.storage.object_count(), 1);
        assert_eq!(h.records.row_count(), 1);
        let session = h.session.read().await;
        assert_eq!(session.attachments.get("passport"), Some(&att));
        assert!(!session.is_uploading("passport"));
        assert!(session.draft_id.is_some());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_any_upload() {
        let h = harness(10);
        let err = h
            .manager
            .attach("passport", UploadFile::new("big.pdf", vec![0; 11]))
            .await
            .unwrap_err();

        assert!(matches!(err, WizardError::Validation(_)));
        assert_eq!(h.storage.object_count(), 0);
        assert!(h.session.read().await.draft_id.is_none());
    }

    #[tokio::test]
    async fn test_row_insert_failure_compensates_upload() {
        let h = harness(1024);
        h.records.set_fail_insert(true);

        let err = h
            .manager
            .attach("passport", UploadFile::new("p.pdf", vec![1; 10]))
            .await
            .unwrap_err();

        assert!(matches!(err, WizardError::Transient(_)));
        // Sin huérfanos: el objeto subido en la fase 1 fue borrado.
        assert_eq!(h.storage.object_count(), 0);
        assert_eq!(h.records.row_count(), 0);
        let session = h.session.read().await;
        assert!(session.attachments.is_empty());
        assert!(!session.is_uploading("passport"));
    }

    #[tokio::test]
    async fn test_replace_removes_previous_attachment() {
        let h = harness(1024);
        h.manager
            .attach("passport", UploadFile::new("old.pdf", vec![1; 10]))
            .await
            .unwrap();
        let new = h
            .manager
            .attach("passport", UploadFile::new("new.pdf", vec![2; 20]))
            .await
            .unwrap();

        assert_eq!(h.storage.object_count(), 1);
        assert_eq!(h.records.row_count(), 1);
        assert_eq!(new.file_name, "new.pdf");
        let session = h.session.read().await;
        assert_eq!(session.attachments.get("passport").unwrap().file_name, "new.pdf");
    }

    #[tokio::test]
    async fn test_detach_failure_keeps_local_entry() {
        let h = harness(1024);
        h.manager
            .attach("passport", UploadFile::new("p.pdf", vec![1; 10]))
            .await
            .unwrap();
        h.storage.set_fail_delete(true);

        let err = h.manager.detach("passport").await.unwrap_err();
        assert!(matches!(err, WizardError::Transient(_)));
        // La entrada local sobrevive para permitir el reintento.
        assert!(h.session.read().await.attachments.contains_key("passport"));

        h.storage.set_fail_delete(false);
        h.manager.detach("passport").await.unwrap();
        assert!(h.session.read().await.attachments.is_empty());
        assert_eq!(h.storage.object_count(), 0);
        assert_eq!(h.records.row_count(), 0);
    }

    #[tokio::test]
    async fn test_detach_without_attachment_is_noop() {
        let h = harness(1024);
        h.manager.detach("passport").await.unwrap();
        assert_eq!(h.storage.object_count(), 0);
    }

    #[tokio::test]
    async fn test_field_counts_as_uploading_while_draft_is_created() {
        let session = Arc::new(RwLock::new(WizardSession::new(
            "translation-certificate",
            FlowMode::Quote,
        )));
        let drafts = Arc::new(DraftManager::new(
            session.clone(),
            Arc::new(InMemoryDraftProvider::with_delay(std::time::Duration::from_millis(40))),
            "ar",
        ));
        let manager = Arc::new(AttachmentManager::new(
            session.clone(),
            drafts,
            Arc::new(InMemoryStorageProvider::new()),
            Arc::new(InMemoryRecordProvider::new()),
            1024,
        ));

        let attaching = tokio::spawn({
            let manager = manager.clone();
            async move { manager.attach("passport", UploadFile::new("p.pdf", vec![1; 8])).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        // La creación del borrador aún no resolvió: el campo ya bloquea su paso.
        assert!(session.read().await.is_uploading("passport"));

        attaching.await.unwrap().unwrap();
        assert!(!session.read().await.is_uploading("passport"));
    }
}
