//! Almacenamiento y metadatos de referencia en memoria, con inyección de
//! fallos por fase para ejercitar la compensación del gestor de adjuntos
//! (fallo en subida, fallo en inserción de fila, fallo en borrado).
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::data::types::{StoredObject, UploadFile};
use crate::errors::ProviderError;
use crate::providers::storage::trait_records::AttachmentRecordProvider;
use crate::providers::storage::trait_storage::ObjectStorageProvider;

pub struct InMemoryStorageProvider {
    objects: DashMap<String, Vec<u8>>,
    fail_upload: AtomicBool,
    fail_delete: AtomicBool,
    upload_seq: AtomicU64,
}

impl InMemoryStorageProvider {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            fail_upload: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            upload_seq: AtomicU64::new(0),
        }
    }

    pub fn set_fail_upload(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Objetos actualmente almacenados (para comprobar ausencia de huérfanos).
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn contains(&self, storage_path: &str) -> bool {
        self.objects.contains_key(storage_path)
    }
}

impl Default for InMemoryStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorageProvider for InMemoryStorageProvider {
    fn get_name(&self) -> &str {
        "in_memory_storage"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Almacenamiento de objetos en memoria con inyección de fallos"
    }

    async fn upload(
        &self,
        draft_id: Uuid,
        field_name: &str,
        file: &UploadFile,
    ) -> Result<StoredObject, ProviderError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ProviderError::Transient("fallo de subida inyectado".into()));
        }
        let seq = self.upload_seq.fetch_add(1, Ordering::SeqCst);
        let storage_path = format!("drafts/{draft_id}/{field_name}/{seq}-{}", file.file_name);
        self.objects.insert(storage_path.clone(), file.bytes.clone());
        Ok(StoredObject { storage_path })
    }

    async fn delete(&self, storage_path: &str) -> Result<(), ProviderError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ProviderError::Transient("fallo de borrado inyectado".into()));
        }
        self.objects.remove(storage_path);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentRow {
    pub draft_id: Uuid,
    pub field_name: String,
    pub storage_path: String,
    pub file_name: String,
    pub file_size: u64,
}

pub struct InMemoryRecordProvider {
    rows: DashMap<Uuid, AttachmentRow>,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
}

impl InMemoryRecordProvider {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            fail_insert: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get_row(&self, attachment_id: Uuid) -> Option<AttachmentRow> {
        self.rows.get(&attachment_id).map(|r| r.clone())
    }
}

impl Default for InMemoryRecordProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentRecordProvider for InMemoryRecordProvider {
    fn get_name(&self) -> &str {
        "in_memory_records"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Filas de metadatos de adjuntos en memoria con inyección de fallos"
    }

    async fn insert(
        &self,
        draft_id: Uuid,
        field_name: &str,
        storage_path: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<Uuid, ProviderError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(ProviderError::Transient("fallo de inserción inyectado".into()));
        }
        let id = Uuid::new_v4();
        self.rows.insert(
            id,
            AttachmentRow {
                draft_id,
                field_name: field_name.to_string(),
                storage_path: storage_path.to_string(),
                file_name: file_name.to_string(),
                file_size,
            },
        );
        Ok(id)
    }

    async fn delete(&self, attachment_id: Uuid) -> Result<(), ProviderError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ProviderError::Transient("fallo de borrado inyectado".into()));
        }
        self.rows.remove(&attachment_id);
        Ok(())
    }
}
