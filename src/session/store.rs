//! Caché local de respuestas en curso, clave = slug del servicio.
//! Almacenamiento en memoria (rápido para tests y prototipos) y, si se
//! inicializa con un directorio, persiste también cada entrada como JSON
//! para sobrevivir recargas de página.
//!
//! Reglas de reconciliación (la caché es consultiva, no fuente de verdad):
//! - Sólo guarda el mapa `answers` (nunca bytes de archivos, nunca
//!   `draft_id`, nunca metadatos de adjuntos).
//! - Escrituras last-write-wins; se espera que sean baratas y frecuentes.
//! - Tras un envío terminal o un reset se descarta, nunca se mezcla.
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::WizardError;
use crate::hashing;

/// Entrada de caché: respuestas + huella canónica + marca temporal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDraft {
    pub answers: IndexMap<String, String>,
    /// SHA-256 de la forma canónica de `answers`; si al restaurar no
    /// coincide con lo recalculado, la entrada está corrupta y se descarta.
    pub fingerprint: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct DraftCacheStore {
    in_memory: DashMap<String, CachedDraft>,
    dir: Option<PathBuf>,
}

impl DraftCacheStore {
    /// Caché sólo en memoria.
    pub fn new() -> Self {
        Self { in_memory: DashMap::new(), dir: None }
    }

    /// Caché con respaldo en disco bajo `dir` (un JSON por servicio).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { in_memory: DashMap::new(), dir: Some(dir.into()) }
    }

    /// Guarda (last-write-wins) las respuestas para un servicio.
    pub fn persist(&self, service_slug: &str, answers: &IndexMap<String, String>) -> Result<(), WizardError> {
        let entry = CachedDraft {
            answers: answers.clone(),
            fingerprint: hashing::fingerprint_answers(answers),
            saved_at: Utc::now(),
        };
        if let Some(dir) = &self.dir {
            fs::create_dir_all(dir)?;
            let json = serde_json::to_string(&entry)
                .map_err(|e| WizardError::Transient(format!("serialización de caché: {e}")))?;
            fs::write(self.file_path(dir, service_slug), json)?;
        }
        self.in_memory.insert(service_slug.to_string(), entry);
        Ok(())
    }

    /// Recupera la entrada para un servicio: primero memoria, después disco.
    /// Las entradas con huella inconsistente se tratan como inexistentes.
    pub fn load(&self, service_slug: &str) -> Option<CachedDraft> {
        if let Some(entry) = self.in_memory.get(service_slug) {
            return Some(entry.clone());
        }
        let dir = self.dir.as_ref()?;
        let raw = fs::read_to_string(self.file_path(dir, service_slug)).ok()?;
        let entry: CachedDraft = serde_json::from_str(&raw).ok()?;
        if hashing::fingerprint_answers(&entry.answers) != entry.fingerprint {
            return None;
        }
        self.in_memory.insert(service_slug.to_string(), entry.clone());
        Some(entry)
    }

    /// Elimina la entrada (envío terminal o reset explícito).
    pub fn clear(&self, service_slug: &str) {
        self.in_memory.remove(service_slug);
        if let Some(dir) = &self.dir {
            let _ = fs::remove_file(self.file_path(dir, service_slug));
        }
    }

    fn file_path(&self, dir: &PathBuf, service_slug: &str) -> PathBuf {
        // El slug viene del catálogo, pero se sanea igualmente antes de
        // usarlo como nombre de archivo.
        let safe: String = service_slug
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        dir.join(format!("{safe}.json"))
    }
}

impl Default for DraftCacheStore {
    fn default() -> Self {
        Self::new()
    }
}
