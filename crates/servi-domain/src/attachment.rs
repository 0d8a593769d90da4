use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Un archivo subido y ligado a un único campo del asistente.
/// Invariante: existe si y sólo si sus bytes están en el almacenamiento de
/// objetos Y existe la fila de metadatos correspondiente; las dos mitades se
/// crean y se borran juntas (la orquestación vive en el gestor de adjuntos).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Identificador asignado por el colaborador relacional.
    pub id: Uuid,
    /// Ruta del objeto en el almacenamiento remoto.
    pub storage_path: String,
    pub file_name: String,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(id: Uuid, storage_path: &str, file_name: &str, file_size: u64) -> Self {
        Self {
            id,
            storage_path: storage_path.to_string(),
            file_name: file_name.to_string(),
            file_size,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_fields() {
        let id = Uuid::new_v4();
        let att = Attachment::new(id, "drafts/x/passport.pdf", "passport.pdf", 2048);
        assert_eq!(att.id, id);
        assert_eq!(att.storage_path, "drafts/x/passport.pdf");
        assert_eq!(att.file_name, "passport.pdf");
        assert_eq!(att.file_size, 2048);
    }
}
