use thiserror::Error;

use super::provider_error::ProviderError;

/// Errores del contrato público del asistente.
/// Los fallos de validación por campo NO viajan por aquí: son datos (el mapa
/// `errors` de la sesión); esta enumeración cubre los fallos de operación.
#[derive(Debug, Error)]
pub enum WizardError {
    /// El usuario debe iniciar sesión para continuar.
    #[error("Autenticación requerida")]
    AuthRequired,
    /// Aún no existe borrador para la sesión (p. ej. adjuntar antes de que
    /// se materialice). Condición recuperable que se auto-resuelve; la UI
    /// muestra "espere un momento", no un error.
    #[error("El borrador aún no está listo: {0}")]
    NotReady(String),
    /// Fallo de E/S de un colaborador; la sesión queda intacta y la
    /// operación puede reintentarse.
    #[error("Error transitorio de E/S: {0}")]
    Transient(String),
    /// La operación no procede porque la validación la bloquea.
    #[error("Validación fallida: {0}")]
    Validation(String),
    /// Hay otra invocación del mismo punto de suspensión en vuelo
    /// (doble clic en continuar / enviar).
    #[error("Operación ya en curso: {0}")]
    Busy(String),
    /// Transición no permitida desde el estado actual.
    #[error("Transición no válida: {0}")]
    InvalidTransition(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProviderError> for WizardError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::AuthRequired => WizardError::AuthRequired,
            ProviderError::Transient(msg) => WizardError::Transient(msg),
            ProviderError::Invalid(msg) => WizardError::Validation(msg),
        }
    }
}
