use thiserror::Error;

/// Error en la frontera con un colaborador externo. Los errores crudos de
/// cada backend se convierten a esta taxonomía en el punto de llamada; nunca
/// llegan con su forma original al contrato público del asistente.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// El colaborador exige sesión iniciada. Se distingue del resto para que
    /// el controlador pueda ofrecer inicio de sesión en vez de un reintento
    /// genérico.
    #[error("Autenticación requerida")]
    AuthRequired,
    /// Fallo transitorio de red / backend; reintentable.
    #[error("Fallo transitorio del colaborador: {0}")]
    Transient(String),
    /// Petición rechazada por inválida (slug desconocido, payload mal
    /// formado); no reintentable sin corregirla.
    #[error("Petición inválida: {0}")]
    Invalid(String),
}
