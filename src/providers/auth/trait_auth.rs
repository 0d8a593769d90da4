use async_trait::async_trait;

use crate::data::types::UserRef;
use crate::errors::ProviderError;

/// Colaborador de autenticación. El asistente sólo necesita saber si hay
/// usuario con sesión iniciada; la gestión de sesiones es externa.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Usuario actual, o `None` si no hay sesión.
    async fn current_user(&self) -> Result<Option<UserRef>, ProviderError>;
}
