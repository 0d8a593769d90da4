//! Autenticación de referencia: el estado de sesión se controla desde los
//! tests (sign_in / sign_out) para ejercitar `Checking` → `Ready` y el
//! fallback a `Unauthenticated`.
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::types::UserRef;
use crate::errors::ProviderError;
use crate::providers::auth::trait_auth::AuthProvider;

pub struct TestAuthProvider {
    user: Mutex<Option<UserRef>>,
}

impl TestAuthProvider {
    /// Arranca con un usuario de prueba ya autenticado.
    pub fn signed_in() -> Self {
        Self {
            user: Mutex::new(Some(UserRef { id: Uuid::new_v4(), email: "cliente@example.com".into() })),
        }
    }

    /// Arranca sin sesión.
    pub fn signed_out() -> Self {
        Self { user: Mutex::new(None) }
    }

    pub fn sign_in(&self, email: &str) {
        *self.user.lock().unwrap() = Some(UserRef { id: Uuid::new_v4(), email: email.to_string() });
    }

    pub fn sign_out(&self) {
        *self.user.lock().unwrap() = None;
    }
}

#[async_trait]
impl AuthProvider for TestAuthProvider {
    fn get_name(&self) -> &str {
        "test_auth"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Proveedor de autenticación controlable desde tests"
    }

    async fn current_user(&self) -> Result<Option<UserRef>, ProviderError> {
        Ok(self.user.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = TestAuthProvider::signed_out();
        assert!(auth.current_user().await.unwrap().is_none());
        auth.sign_in("lina@example.com");
        let user = auth.current_user().await.unwrap().expect("sesión iniciada");
        assert_eq!(user.email, "lina@example.com");
        auth.sign_out();
        assert!(auth.current_user().await.unwrap().is_none());
    }
}
