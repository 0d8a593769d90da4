//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`): límite de tamaño de adjuntos, directorio opcional de la caché
//! local de borradores y locale por defecto del storefront.
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Configuración global de la aplicación (extensible para más secciones).
pub struct AppConfig {
    /// Límites de subida de adjuntos.
    pub upload: UploadConfig,
    /// Caché local de respuestas en curso.
    pub cache: CacheConfig,
    /// Locale por defecto con el que se crean los borradores.
    pub default_locale: String,
}

/// Parámetros de subida de archivos.
pub struct UploadConfig {
    /// Tamaño máximo de un adjunto en bytes; se comprueba en cliente antes
    /// de cualquier llamada de red.
    pub max_file_bytes: u64,
}

/// Parámetros de la caché local.
pub struct CacheConfig {
    /// Directorio donde persistir la caché como JSON; `None` = sólo memoria.
    pub dir: Option<String>,
}

/// Límite por defecto: 10 MB, igual que el backend.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    Lazy::force(&DOTENV_LOADED);
    let max_file_bytes = env::var("MAX_UPLOAD_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_FILE_BYTES);
    let dir = env::var("DRAFT_CACHE_DIR").ok();
    let default_locale = env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "ar".to_string());
    AppConfig {
        upload: UploadConfig { max_file_bytes },
        cache: CacheConfig { dir },
        default_locale,
    }
});

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
