//! ServiFlow Rust Library
//!
//! Este crate es el núcleo del asistente de solicitudes (quote & checkout):
//! - `workflow` contiene el controlador del asistente y sus pasos.
//! - `providers` define los contratos de los colaboradores externos
//!   (catálogo, autenticación, borradores, almacenamiento, envío, pago) y
//!   sus implementaciones de referencia.
//! - `attachments` y `drafts` gestionan los efectos asíncronos con
//!   semántica de compensación.
//! - `session` es la caché local de respuestas en curso.
//! - `errors` y `hashing` son utilidades transversales.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod attachments;
pub mod config;
pub mod data;
pub mod drafts;
pub mod errors;
pub mod hashing;
pub mod providers;
pub mod session;
pub mod workflow;
