//! Contratos de los colaboradores externos del asistente.
//! Cada subdirectorio define el trait del colaborador (`trait_*.rs`) y sus
//! implementaciones de referencia (`implementations/`): deterministas, con
//! inyección de fallos para los tests de compensación.
//! El controlador recibe estas referencias explícitamente en su constructor;
//! no hay singletons de proceso.
pub mod auth;
pub mod catalog;
pub mod drafts;
pub mod payment;
pub mod storage;
pub mod submission;
