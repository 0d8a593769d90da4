//! Validación de pasos a nivel de controlador.
//! Combina la validación pura del dominio con el estado de la sesión: una
//! subida en vuelo sobre un campo file de un paso cuenta como inválida para
//! el avance, aunque no sea un error de forma.
use indexmap::IndexMap;

use servi_domain::{validation, FieldKind, StepSchema};

use crate::data::session::WizardSession;

/// Mensaje mostrado cuando un campo file tiene la subida en curso y el
/// usuario intenta avanzar o enviar.
pub const UPLOAD_IN_FLIGHT_MSG: &str = "Subida en curso, espere a que termine";

/// Errores que impiden abandonar un paso: validación de dominio más el
/// bloqueo por subidas en vuelo. Mapa ordenado campo → mensaje.
pub fn gate_errors(step: &StepSchema, session: &WizardSession) -> IndexMap<String, String> {
    let mut errors = validation::validate_step(step, &session.answers, &session.attachments);

    for schema in &step.fields {
        if schema.kind == FieldKind::File && session.is_uploading(&schema.name) {
            errors.insert(schema.name.clone(), UPLOAD_IN_FLIGHT_MSG.to_string());
        }
    }

    errors
}

/// Índice del primer paso con errores de gate, si lo hay. Lo usa el envío
/// final para reposicionar al usuario sobre el primer paso inválido.
pub fn first_invalid_step(steps: &[StepSchema], session: &WizardSession) -> Option<usize> {
    steps.iter().position(|step| !gate_errors(step, session).is_empty())
}
