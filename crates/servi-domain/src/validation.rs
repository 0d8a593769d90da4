//! Motor de validación de campos y pasos.
//! Funciones puras: los fallos de validación son datos (mapas de mensajes
//! por campo), nunca errores propagados; jamás cruzan el límite del paso en
//! el que se originan.
use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::attachment::Attachment;
use crate::field_schema::{fields, FieldKind, FieldSchema, StepSchema};
use crate::phone;

/// Forma mínima razonable de un email; la verificación real la hace el
/// backend de correo al enviar.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Valida un único campo contra su esquema.
/// Precedencia estricta: requerido-pero-vacío → chequeo de forma según el
/// tipo → ok. Un campo opcional vacío nunca produce error de forma.
pub fn validate_field(schema: &FieldSchema, raw: &str) -> Result<(), String> {
    let value = raw.trim();

    if value.is_empty() {
        if schema.required && schema.kind != FieldKind::File {
            return Err("Este campo es obligatorio".to_string());
        }
        return Ok(());
    }

    match schema.kind {
        FieldKind::Email => {
            if !EMAIL_RE.is_match(value) {
                return Err("Dirección de correo no válida".to_string());
            }
        }
        FieldKind::Tel => {
            if let Err(e) = phone::normalize(value) {
                return Err(e.to_string());
            }
        }
        FieldKind::Select => {
            if !schema.options.is_empty() && !schema.accepts_option(value) {
                return Err("Opción no reconocida".to_string());
            }
        }
        // Texto libre, fechas y archivos no tienen chequeo de forma aquí;
        // la presencia del adjunto se comprueba a nivel de paso.
        FieldKind::Text | FieldKind::Textarea | FieldKind::Date | FieldKind::File => {}
    }

    Ok(())
}

/// Valida un paso completo: cada campo contra su esquema, presencia de
/// adjunto para campos file obligatorios y reglas cruzadas del paso.
/// Devuelve un mapa ordenado campo → mensaje (vacío si el paso es válido).
pub fn validate_step(
    step: &StepSchema,
    answers: &IndexMap<String, String>,
    attachments: &HashMap<String, Attachment>,
) -> IndexMap<String, String> {
    let mut errors: IndexMap<String, String> = IndexMap::new();

    for schema in &step.fields {
        let raw = answers.get(&schema.name).map(String::as_str).unwrap_or("");

        if schema.kind == FieldKind::File {
            if schema.required && !attachments.contains_key(&schema.name) {
                errors.insert(schema.name.clone(), "Debe adjuntar este documento".to_string());
            }
            continue;
        }

        if let Err(msg) = validate_field(schema, raw) {
            errors.insert(schema.name.clone(), msg);
        }
    }

    // Regla cruzada: "multiple" exige un número de entregas >= 2.
    if step.field(fields::DELIVERY_TYPE).is_some() {
        let delivery = answers.get(fields::DELIVERY_TYPE).map(String::as_str).unwrap_or("");
        if delivery == "multiple" {
            let count_ok = answers
                .get(fields::DELIVERY_COUNT)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .map(|n| n >= 2)
                .unwrap_or(false);
            if !count_ok {
                errors.insert(
                    fields::DELIVERY_COUNT.to_string(),
                    "Con entregas múltiples indique un número de entregas (mínimo 2)".to_string(),
                );
            }
        }
    }

    errors
}

/// Comprobación heurística de documentos requeridos en el paso Review: un
/// documento se da por cubierto si algún nombre de archivo subido contiene
/// alguna palabra clave de su descripción. Aproximada a propósito (puede
/// aceptar y rechazar de más); se usa sólo como aviso blando, nunca como
/// bloqueo por campo.
pub fn validate_required_documents(
    required_docs: &[String],
    uploaded_names: &[String],
) -> Result<(), Vec<String>> {
    let lowered: Vec<String> = uploaded_names.iter().map(|n| n.to_lowercase()).collect();

    let missing: Vec<String> = required_docs
        .iter()
        .filter(|doc| {
            let satisfied = keyword_tokens(doc)
                .iter()
                .any(|tok| lowered.iter().any(|name| name.contains(tok.as_str())));
            !satisfied
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Tokens de palabra clave de la descripción de un documento: palabras
/// alfanuméricas de al menos 3 caracteres, en minúsculas.
fn keyword_tokens(description: &str) -> Vec<String> {
    description
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 3)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_schema::LocalizedText;
    use uuid::Uuid;

    fn text_field(name: &str, required: bool) -> FieldSchema {
        FieldSchema::new(name, FieldKind::Text, required, LocalizedText::new(name, name))
    }

    fn step_with(fields: Vec<FieldSchema>) -> StepSchema {
        StepSchema::new("test", LocalizedText::new("اختبار", "Test"), fields)
    }

    #[test]
    fn test_required_empty_takes_precedence() {
        let schema =
            FieldSchema::new("email", FieldKind::Email, true, LocalizedText::new("بريد", "Email"));
        let err = validate_field(&schema, "   ").unwrap_err();
        assert_eq!(err, "Este campo es obligatorio");
    }

    #[test]
    fn test_optional_empty_is_ok() {
        let schema =
            FieldSchema::new("email", FieldKind::Email, false, LocalizedText::new("بريد", "Email"));
        assert!(validate_field(&schema, "").is_ok());
    }

    #[test]
    fn test_email_shape() {
        let schema =
            FieldSchema::new("email", FieldKind::Email, true, LocalizedText::new("بريد", "Email"));
        assert!(validate_field(&schema, "user@example.com").is_ok());
        assert!(validate_field(&schema, "no-arroba").is_err());
        assert!(validate_field(&schema, "a@b").is_err());
    }

    #[test]
    fn test_tel_delegates_to_phone_normalization() {
        let schema =
            FieldSchema::new("phone", FieldKind::Tel, true, LocalizedText::new("هاتف", "Phone"));
        assert!(validate_field(&schema, "0592123456").is_ok());
        let err = validate_field(&schema, "+1592123456").unwrap_err();
        assert!(err.contains("+1"), "mensaje: {err}");
    }

    #[test]
    fn test_step_collects_errors_per_field() {
        let step = step_with(vec![text_field("full_name", true), text_field("notes", false)]);
        let answers: IndexMap<String, String> = IndexMap::new();
        let errors = validate_step(&step, &answers, &HashMap::new());
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("full_name"));
    }

    #[test]
    fn test_required_file_without_attachment_blocks() {
        let step = step_with(vec![FieldSchema::new(
            "passport",
            FieldKind::File,
            true,
            LocalizedText::new("جواز", "Passport"),
        )]);
        let errors = validate_step(&step, &IndexMap::new(), &HashMap::new());
        assert!(errors.contains_key("passport"));

        let mut attachments = HashMap::new();
        attachments.insert(
            "passport".to_string(),
            Attachment::new(Uuid::new_v4(), "drafts/d/p.pdf", "p.pdf", 10),
        );
        let errors = validate_step(&step, &IndexMap::new(), &attachments);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_multiple_deliveries_require_count() {
        let step = step_with(vec![
            text_field(fields::DELIVERY_TYPE, true),
            text_field(fields::DELIVERY_COUNT, false),
        ]);
        let mut answers = IndexMap::new();
        answers.insert(fields::DELIVERY_TYPE.to_string(), "multiple".to_string());
        let errors = validate_step(&step, &answers, &HashMap::new());
        assert!(errors.contains_key(fields::DELIVERY_COUNT));

        answers.insert(fields::DELIVERY_COUNT.to_string(), "3".to_string());
        let errors = validate_step(&step, &answers, &HashMap::new());
        assert!(!errors.contains_key(fields::DELIVERY_COUNT));

        // count = 1 no basta
        answers.insert(fields::DELIVERY_COUNT.to_string(), "1".to_string());
        let errors = validate_step(&step, &answers, &HashMap::new());
        assert!(errors.contains_key(fields::DELIVERY_COUNT));
    }

    #[test]
    fn test_required_documents_keyword_match() {
        let required = vec!["Copia del passport vigente".to_string(), "Acta de nacimiento".to_string()];
        let uploaded = vec!["passport-scan.pdf".to_string()];
        let missing = validate_required_documents(&required, &uploaded).unwrap_err();
        assert_eq!(missing, vec!["Acta de nacimiento".to_string()]);

        let uploaded =
            vec!["passport-scan.pdf".to_string(), "acta_nacimiento.jpg".to_string()];
        assert!(validate_required_documents(&required, &uploaded).is_ok());
    }

    #[test]
    fn test_required_documents_empty_list_is_ok() {
        assert!(validate_required_documents(&[], &[]).is_ok());
    }
}
