//! Normalización y validación de números de teléfono palestinos.
//!
//! No es una regex única sino una secuencia comprometida de rechazos: cada
//! etapa asume que la anterior ya normalizó el valor, por lo que el orden es
//! obligatorio:
//! 1. Limpieza de separadores (espacios, paréntesis, guiones).
//! 2. Rechazo si no quedan dígitos o hay caracteres extraños.
//! 3. Prefijo internacional con `+`: sólo se admite `+970`; cualquier otro
//!    código se rechaza nombrando el prefijo ofensivo.
//! 4. Des-prefijado en orden de prioridad: internacional (`+970` / `00970`),
//!    luego `970` "troncal" si el resto es suficientemente largo, luego un
//!    cero troncal inicial.
//! 5. Longitud exacta de abonado (9), nombrando cuántos dígitos faltan o
//!    sobran.
//! 6. Primer dígito `5`; segundo dígito en `6..=9`, nombrando el dígito
//!    inválido y el rango válido.
use thiserror::Error;

/// Código de país esperado (Palestina).
pub const COUNTRY_CODE: &str = "970";
/// Longitud exacta del número de abonado ya normalizado.
pub const SUBSCRIBER_LEN: usize = 9;
/// Primer dígito obligatorio del abonado móvil.
pub const LEADING_DIGIT: char = '5';
/// Rango válido del segundo dígito.
pub const SECOND_DIGIT_RANGE: (char, char) = ('6', '9');

/// Códigos de país reconocidos para poder nombrar el prefijo ofensivo en el
/// mensaje de error (el más largo que encaje gana; si ninguno encaja se usa
/// el primer dígito).
const KNOWN_COUNTRY_CODES: &[&str] = &[
    "970", "972", "971", "966", "962", "961", "20", "90", "44", "49", "39", "34", "33", "1", "7",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("El número no contiene dígitos")]
    Empty,
    #[error("Carácter no válido en el número: '{0}'")]
    InvalidChar(char),
    #[error("Prefijo internacional no admitido: +{0} (se espera +{COUNTRY_CODE})")]
    ForeignPrefix(String),
    #[error("Número demasiado corto: faltan {missing} dígitos (se esperan {SUBSCRIBER_LEN})")]
    TooShort { missing: usize },
    #[error("Número demasiado largo: sobran {extra} dígitos (se esperan {SUBSCRIBER_LEN})")]
    TooLong { extra: usize },
    #[error("El número de abonado debe comenzar por {LEADING_DIGIT} (recibido '{0}')")]
    BadLeadingDigit(char),
    #[error("Segundo dígito '{0}' fuera de rango (válido {min}-{max})", min = SECOND_DIGIT_RANGE.0, max = SECOND_DIGIT_RANGE.1)]
    BadSecondDigit(char),
}

/// Identifica el código de país al inicio de `digits` para el mensaje de
/// error. Prueba prefijos de 3, 2 y 1 dígitos contra la lista conocida.
fn detect_country_code(digits: &str) -> String {
    for len in [3usize, 2, 1] {
        if digits.len() >= len {
            let candidate = &digits[..len];
            if KNOWN_COUNTRY_CODES.contains(&candidate) {
                return candidate.to_string();
            }
        }
    }
    digits.chars().take(1).collect()
}

/// Normaliza `raw` al número de abonado canónico de 9 dígitos, o devuelve el
/// primer rechazo aplicable.
pub fn normalize(raw: &str) -> Result<String, PhoneError> {
    // 1. Limpieza: espacios, paréntesis y guiones se descartan.
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')' && *c != '-')
        .collect();

    let (has_plus, body) = match cleaned.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    // 2. Tras la limpieza sólo se admiten dígitos.
    if let Some(bad) = body.chars().find(|c| !c.is_ascii_digit()) {
        return Err(PhoneError::InvalidChar(bad));
    }
    if body.is_empty() {
        return Err(PhoneError::Empty);
    }

    // 3/4. Des-prefijado en orden de prioridad estricto.
    let subscriber: &str = if has_plus {
        match body.strip_prefix(COUNTRY_CODE) {
            Some(rest) => rest,
            None => return Err(PhoneError::ForeignPrefix(detect_country_code(body))),
        }
    } else if let Some(rest) = body.strip_prefix("00") {
        // Forma internacional 00XXX: mismo criterio que con '+'. Sin dígitos
        // tras el prefijo no hay código de país que nombrar.
        if rest.is_empty() {
            return Err(PhoneError::Empty);
        }
        match rest.strip_prefix(COUNTRY_CODE) {
            Some(rest) => rest,
            None => return Err(PhoneError::ForeignPrefix(detect_country_code(rest))),
        }
    } else if body.starts_with(COUNTRY_CODE) && body.len() - COUNTRY_CODE.len() >= SUBSCRIBER_LEN {
        // Prefijo 970 sin '+': sólo se interpreta como código de país si el
        // resto alcanza para un abonado completo.
        &body[COUNTRY_CODE.len()..]
    } else if let Some(rest) = body.strip_prefix('0') {
        rest
    } else {
        body
    };

    // 5. Longitud exacta.
    if subscriber.len() < SUBSCRIBER_LEN {
        return Err(PhoneError::TooShort { missing: SUBSCRIBER_LEN - subscriber.len() });
    }
    if subscriber.len() > SUBSCRIBER_LEN {
        return Err(PhoneError::TooLong { extra: subscriber.len() - SUBSCRIBER_LEN });
    }

    // 6. Estructura del abonado: 5[6-9]XXXXXXX.
    let mut chars = subscriber.chars();
    let first = chars.next().unwrap_or('0');
    if first != LEADING_DIGIT {
        return Err(PhoneError::BadLeadingDigit(first));
    }
    let second = chars.next().unwrap_or('0');
    if second < SECOND_DIGIT_RANGE.0 || second > SECOND_DIGIT_RANGE.1 {
        return Err(PhoneError::BadSecondDigit(second));
    }

    Ok(subscriber.to_string())
}
