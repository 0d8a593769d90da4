//! Hashing canónico de estructuras JSON.
//! Se usa para calcular la huella (`fingerprint`) de las respuestas en la
//! caché local: si la huella restaurada no coincide con lo recalculado, la
//! caché se descarta en lugar de mezclarse con el borrador del servidor.
pub mod canonical_json;

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

pub use canonical_json::to_canonical_json;

/// Hash SHA-256 (hex) de la forma canónica de un `Value`.
pub fn hash_value(value: &serde_json::Value) -> String {
    let canonical = to_canonical_json(value);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Huella del mapa de respuestas del asistente. El orden de inserción no
/// afecta al resultado (la canonicalización ordena las claves).
pub fn fingerprint_answers(answers: &IndexMap<String, String>) -> String {
    let value = serde_json::json!(answers
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect::<serde_json::Map<String, serde_json::Value>>());
    hash_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let v = serde_json::json!({"b": 1, "a": "x"});
        assert_eq!(hash_value(&v), hash_value(&v));
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let mut a: IndexMap<String, String> = IndexMap::new();
        a.insert("email".into(), "u@e.com".into());
        a.insert("full_name".into(), "Lina".into());
        let mut b: IndexMap<String, String> = IndexMap::new();
        b.insert("full_name".into(), "Lina".into());
        b.insert("email".into(), "u@e.com".into());
        assert_eq!(fingerprint_answers(&a), fingerprint_answers(&b));
    }

    #[test]
    fn test_fingerprint_changes_with_value() {
        let mut a: IndexMap<String, String> = IndexMap::new();
        a.insert("email".into(), "u@e.com".into());
        let mut b = a.clone();
        b.insert("email".into(), "otro@e.com".into());
        assert_ne!(fingerprint_answers(&a), fingerprint_answers(&b));
    }
}
