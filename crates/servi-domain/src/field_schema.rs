//! Esquemas de campos del formulario de intake, definidos por el catálogo.
//! El asistente sólo los lee: qué campos existen, de qué tipo son y cuáles
//! son obligatorios varía por servicio (data-driven). El renderizado y la
//! validación despachan sobre `FieldKind` en lugar de ramas ad hoc.
use serde::{Deserialize, Serialize};

/// Texto localizado (el storefront es bilingüe árabe/inglés).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub ar: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(ar: &str, en: &str) -> Self {
        Self { ar: ar.to_string(), en: en.to_string() }
    }

    /// Devuelve la variante para el locale pedido; `en` actúa de fallback.
    pub fn get(&self, locale: &str) -> &str {
        match locale {
            "ar" => &self.ar,
            _ => &self.en,
        }
    }
}

/// Tipo de campo. Variante etiquetada única sobre la que despachan
/// validación y render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    Textarea,
    File,
    Date,
}

/// Opción de un campo `select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: LocalizedText,
}

/// Descripción estática de un campo de intake. Propiedad del colaborador de
/// catálogo; inmutable durante la vida de una sesión del asistente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub label: LocalizedText,
    pub placeholder: Option<LocalizedText>,
    pub help: Option<LocalizedText>,
    /// Sólo relevante para `FieldKind::Select`.
    pub options: Vec<SelectOption>,
}

impl FieldSchema {
    pub fn new(name: &str, kind: FieldKind, required: bool, label: LocalizedText) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required,
            label,
            placeholder: None,
            help: None,
            options: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: LocalizedText) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_help(mut self, help: LocalizedText) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Un valor de `select` sólo es válido si figura entre las opciones.
    pub fn accepts_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Un paso del asistente: identificador estable + campos ordenados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSchema {
    pub id: String,
    pub title: LocalizedText,
    pub fields: Vec<FieldSchema>,
}

impl StepSchema {
    pub fn new(id: &str, title: LocalizedText, fields: Vec<FieldSchema>) -> Self {
        Self { id: id.to_string(), title, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Nombres de campo con semántica fija para el asistente (afectan precio o
/// reglas cruzadas). El resto de campos es opaco.
pub mod fields {
    pub const URGENCY: &str = "urgency";
    pub const SHIPPING_LOCATION: &str = "shipping_location";
    pub const DELIVERY_TYPE: &str = "delivery_type";
    pub const DELIVERY_COUNT: &str = "delivery_count";

    /// Indica si un cambio en `name` obliga a recalcular el precio mostrado.
    pub fn affects_price(name: &str) -> bool {
        matches!(name, URGENCY | SHIPPING_LOCATION | DELIVERY_TYPE | DELIVERY_COUNT)
    }
}
