//! Cálculo de precio derivado del asistente.
//! Función pura y determinista: el total se recalcula siempre desde los
//! mismos insumos base (tarifa, nivel de urgencia, envío); nunca se acumula
//! sobre un resultado anterior, lo que elimina la deriva por redondeo.
use serde::{Deserialize, Serialize};

/// Nivel de urgencia solicitado; controla el multiplicador de la tarifa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Standard,
    Express,
    Urgent,
}

impl UrgencyTier {
    pub fn multiplier(&self) -> f64 {
        match self {
            UrgencyTier::Standard => 1.0,
            UrgencyTier::Express => 1.3,
            UrgencyTier::Urgent => 1.5,
        }
    }

    /// Parsea el valor crudo del campo `urgency`; `None` si no es un nivel
    /// conocido (el campo select ya debería haberlo impedido).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "standard" => Some(UrgencyTier::Standard),
            "express" => Some(UrgencyTier::Express),
            "urgent" => Some(UrgencyTier::Urgent),
            _ => None,
        }
    }
}

/// Cómo tarifica el servicio: fija, "desde" o sólo bajo presupuesto.
/// Los servicios `Quote` no muestran importe numérico, sólo el aviso de
/// precio personalizado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffType {
    Fixed,
    Starting,
    Quote,
}

/// Destino del envío físico de documentos (sólo flujo checkout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingLocation {
    WestBank,
    Jerusalem,
    Gaza,
    International,
}

impl ShippingLocation {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "west_bank" => Some(ShippingLocation::WestBank),
            "jerusalem" => Some(ShippingLocation::Jerusalem),
            "gaza" => Some(ShippingLocation::Gaza),
            "international" => Some(ShippingLocation::International),
            _ => None,
        }
    }
}

/// Modalidad de entrega.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// Recogida en oficina: sin coste de envío.
    Pickup,
    Single,
    /// Varias entregas: la tarifa se multiplica por el número de entregas.
    Multiple,
}

impl DeliveryType {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "pickup" => Some(DeliveryType::Pickup),
            "single" => Some(DeliveryType::Single),
            "multiple" => Some(DeliveryType::Multiple),
            _ => None,
        }
    }
}

/// Selección de envío completa tal y como sale del paso Review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingSelection {
    pub location: ShippingLocation,
    pub delivery: DeliveryType,
    /// Número de entregas; sólo se usa con `DeliveryType::Multiple`.
    pub count: u32,
}

/// Presupuesto desglosado. Derivado, nunca persistido.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub base: f64,
    pub urgency_fee: f64,
    pub shipping_fee: f64,
    pub total: f64,
}

impl PricingQuote {
    pub fn zero() -> Self {
        Self { base: 0.0, urgency_fee: 0.0, shipping_fee: 0.0, total: 0.0 }
    }
}

/// Tabla de tarifas de envío por destino. La modalidad `Pickup` es gratuita
/// con independencia del destino.
pub fn shipping_rate(location: ShippingLocation, delivery: DeliveryType) -> f64 {
    if delivery == DeliveryType::Pickup {
        return 0.0;
    }
    match location {
        ShippingLocation::WestBank => 20.0,
        ShippingLocation::Jerusalem => 30.0,
        ShippingLocation::Gaza => 25.0,
        ShippingLocation::International => 100.0,
    }
}

/// Calcula el presupuesto desglosado.
/// - `base_tariff = None` significa servicio de precio personalizado: todas
///   las partidas quedan a cero (la UI muestra el aviso, no un importe).
/// - `urgency_fee = base × (multiplicador − 1)`.
/// - `shipping_fee` sale de la tabla, multiplicada por `count` si la
///   modalidad es `Multiple`.
pub fn price(
    base_tariff: Option<f64>,
    urgency: UrgencyTier,
    shipping: Option<&ShippingSelection>,
) -> PricingQuote {
    let base = match base_tariff {
        Some(b) => b,
        None => return PricingQuote::zero(),
    };

    let urgency_fee = base * (urgency.multiplier() - 1.0);

    let shipping_fee = match shipping {
        Some(sel) => {
            let rate = shipping_rate(sel.location, sel.delivery);
            if sel.delivery == DeliveryType::Multiple {
                rate * f64::from(sel.count.max(1))
            } else {
                rate
            }
        }
        None => 0.0,
    };

    PricingQuote { base, urgency_fee, shipping_fee, total: base + urgency_fee + shipping_fee }
}
