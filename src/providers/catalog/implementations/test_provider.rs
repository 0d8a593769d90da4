//! Catálogo determinista de referencia con dos servicios:
//! - `translation-certificate`: tarifa fija (100), con documento requerido.
//! - `legal-consult`: precio personalizado (sin importe numérico).
//! Sirve para el binario de demostración y para los tests de integración.
use async_trait::async_trait;

use servi_domain::field_schema::fields;
use servi_domain::{FieldKind, FieldSchema, LocalizedText, SelectOption, StepSchema, TariffType};

use crate::data::types::ServicePricingMeta;
use crate::errors::ProviderError;
use crate::providers::catalog::trait_catalog::CatalogProvider;

pub struct TestCatalogProvider;

impl TestCatalogProvider {
    pub fn new() -> Self {
        Self
    }

    fn contact_step() -> StepSchema {
        StepSchema::new(
            "contact",
            LocalizedText::new("بيانات التواصل", "Contact details"),
            vec![
                FieldSchema::new(
                    "full_name",
                    FieldKind::Text,
                    true,
                    LocalizedText::new("الاسم الكامل", "Full name"),
                ),
                FieldSchema::new(
                    "email",
                    FieldKind::Email,
                    true,
                    LocalizedText::new("البريد الإلكتروني", "Email"),
                ),
                FieldSchema::new(
                    "phone",
                    FieldKind::Tel,
                    true,
                    LocalizedText::new("رقم الهاتف", "Phone number"),
                )
                .with_placeholder(LocalizedText::new("059XXXXXXX", "059XXXXXXX")),
            ],
        )
    }

    fn requirements_step() -> StepSchema {
        StepSchema::new(
            "requirements",
            LocalizedText::new("متطلبات الخدمة", "Service requirements"),
            vec![
                FieldSchema::new(
                    "passport",
                    FieldKind::File,
                    true,
                    LocalizedText::new("صورة الجواز", "Passport copy"),
                )
                .with_help(LocalizedText::new("PDF أو صورة، حتى 10MB", "PDF or image, up to 10MB")),
                FieldSchema::new(
                    "target_language",
                    FieldKind::Select,
                    true,
                    LocalizedText::new("اللغة المطلوبة", "Target language"),
                )
                .with_options(vec![
                    SelectOption { value: "ar".into(), label: LocalizedText::new("العربية", "Arabic") },
                    SelectOption { value: "en".into(), label: LocalizedText::new("الإنجليزية", "English") },
                    SelectOption { value: "fr".into(), label: LocalizedText::new("الفرنسية", "French") },
                ]),
                FieldSchema::new(
                    "notes",
                    FieldKind::Textarea,
                    false,
                    LocalizedText::new("ملاحظات", "Notes"),
                ),
            ],
        )
    }

    fn review_step() -> StepSchema {
        StepSchema::new(
            "review",
            LocalizedText::new("المراجعة والتسليم", "Review & delivery"),
            vec![
                FieldSchema::new(
                    fields::URGENCY,
                    FieldKind::Select,
                    true,
                    LocalizedText::new("مستوى الاستعجال", "Urgency"),
                )
                .with_options(vec![
                    SelectOption { value: "standard".into(), label: LocalizedText::new("عادي", "Standard") },
                    SelectOption { value: "express".into(), label: LocalizedText::new("سريع", "Express") },
                    SelectOption { value: "urgent".into(), label: LocalizedText::new("مستعجل", "Urgent") },
                ]),
                FieldSchema::new(
                    fields::SHIPPING_LOCATION,
                    FieldKind::Select,
                    false,
                    LocalizedText::new("منطقة التوصيل", "Shipping location"),
                )
                .with_options(vec![
                    SelectOption { value: "west_bank".into(), label: LocalizedText::new("الضفة الغربية", "West Bank") },
                    SelectOption { value: "jerusalem".into(), label: LocalizedText::new("القدس", "Jerusalem") },
                    SelectOption { value: "gaza".into(), label: LocalizedText::new("غزة", "Gaza") },
                    SelectOption { value: "international".into(), label: LocalizedText::new("دولي", "International") },
                ]),
                FieldSchema::new(
                    fields::DELIVERY_TYPE,
                    FieldKind::Select,
                    false,
                    LocalizedText::new("طريقة التسليم", "Delivery type"),
                )
                .with_options(vec![
                    SelectOption { value: "pickup".into(), label: LocalizedText::new("استلام من المكتب", "Office pickup") },
                    SelectOption { value: "single".into(), label: LocalizedText::new("توصيل واحد", "Single delivery") },
                    SelectOption { value: "multiple".into(), label: LocalizedText::new("عدة توصيلات", "Multiple deliveries") },
                ]),
                FieldSchema::new(
                    fields::DELIVERY_COUNT,
                    FieldKind::Text,
                    false,
                    LocalizedText::new("عدد التوصيلات", "Number of deliveries"),
                ),
            ],
        )
    }
}

impl Default for TestCatalogProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogProvider for TestCatalogProvider {
    fn get_name(&self) -> &str {
        "test_catalog"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Catálogo estático de referencia para demo y tests"
    }

    async fn get_step_schemas(&self, service_slug: &str) -> Result<Vec<StepSchema>, ProviderError> {
        match service_slug {
            "translation-certificate" | "legal-consult" => Ok(vec![
                Self::contact_step(),
                Self::requirements_step(),
                Self::review_step(),
            ]),
            other => Err(ProviderError::Invalid(format!("servicio desconocido: {other}"))),
        }
    }

    async fn get_pricing_meta(&self, service_slug: &str) -> Result<ServicePricingMeta, ProviderError> {
        match service_slug {
            "translation-certificate" => Ok(ServicePricingMeta {
                tariff_type: TariffType::Fixed,
                base_amount: Some(100.0),
                required_documents: vec!["Copia del passport vigente".to_string()],
            }),
            "legal-consult" => Ok(ServicePricingMeta {
                tariff_type: TariffType::Quote,
                base_amount: None,
                required_documents: vec![],
            }),
            other => Err(ProviderError::Invalid(format!("servicio desconocido: {other}"))),
        }
    }
}
