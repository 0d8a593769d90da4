//! Orquestador principal del asistente.
//! Se encarga de:
//! - Mantener la sesión compartida y su máquina de estados (checking →
//!   unauthenticated | ready → submitting → payment → terminal).
//! - Despachar la validación por campo y por paso, y recalcular el precio
//!   cuando cambia un campo que lo afecta.
//! - Orquestar los colaboradores inyectados (catálogo, auth, borradores,
//!   adjuntos, envío, checkout, pago) sin exponer sus errores crudos.
//! - Emitir eventos a los observadores registrados en cada transición.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use servi_domain::field_schema::fields;
use servi_domain::{
    pricing, validation, DeliveryType, ShippingLocation, ShippingSelection,
    StepSchema, UrgencyTier,
};

use crate::attachments::AttachmentManager;
use crate::data::session::WizardSession;
use crate::data::types::{
    FlowMode, PaymentOutcome, PaymentSession, ServicePricingMeta, TerminalOutcome, UploadFile,
    WizardStatus, CURRENCY,
};
use crate::drafts::DraftManager;
use crate::errors::WizardError;
use crate::providers::auth::AuthProvider;
use crate::providers::catalog::CatalogProvider;
use crate::providers::drafts::DraftProvider;
use crate::providers::payment::PaymentFlowProvider;
use crate::providers::storage::{AttachmentRecordProvider, ObjectStorageProvider};
use crate::providers::submission::{CheckoutProvider, SubmissionProvider};
use crate::session::DraftCacheStore;
use crate::workflow::events::{WizardEvent, WizardObserver};
use crate::workflow::step;

/// Colaboradores externos del asistente, inyectados en la construcción.
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogProvider>,
    pub auth: Arc<dyn AuthProvider>,
    pub drafts: Arc<dyn DraftProvider>,
    pub storage: Arc<dyn ObjectStorageProvider>,
    pub records: Arc<dyn AttachmentRecordProvider>,
    pub submission: Arc<dyn SubmissionProvider>,
    pub checkout: Arc<dyn CheckoutProvider>,
    pub payment: Arc<dyn PaymentFlowProvider>,
}

pub struct WizardManager {
    session: Arc<RwLock<WizardSession>>,
    steps: RwLock<Vec<StepSchema>>,
    pricing_meta: RwLock<Option<ServicePricingMeta>>,
    catalog: Arc<dyn CatalogProvider>,
    auth: Arc<dyn AuthProvider>,
    submission: Arc<dyn SubmissionProvider>,
    checkout: Arc<dyn CheckoutProvider>,
    payment: Arc<dyn PaymentFlowProvider>,
    drafts: Arc<DraftManager>,
    attachments: AttachmentManager,
    cache: Arc<DraftCacheStore>,
    observers: std::sync::RwLock<Vec<Arc<dyn WizardObserver>>>,
    /// Guardia del punto de suspensión del envío final: un segundo clic
    /// mientras hay un envío en vuelo recibe `Busy`, nunca un doble envío.
    submitting: Arc<AtomicBool>,
    locale: String,
}

/// Libera la guardia de envío también en las salidas tempranas por error.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl WizardManager {
    pub fn new(
        service_slug: &str,
        flow_mode: FlowMode,
        locale: &str,
        collaborators: Collaborators,
        cache: Arc<DraftCacheStore>,
        max_file_bytes: u64,
    ) -> Self {
        let session = Arc::new(RwLock::new(WizardSession::new(service_slug, flow_mode)));
        let drafts =
            Arc::new(DraftManager::new(session.clone(), collaborators.drafts.clone(), locale));
        let attachments = AttachmentManager::new(
            session.clone(),
            drafts.clone(),
            collaborators.storage.clone(),
            collaborators.records.clone(),
            max_file_bytes,
        );
        Self {
            session,
            steps: RwLock::new(Vec::new()),
            pricing_meta: RwLock::new(None),
            catalog: collaborators.catalog,
            auth: collaborators.auth,
            submission: collaborators.submission,
            checkout: collaborators.checkout,
            payment: collaborators.payment,
            drafts,
            attachments,
            cache,
            observers: std::sync::RwLock::new(Vec::new()),
            submitting: Arc::new(AtomicBool::new(false)),
            locale: locale.to_string(),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn WizardObserver>) {
        self.observers.write().unwrap().push(observer);
    }

    fn emit(&self, event: WizardEvent) {
        for obs in self.observers.read().unwrap().iter() {
            obs.on_event(&event);
        }
    }

    /// Copia del estado observable de la sesión.
    pub async fn snapshot(&self) -> WizardSession {
        self.session.read().await.clone()
    }

    pub async fn current_step(&self) -> Option<StepSchema> {
        let index = self.session.read().await.current_step_index;
        self.steps.read().await.get(index).cloned()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Arranque del asistente: comprobación de auth, carga del esquema y de
    /// los metadatos de tarifa, y restauración de respuestas cacheadas. El
    /// borrador NO se crea aquí (creación perezosa).
    pub async fn initialize(&self) -> Result<(), WizardError> {
        let slug = {
            let mut session = self.session.write().await;
            session.status = WizardStatus::Checking;
            session.service_slug.clone()
        };
        self.emit(WizardEvent::StatusChanged { status: WizardStatus::Checking });

        if self.auth.current_user().await?.is_none() {
            self.session.write().await.status = WizardStatus::Unauthenticated;
            self.emit(WizardEvent::StatusChanged { status: WizardStatus::Unauthenticated });
            return Ok(());
        }

        let schemas = self.catalog.get_step_schemas(&slug).await?;
        let meta = self.catalog.get_pricing_meta(&slug).await?;
        if schemas.is_empty() {
            return Err(WizardError::Validation(format!("el servicio {slug} no tiene pasos")));
        }
        *self.steps.write().await = schemas;
        *self.pricing_meta.write().await = Some(meta);

        // Restaurar respuestas en curso de una visita anterior.
        if let Some(cached) = self.cache.load(&slug) {
            let mut session = self.session.write().await;
            if session.answers.is_empty() {
                session.answers = cached.answers;
            }
        }

        self.recompute_quote().await;

        {
            let mut session = self.session.write().await;
            session.status = WizardStatus::Ready;
            session.current_step_index = 0;
        }
        let first_step_id = self.steps.read().await[0].id.clone();
        self.emit(WizardEvent::StatusChanged { status: WizardStatus::Ready });
        self.emit(WizardEvent::StepChanged { step_index: 0, step_id: first_step_id });
        Ok(())
    }

    /// Escribe un campo: guarda la respuesta, revalida sólo ese campo,
    /// recalcula el precio si el campo lo afecta y persiste la caché local.
    pub async fn set_field(&self, field_name: &str, value: &str) -> Result<(), WizardError> {
        self.require_status(WizardStatus::Ready).await?;

        let schema = {
            let steps = self.steps.read().await;
            steps
                .iter()
                .find_map(|s| s.field(field_name).cloned())
                .ok_or_else(|| WizardError::Validation(format!("campo desconocido: {field_name}")))?
        };

        let (slug, answers, valid) = {
            let mut session = self.session.write().await;
            session.answers.insert(field_name.to_string(), value.to_string());
            let valid = match validation::validate_field(&schema, value) {
                Ok(()) => {
                    session.errors.shift_remove(field_name);
                    true
                }
                Err(msg) => {
                    session.errors.insert(field_name.to_string(), msg);
                    false
                }
            };
            (session.service_slug.clone(), session.answers.clone(), valid)
        };
        self.emit(WizardEvent::FieldUpdated { field: field_name.to_string(), valid });

        if fields::affects_price(field_name) {
            self.recompute_quote().await;
            let quote = self.session.read().await.quote;
            self.emit(WizardEvent::PricingUpdated { quote });
        }

        self.cache.persist(&slug, &answers)?;
        Ok(())
    }

    /// Adjunta un archivo a un campo file y emite el evento correspondiente.
    pub async fn attach_file(
        &self,
        field_name: &str,
        file: UploadFile,
    ) -> Result<(), WizardError> {
        self.require_status(WizardStatus::Ready).await?;
        let attachment = self.attachments.attach(field_name, file).await?;
        self.emit(WizardEvent::AttachmentStored {
            field: field_name.to_string(),
            file_name: attachment.file_name,
        });
        Ok(())
    }

    pub async fn detach_file(&self, field_name: &str) -> Result<(), WizardError> {
        self.require_status(WizardStatus::Ready).await?;
        self.attachments.detach(field_name).await?;
        self.emit(WizardEvent::AttachmentRemoved { field: field_name.to_string() });
        Ok(())
    }

    /// Avanza al siguiente paso si el actual pasa su gate. Devuelve `true`
    /// si hubo avance; con errores de validación devuelve `false` y los deja
    /// como datos en la sesión. Inerte durante el pago.
    pub async fn go_next(&self) -> Result<bool, WizardError> {
        {
            let session = self.session.read().await;
            if session.status == WizardStatus::Payment {
                return Ok(false);
            }
            if session.status == WizardStatus::Unauthenticated {
                return Err(WizardError::AuthRequired);
            }
            if session.status != WizardStatus::Ready {
                return Err(WizardError::InvalidTransition(format!(
                    "no se puede avanzar en estado {:?}",
                    session.status
                )));
            }
        }

        let steps = self.steps.read().await;
        let mut session = self.session.write().await;
        let index = session.current_step_index;
        let Some(current) = steps.get(index) else {
            return Err(WizardError::InvalidTransition("paso actual fuera de rango".into()));
        };

        let errors = step::gate_errors(current, &session);
        if !errors.is_empty() {
            for (field, msg) in errors {
                session.errors.insert(field, msg);
            }
            return Ok(false);
        }

        if index + 1 >= steps.len() {
            // Último paso: la salida es submit_final, no go_next.
            return Ok(false);
        }

        session.current_step_index = index + 1;
        let step_id = steps[index + 1].id.clone();
        drop(session);
        drop(steps);
        self.emit(WizardEvent::StepChanged { step_index: index + 1, step_id });
        Ok(true)
    }

    /// Retrocede un paso, limpiando sólo los errores del paso que se
    /// abandona. Inerte durante el pago y en el primer paso.
    pub async fn go_back(&self) -> Result<(), WizardError> {
        {
            let session = self.session.read().await;
            if session.status == WizardStatus::Payment {
                return Ok(());
            }
            if session.status == WizardStatus::Unauthenticated {
                return Err(WizardError::AuthRequired);
            }
            if session.status != WizardStatus::Ready {
                return Err(WizardError::InvalidTransition(format!(
                    "no se puede retroceder en estado {:?}",
                    session.status
                )));
            }
        }

        let steps = self.steps.read().await;
        let mut session = self.session.write().await;
        let index = session.current_step_index;
        if index == 0 {
            return Ok(());
        }

        if let Some(current) = steps.get(index) {
            for field in &current.fields {
                session.errors.shift_remove(&field.name);
            }
        }
        session.current_step_index = index - 1;
        let step_id = steps[index - 1].id.clone();
        drop(session);
        drop(steps);
        self.emit(WizardEvent::StepChanged { step_index: index - 1, step_id });
        Ok(())
    }

    /// Envío final. Revalida todos los pasos; si alguno falla, reposiciona
    /// al usuario en el primer paso inválido y devuelve `Validation`. En
    /// modo quote envía la solicitud; en modo checkout crea la factura y
    /// pasa a `Payment`.
    pub async fn submit_final(&self) -> Result<TerminalOutcome, WizardError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(WizardError::Busy("envío final".into()));
        }
        let _busy = BusyGuard(self.submitting.clone());

        self.require_status(WizardStatus::Ready).await?;

        // Revalidación completa antes de tocar ningún colaborador.
        {
            let steps = self.steps.read().await;
            let mut session = self.session.write().await;
            if let Some(invalid_index) = step::first_invalid_step(&steps, &session) {
                let errors = step::gate_errors(&steps[invalid_index], &session);
                for (field, msg) in errors {
                    session.errors.insert(field, msg);
                }
                session.current_step_index = invalid_index;
                let step_id = steps[invalid_index].id.clone();
                drop(session);
                drop(steps);
                self.emit(WizardEvent::StepChanged { step_index: invalid_index, step_id });
                return Err(WizardError::Validation(
                    "hay pasos con campos inválidos".into(),
                ));
            }
        }

        self.recompute_quote().await;
        let (slug, flow_mode, answers, total, epoch) = {
            let mut session = self.session.write().await;
            session.status = WizardStatus::Submitting;
            (
                session.service_slug.clone(),
                session.flow_mode,
                session.answers.clone(),
                session.quote.total,
                session.epoch,
            )
        };
        self.emit(WizardEvent::StatusChanged { status: WizardStatus::Submitting });

        let draft_id = match self.drafts.ensure_draft().await {
            Ok(id) => id,
            Err(err) => {
                self.restore_ready(epoch).await;
                return Err(err);
            }
        };

        match flow_mode {
            FlowMode::Quote => {
                let receipt = match self.submission.submit(draft_id, &answers).await {
                    Ok(r) => r,
                    Err(err) => {
                        self.restore_ready(epoch).await;
                        return Err(err.into());
                    }
                };
                {
                    let mut session = self.session.write().await;
                    if session.epoch != epoch {
                        return Err(WizardError::InvalidTransition(
                            "la sesión se reinició durante el envío".into(),
                        ));
                    }
                    // Envío terminal con éxito: la sesión se destruye y sólo
                    // queda el estado para mostrar la confirmación.
                    session.destroy(WizardStatus::Submitted);
                }
                self.cache.clear(&slug);
                self.emit(WizardEvent::StatusChanged { status: WizardStatus::Submitted });
                self.emit(WizardEvent::SubmissionCompleted {
                    order_number: receipt.order_number.clone(),
                });
                Ok(TerminalOutcome::Submitted { order_number: receipt.order_number })
            }
            FlowMode::Checkout => {
                let receipt = match self.checkout.submit_checkout(draft_id, &answers, total).await {
                    Ok(r) => r,
                    Err(err) => {
                        self.restore_ready(epoch).await;
                        return Err(err.into());
                    }
                };
                {
                    let mut session = self.session.write().await;
                    if session.epoch != epoch {
                        return Err(WizardError::InvalidTransition(
                            "la sesión se reinició durante el envío".into(),
                        ));
                    }
                    session.status = WizardStatus::Payment;
                    session.payment = Some(PaymentSession {
                        invoice_id: receipt.invoice_id.clone(),
                        order_number: receipt.order_number,
                        amount: total,
                        currency: CURRENCY.to_string(),
                    });
                }
                self.emit(WizardEvent::StatusChanged { status: WizardStatus::Payment });
                self.emit(WizardEvent::PaymentStarted { invoice_id: receipt.invoice_id.clone() });
                Ok(TerminalOutcome::PaymentPending { invoice_id: receipt.invoice_id })
            }
        }
    }

    /// Ejecuta el flujo de pago del colaborador y sale de `Payment` según su
    /// resultado: confirmado → `PaymentConfirmed`; cancelado → de vuelta a
    /// `Ready` sobre el paso de revisión, con la factura descartada.
    pub async fn complete_payment(&self) -> Result<PaymentOutcome, WizardError> {
        let (payment, epoch) = {
            let session = self.session.read().await;
            if session.status != WizardStatus::Payment {
                return Err(WizardError::InvalidTransition(format!(
                    "no hay pago en curso en estado {:?}",
                    session.status
                )));
            }
            let payment = session.payment.clone().ok_or_else(|| {
                WizardError::InvalidTransition("estado Payment sin sesión de pago".into())
            })?;
            (payment, session.epoch)
        };

        let outcome =
            self.payment.run(&payment.invoice_id, payment.amount, &payment.currency).await?;

        let slug = {
            let mut session = self.session.write().await;
            if session.epoch != epoch {
                return Err(WizardError::InvalidTransition(
                    "la sesión se reinició durante el pago".into(),
                ));
            }
            let slug = session.service_slug.clone();
            match outcome {
                PaymentOutcome::Confirmed => {
                    // Pago confirmado = envío terminal: la sesión se destruye.
                    session.destroy(WizardStatus::PaymentConfirmed);
                }
                PaymentOutcome::Cancelled => {
                    session.status = WizardStatus::Ready;
                    session.payment = None;
                }
            }
            slug
        };

        if outcome == PaymentOutcome::Confirmed {
            self.cache.clear(&slug);
        }
        self.emit(WizardEvent::payment_resolved(outcome));
        self.emit(WizardEvent::StatusChanged {
            status: self.session.read().await.status,
        });
        Ok(outcome)
    }

    /// Descarta todo: caché local, respuestas, borrador y adjuntos locales.
    /// Las resoluciones asíncronas en vuelo quedan invalidadas por el salto
    /// de época de la sesión.
    pub async fn reset(&self) -> Result<(), WizardError> {
        let slug = {
            let mut session = self.session.write().await;
            let slug = session.service_slug.clone();
            session.reset();
            slug
        };
        self.cache.clear(&slug);
        self.emit(WizardEvent::SessionReset);
        self.emit(WizardEvent::StatusChanged { status: WizardStatus::Checking });
        Ok(())
    }

    /// Aviso blando del paso Review: documentos requeridos que ningún
    /// archivo subido parece cubrir. Nunca bloquea el envío.
    pub async fn missing_documents(&self) -> Vec<String> {
        let meta = self.pricing_meta.read().await;
        let Some(meta) = meta.as_ref() else {
            return Vec::new();
        };
        let session = self.session.read().await;
        let uploaded: Vec<String> =
            session.attachments.values().map(|a| a.file_name.clone()).collect();
        match validation::validate_required_documents(&meta.required_documents, &uploaded) {
            Ok(()) => Vec::new(),
            Err(missing) => missing,
        }
    }

    async fn require_status(&self, expected: WizardStatus) -> Result<(), WizardError> {
        let session = self.session.read().await;
        if session.status == WizardStatus::Unauthenticated {
            return Err(WizardError::AuthRequired);
        }
        if session.status != expected {
            return Err(WizardError::InvalidTransition(format!(
                "se esperaba {:?}, estado actual {:?}",
                expected, session.status
            )));
        }
        Ok(())
    }

    async fn restore_ready(&self, epoch: u64) {
        let mut session = self.session.write().await;
        if session.epoch == epoch && session.status == WizardStatus::Submitting {
            session.status = WizardStatus::Ready;
            drop(session);
            self.emit(WizardEvent::StatusChanged { status: WizardStatus::Ready });
        }
    }

    /// Recalcula el presupuesto desde cero a partir de las respuestas
    /// vigentes; nunca acumula sobre el resultado anterior.
    async fn recompute_quote(&self) {
        let base = {
            let meta = self.pricing_meta.read().await;
            match meta.as_ref() {
                Some(m) => m.pricing_base(),
                None => None,
            }
        };

        let mut session = self.session.write().await;
        let urgency = session
            .answers
            .get(fields::URGENCY)
            .and_then(|v| UrgencyTier::from_key(v))
            .unwrap_or(UrgencyTier::Standard);
        // El recargo de envío sólo existe en el flujo checkout.
        let shipping = if session.flow_mode == FlowMode::Checkout {
            shipping_selection(&session)
        } else {
            None
        };
        session.quote = pricing::price(base, urgency, shipping.as_ref());
    }
}

/// Selección de envío derivada de las respuestas, si están completas.
fn shipping_selection(session: &WizardSession) -> Option<ShippingSelection> {
    let location = session
        .answers
        .get(fields::SHIPPING_LOCATION)
        .and_then(|v| ShippingLocation::from_key(v))?;
    let delivery = session
        .answers
        .get(fields::DELIVERY_TYPE)
        .and_then(|v| DeliveryType::from_key(v))?;
    let count = session
        .answers
        .get(fields::DELIVERY_COUNT)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1);
    Some(ShippingSelection { location, delivery, count })
}
