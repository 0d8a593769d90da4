//! Flujo quote de punta a punta con los colaboradores de referencia.
use std::sync::Arc;

use serviflow_rust::data::types::{FlowMode, TerminalOutcome, UploadFile, WizardStatus};
use serviflow_rust::errors::WizardError;
use serviflow_rust::providers::auth::implementations::TestAuthProvider;
use serviflow_rust::providers::catalog::implementations::TestCatalogProvider;
use serviflow_rust::providers::drafts::implementations::InMemoryDraftProvider;
use serviflow_rust::providers::payment::implementations::ScriptedPaymentProvider;
use serviflow_rust::providers::storage::implementations::{
    InMemoryRecordProvider, InMemoryStorageProvider,
};
use serviflow_rust::providers::submission::implementations::{
    RecordingCheckoutProvider, RecordingSubmissionProvider,
};
use serviflow_rust::session::DraftCacheStore;
use serviflow_rust::workflow::{Collaborators, RecordingObserver, WizardEvent, WizardManager};

struct Env {
    manager: Arc<WizardManager>,
    observer: Arc<RecordingObserver>,
    submission: Arc<RecordingSubmissionProvider>,
    drafts: Arc<InMemoryDraftProvider>,
    auth: Arc<TestAuthProvider>,
    cache: Arc<DraftCacheStore>,
}

fn quote_env(auth: TestAuthProvider) -> Env {
    let auth = Arc::new(auth);
    let submission = Arc::new(RecordingSubmissionProvider::new());
    let drafts = Arc::new(InMemoryDraftProvider::new());
    let cache = Arc::new(DraftCacheStore::new());
    let manager = Arc::new(WizardManager::new(
        "translation-certificate",
        FlowMode::Quote,
        "ar",
        Collaborators {
            catalog: Arc::new(TestCatalogProvider::new()),
            auth: auth.clone(),
            drafts: drafts.clone(),
            storage: Arc::new(InMemoryStorageProvider::new()),
            records: Arc::new(InMemoryRecordProvider::new()),
            submission: submission.clone(),
            checkout: Arc::new(RecordingCheckoutProvider::new()),
            payment: Arc::new(ScriptedPaymentProvider::always_confirming()),
        },
        cache.clone(),
        10 * 1024 * 1024,
    ));
    let observer = Arc::new(RecordingObserver::new());
    manager.subscribe(observer.clone());
    Env { manager, observer, submission, drafts, auth, cache }
}

async fn fill_valid_form(manager: &WizardManager) {
    manager.set_field("full_name", "Lina Odeh").await.unwrap();
    manager.set_field("email", "lina@example.com").await.unwrap();
    manager.set_field("phone", "0592123456").await.unwrap();
    assert!(manager.go_next().await.unwrap());

    manager.set_field("target_language", "en").await.unwrap();
    manager
        .attach_file("passport", UploadFile::new("passport-scan.pdf", vec![1u8; 512]))
        .await
        .unwrap();
    assert!(manager.go_next().await.unwrap());

    manager.set_field("urgency", "standard").await.unwrap();
}

#[tokio::test]
async fn test_quote_happy_path_submits_and_clears_cache() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();
    assert_eq!(env.manager.snapshot().await.status, WizardStatus::Ready);

    fill_valid_form(&env.manager).await;

    let outcome = env.manager.submit_final().await.unwrap();
    let TerminalOutcome::Submitted { order_number } = outcome else {
        panic!("se esperaba envío de solicitud");
    };
    assert_eq!(order_number, "ORD-0001");
    assert_eq!(env.submission.submission_count(), 1);
    assert_eq!(env.manager.snapshot().await.status, WizardStatus::Submitted);

    // La caché local se descarta tras el envío terminal.
    assert!(env.cache.load("translation-certificate").is_none());

    // El borrador se creó perezosamente, una sola vez (al adjuntar).
    assert_eq!(env.drafts.created_count(), 1);

    let events = env.observer.events();
    assert!(events.contains(&WizardEvent::SubmissionCompleted { order_number: "ORD-0001".into() }));
    assert!(events.contains(&WizardEvent::StatusChanged { status: WizardStatus::Submitted }));
}

#[tokio::test]
async fn test_terminal_submission_destroys_session() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();
    fill_valid_form(&env.manager).await;
    env.manager.submit_final().await.unwrap();

    // Sólo sobrevive el estado terminal; el resto de la sesión se destruye.
    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.status, WizardStatus::Submitted);
    assert!(snapshot.answers.is_empty());
    assert!(snapshot.attachments.is_empty());
    assert!(snapshot.draft_id.is_none());
    assert_eq!(snapshot.current_step_index, 0);
    assert_eq!(snapshot.epoch, 1);

    // Una ejecución posterior parte de cero y crea un borrador nuevo, nunca
    // reutiliza el ya enviado.
    env.manager.initialize().await.unwrap();
    assert!(env.manager.snapshot().await.answers.is_empty());
    env.manager
        .attach_file("passport", UploadFile::new("passport-scan.pdf", vec![1u8; 64]))
        .await
        .unwrap();
    assert_eq!(env.drafts.created_count(), 2);
}

#[tokio::test]
async fn test_unauthenticated_user_is_blocked() {
    let env = quote_env(TestAuthProvider::signed_out());
    env.manager.initialize().await.unwrap();
    assert_eq!(env.manager.snapshot().await.status, WizardStatus::Unauthenticated);

    let err = env.manager.set_field("full_name", "Lina").await.unwrap_err();
    assert!(matches!(err, WizardError::AuthRequired));

    // La navegación también se mapea a AuthRequired, no a una transición
    // inválida genérica: el cliente siempre puede ofrecer iniciar sesión.
    let err = env.manager.go_next().await.unwrap_err();
    assert!(matches!(err, WizardError::AuthRequired));
    let err = env.manager.go_back().await.unwrap_err();
    assert!(matches!(err, WizardError::AuthRequired));

    // Tras iniciar sesión, initialize vuelve a dejar el asistente listo.
    env.auth.sign_in("lina@example.com");
    env.manager.initialize().await.unwrap();
    assert_eq!(env.manager.snapshot().await.status, WizardStatus::Ready);
}

#[tokio::test]
async fn test_invalid_step_blocks_advance_with_errors_as_data() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();

    env.manager.set_field("full_name", "Lina").await.unwrap();
    env.manager.set_field("email", "sin-arroba").await.unwrap();

    let advanced = env.manager.go_next().await.unwrap();
    assert!(!advanced);

    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.current_step_index, 0);
    assert!(snapshot.errors.contains_key("email"));
    assert!(snapshot.errors.contains_key("phone"));
}

#[tokio::test]
async fn test_go_back_clears_only_current_step_errors() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();

    env.manager.set_field("full_name", "Lina").await.unwrap();
    env.manager.set_field("email", "lina@example.com").await.unwrap();
    env.manager.set_field("phone", "0592123456").await.unwrap();
    assert!(env.manager.go_next().await.unwrap());

    // Provocar errores en el paso de requisitos y retroceder.
    assert!(!env.manager.go_next().await.unwrap());
    let snapshot = env.manager.snapshot().await;
    assert!(snapshot.errors.contains_key("passport"));
    assert!(snapshot.errors.contains_key("target_language"));

    env.manager.go_back().await.unwrap();
    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.current_step_index, 0);
    assert!(!snapshot.errors.contains_key("passport"));
    assert!(!snapshot.errors.contains_key("target_language"));
}

#[tokio::test]
async fn test_submit_revalidates_and_repositions_on_first_invalid_step() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();
    fill_valid_form(&env.manager).await;

    // Invalidar un campo del primer paso ya superado.
    env.manager.set_field("email", "roto").await.unwrap();

    let err = env.manager.submit_final().await.unwrap_err();
    assert!(matches!(err, WizardError::Validation(_)));
    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.current_step_index, 0);
    assert_eq!(snapshot.status, WizardStatus::Ready);
    assert_eq!(env.submission.submission_count(), 0);
}

#[tokio::test]
async fn test_submission_failure_restores_ready_and_keeps_answers() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();
    fill_valid_form(&env.manager).await;

    env.submission.set_fail_submit(true);
    let err = env.manager.submit_final().await.unwrap_err();
    assert!(matches!(err, WizardError::Transient(_)));

    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.status, WizardStatus::Ready);
    assert_eq!(snapshot.answers.get("full_name").unwrap(), "Lina Odeh");

    // Reintento tras recuperarse el colaborador.
    env.submission.set_fail_submit(false);
    let outcome = env.manager.submit_final().await.unwrap();
    assert!(matches!(outcome, TerminalOutcome::Submitted { .. }));
}

#[tokio::test]
async fn test_pricing_recomputes_on_price_relevant_fields() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();

    env.manager.set_field("urgency", "urgent").await.unwrap();
    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.quote.base, 100.0);
    assert_eq!(snapshot.quote.urgency_fee, 50.0);
    assert_eq!(snapshot.quote.total, 150.0);

    // En modo quote el envío no aplica: los campos de envío no añaden coste.
    env.manager.set_field("shipping_location", "gaza").await.unwrap();
    env.manager.set_field("delivery_type", "multiple").await.unwrap();
    env.manager.set_field("delivery_count", "3").await.unwrap();
    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.quote.shipping_fee, 0.0);
    assert_eq!(snapshot.quote.total, 150.0);

    // Un campo sin efecto en el precio no dispara recálculo.
    env.manager.set_field("full_name", "Lina").await.unwrap();
    assert_eq!(env.manager.snapshot().await.quote.total, 150.0);

    let pricing_events = env
        .observer
        .events()
        .into_iter()
        .filter(|e| matches!(e, WizardEvent::PricingUpdated { .. }))
        .count();
    assert_eq!(pricing_events, 4);
}

#[tokio::test]
async fn test_reset_discards_session_and_cache() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();
    env.manager.set_field("full_name", "Lina").await.unwrap();
    assert!(env.cache.load("translation-certificate").is_some());

    env.manager.reset().await.unwrap();

    let snapshot = env.manager.snapshot().await;
    assert_eq!(snapshot.status, WizardStatus::Checking);
    assert!(snapshot.answers.is_empty());
    assert!(snapshot.draft_id.is_none());
    assert_eq!(snapshot.epoch, 1);
    assert!(env.cache.load("translation-certificate").is_none());
    assert!(env.observer.events().contains(&WizardEvent::SessionReset));
}

#[tokio::test]
async fn test_missing_documents_is_a_soft_warning() {
    let env = quote_env(TestAuthProvider::signed_in());
    env.manager.initialize().await.unwrap();

    // Sin adjuntos: el documento requerido figura como no cubierto.
    let missing = env.manager.missing_documents().await;
    assert_eq!(missing, vec!["Copia del passport vigente".to_string()]);

    env.manager.set_field("full_name", "Lina").await.unwrap();
    env.manager.set_field("email", "l@e.com").await.unwrap();
    env.manager.set_field("phone", "0592123456").await.unwrap();
    env.manager.go_next().await.unwrap();
    env.manager
        .attach_file("passport", UploadFile::new("passport-scan.pdf", vec![1u8; 64]))
        .await
        .unwrap();

    assert!(env.manager.missing_documents().await.is_empty());
}
