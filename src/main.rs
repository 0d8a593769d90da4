//! Demostración guionizada del asistente: recorre un flujo quote y un flujo
//! checkout de punta a punta con los colaboradores de referencia en memoria
//! e imprime los eventos emitidos.
use std::sync::Arc;

use serviflow_rust::config::CONFIG;
use serviflow_rust::data::types::{FlowMode, PaymentOutcome, TerminalOutcome, UploadFile};
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
use serviflow_rust::workflow::{Collaborators, RecordingObserver, WizardManager};

fn collaborators() -> Collaborators {
    Collaborators {
        catalog: Arc::new(TestCatalogProvider::new()),
        auth: Arc::new(TestAuthProvider::signed_in()),
        drafts: Arc::new(InMemoryDraftProvider::new()),
        storage: Arc::new(InMemoryStorageProvider::new()),
        records: Arc::new(InMemoryRecordProvider::new()),
        submission: Arc::new(RecordingSubmissionProvider::new()),
        checkout: Arc::new(RecordingCheckoutProvider::new()),
        payment: Arc::new(ScriptedPaymentProvider::always_confirming()),
    }
}

fn manager(service_slug: &str, mode: FlowMode) -> (Arc<WizardManager>, Arc<RecordingObserver>) {
    let cache = Arc::new(DraftCacheStore::new());
    let manager = Arc::new(WizardManager::new(
        service_slug,
        mode,
        &CONFIG.default_locale,
        collaborators(),
        cache,
        CONFIG.upload.max_file_bytes,
    ));
    let observer = Arc::new(RecordingObserver::new());
    manager.subscribe(observer.clone());
    (manager, observer)
}

async fn fill_form(manager: &WizardManager) -> Result<(), Box<dyn std::error::Error>> {
    // Paso 1: contacto
    manager.set_field("full_name", "Lina Odeh").await?;
    manager.set_field("email", "lina@example.com").await?;
    manager.set_field("phone", "0592123456").await?;
    assert!(manager.go_next().await?);

    // Paso 2: requisitos (incluye el documento obligatorio)
    manager.set_field("target_language", "en").await?;
    manager
        .attach_file("passport", UploadFile::new("passport-scan.pdf", vec![0u8; 2048]))
        .await?;
    assert!(manager.go_next().await?);

    // Paso 3: revisión y entrega
    manager.set_field("urgency", "urgent").await?;
    manager.set_field("shipping_location", "jerusalem").await?;
    manager.set_field("delivery_type", "single").await?;
    Ok(())
}

async fn run_quote_flow() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Flujo quote: translation-certificate ===");
    let (manager, observer) = manager("translation-certificate", FlowMode::Quote);
    manager.initialize().await?;
    fill_form(&manager).await?;

    let snapshot = manager.snapshot().await;
    println!(
        "Presupuesto: base {} + urgencia {} + envío {} = {}",
        snapshot.quote.base, snapshot.quote.urgency_fee, snapshot.quote.shipping_fee,
        snapshot.quote.total
    );

    match manager.submit_final().await? {
        TerminalOutcome::Submitted { order_number } => {
            println!("Solicitud enviada: {order_number}");
        }
        TerminalOutcome::PaymentPending { .. } => unreachable!("modo quote"),
    }

    println!("Eventos emitidos ({}):", observer.count());
    for event in observer.events() {
        println!("  {event:?}");
    }
    Ok(())
}

async fn run_checkout_flow() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Flujo checkout: translation-certificate ===");
    let (manager, observer) = manager("translation-certificate", FlowMode::Checkout);
    manager.initialize().await?;
    fill_form(&manager).await?;

    match manager.submit_final().await? {
        TerminalOutcome::PaymentPending { invoice_id } => {
            println!("Factura creada: {invoice_id}");
        }
        TerminalOutcome::Submitted { .. } => unreachable!("modo checkout"),
    }

    match manager.complete_payment().await? {
        PaymentOutcome::Confirmed => println!("Pago confirmado"),
        PaymentOutcome::Cancelled => println!("Pago cancelado"),
    }

    println!("Eventos emitidos ({}):", observer.count());
    for event in observer.events() {
        println!("  {event:?}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_quote_flow().await?;
    run_checkout_flow().await?;
    Ok(())
}
