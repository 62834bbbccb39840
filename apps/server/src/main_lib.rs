use std::sync::Arc;

use crate::{config::Config, domain_events::WebDomainEventSink};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uangkita_core::{
    events::DomainEventSink,
    loans::{CachedLoanRepository, LoanService, LoanServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    utils::ttl_cache::SystemClock,
};
use uangkita_storage_sqlite::{
    db::{self, spawn_writer},
    loans::LoanRepository,
    transactions::TransactionRepository,
};

pub struct AppState {
    /// Sink shared by every service.
    pub domain_event_sink: Arc<dyn DomainEventSink>,
    pub loan_service: Arc<dyn LoanServiceTrait>,
    /// Concrete handle on the loan read cache for forced refreshes.
    pub loan_cache: Arc<CachedLoanRepository>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("UK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let domain_event_sink: Arc<dyn DomainEventSink> = Arc::new(WebDomainEventSink::start());

    let loan_repository = Arc::new(LoanRepository::new(pool.clone(), writer.clone()));
    let loan_cache = Arc::new(CachedLoanRepository::new(
        loan_repository,
        config.loan_cache_ttl,
        Arc::new(SystemClock),
    ));
    let loan_service = Arc::new(
        LoanService::load(loan_cache.clone(), domain_event_sink.clone()).await?,
    );

    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone(), writer));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository,
        domain_event_sink.clone(),
    ));

    Ok(Arc::new(AppState {
        domain_event_sink,
        loan_service,
        loan_cache,
        transaction_service,
        db_path,
    }))
}
