mod backend;
mod inmemory;

pub use backend::{BackendApiError, BackendProvider};
pub use inmemory::{
    InMemoryEmailSender, InMemoryRecipientSource, InMemoryStatementGenerator, SentStatementEmail,
};

use statement_mailer_domain::{
    Cadence, Recipient, ReportingPeriod, StatementDocument, StatementRequest,
};
use std::sync::Arc;

/// Lists the customers that should receive statement emails
#[async_trait::async_trait]
pub trait IRecipientSource: Send + Sync {
    /// Only active, opted in recipients with a non empty email are returned
    async fn eligible_recipients(&self) -> anyhow::Result<Vec<Recipient>>;
}

#[async_trait::async_trait]
pub trait IStatementGenerator: Send + Sync {
    async fn generate(&self, request: &StatementRequest) -> anyhow::Result<StatementDocument>;
}

#[derive(Debug)]
pub struct StatementEmail<'a> {
    pub to: &'a str,
    pub display_name: &'a str,
    pub statement: &'a StatementDocument,
    pub period: ReportingPeriod,
    pub cadence: Cadence,
}

#[async_trait::async_trait]
pub trait IEmailSender: Send + Sync {
    /// Returns whether the email was accepted. Failures are reported by the
    /// sender itself and never returned as errors.
    async fn send_statement(&self, email: &StatementEmail<'_>) -> bool;
}

#[derive(Clone)]
pub struct Services {
    pub recipients: Arc<dyn IRecipientSource>,
    pub statements: Arc<dyn IStatementGenerator>,
    pub email: Arc<dyn IEmailSender>,
}

impl Services {
    pub fn create_backend(provider: BackendProvider) -> Self {
        let provider = Arc::new(provider);
        Self {
            recipients: provider.clone(),
            statements: provider.clone(),
            email: provider,
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            recipients: Arc::new(InMemoryRecipientSource::new(Vec::new())),
            statements: Arc::new(InMemoryStatementGenerator::new()),
            email: Arc::new(InMemoryEmailSender::new()),
        }
    }
}
