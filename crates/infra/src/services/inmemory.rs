use super::{IEmailSender, IRecipientSource, IStatementGenerator, StatementEmail};
use statement_mailer_domain::{
    Cadence, Recipient, ReportingPeriod, StatementDocument, StatementRequest,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct InMemoryRecipientSource {
    recipients: Mutex<Vec<Recipient>>,
    unavailable: AtomicBool,
}

impl InMemoryRecipientSource {
    pub fn new(recipients: Vec<Recipient>) -> Self {
        Self {
            recipients: Mutex::new(recipients),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_recipients(&self, recipients: Vec<Recipient>) {
        *lock(&self.recipients) = recipients;
    }

    /// Makes every listing fail until set back to `false`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IRecipientSource for InMemoryRecipientSource {
    async fn eligible_recipients(&self) -> anyhow::Result<Vec<Recipient>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Recipient source is unavailable"));
        }
        Ok(lock(&self.recipients).clone())
    }
}

/// Generates empty statements, except for card codes marked as failing
pub struct InMemoryStatementGenerator {
    failing_card_codes: Mutex<HashSet<String>>,
    requests: Mutex<Vec<StatementRequest>>,
}

impl InMemoryStatementGenerator {
    pub fn new() -> Self {
        Self {
            failing_card_codes: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, card_code: &str) {
        lock(&self.failing_card_codes).insert(card_code.to_string());
    }

    pub fn requests(&self) -> Vec<StatementRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for InMemoryStatementGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IStatementGenerator for InMemoryStatementGenerator {
    async fn generate(&self, request: &StatementRequest) -> anyhow::Result<StatementDocument> {
        lock(&self.requests).push(request.clone());
        if lock(&self.failing_card_codes).contains(&request.card_code) {
            return Err(anyhow::Error::msg(format!(
                "Unable to generate statement for card code: {}",
                request.card_code
            )));
        }
        Ok(StatementDocument {
            card_code: request.card_code.clone(),
            card_name: String::new(),
            from_date: request.from_date,
            to_date: request.to_date,
            opening_balance: 0.0,
            closing_balance: 0.0,
            lines: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentStatementEmail {
    pub to: String,
    pub display_name: String,
    pub card_code: String,
    pub period: ReportingPeriod,
    pub cadence: Cadence,
    pub accepted: bool,
}

/// Records every attempted email. Addresses marked as rejecting are not accepted.
pub struct InMemoryEmailSender {
    rejecting: Mutex<HashSet<String>>,
    attempts: Mutex<Vec<SentStatementEmail>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self {
            rejecting: Mutex::new(HashSet::new()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn reject(&self, email: &str) {
        lock(&self.rejecting).insert(email.to_string());
    }

    pub fn attempts(&self) -> Vec<SentStatementEmail> {
        lock(&self.attempts).clone()
    }
}

impl Default for InMemoryEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailSender for InMemoryEmailSender {
    async fn send_statement(&self, email: &StatementEmail<'_>) -> bool {
        let accepted = !lock(&self.rejecting).contains(email.to);
        lock(&self.attempts).push(SentStatementEmail {
            to: email.to.to_string(),
            display_name: email.display_name.to_string(),
            card_code: email.statement.card_code.clone(),
            period: email.period,
            cadence: email.cadence,
            accepted,
        });
        accepted
    }
}
