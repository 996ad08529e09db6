mod backend_api;

use super::{IEmailSender, IRecipientSource, IStatementGenerator, StatementEmail};
pub use backend_api::BackendApiError;
use backend_api::BackendRestApi;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statement_mailer_domain::{Recipient, StatementDocument, StatementRequest};
use tracing::{debug, warn};
use url::Url;

const CUSTOMER_PORTAL_USERS_PATH: &str = "customer-portal/users";
const GENERATE_STATEMENT_PATH: &str = "statements/generate";
const SEND_STATEMENT_EMAIL_PATH: &str = "emails/statements";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPortalUserResponse {
    pub card_code: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub receive_statement_emails: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendStatementEmailRequest<'a> {
    to: &'a str,
    name: &'a str,
    cadence: &'a str,
    from_date: NaiveDate,
    to_date: NaiveDate,
    statement: &'a StatementDocument,
}

impl<'a> From<&'a StatementEmail<'a>> for SendStatementEmailRequest<'a> {
    fn from(e: &'a StatementEmail<'a>) -> Self {
        Self {
            to: e.to,
            name: e.display_name,
            cadence: e.cadence.label(),
            from_date: e.period.from_date,
            to_date: e.period.to_date,
            statement: e.statement,
        }
    }
}

fn eligible_recipients(users: Vec<CustomerPortalUserResponse>) -> Vec<Recipient> {
    users
        .into_iter()
        .filter(|u| u.is_active && u.receive_statement_emails)
        .filter_map(|u| {
            let email = u.email.as_deref().map(str::trim).unwrap_or_default();
            if email.is_empty() {
                return None;
            }
            Some(Recipient {
                email: email.to_string(),
                card_code: u.card_code,
                card_name: u.card_name,
            })
        })
        .collect()
}

/// Shop inventory backend acting as recipient source, statement generator
/// and email relay
pub struct BackendProvider {
    api: BackendRestApi,
}

impl BackendProvider {
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            api: BackendRestApi::new(base_url, api_key),
        }
    }
}

#[async_trait::async_trait]
impl IRecipientSource for BackendProvider {
    async fn eligible_recipients(&self) -> anyhow::Result<Vec<Recipient>> {
        let users: Vec<CustomerPortalUserResponse> =
            self.api.get(CUSTOMER_PORTAL_USERS_PATH).await?;
        let total = users.len();
        let recipients = eligible_recipients(users);
        debug!(
            "{} of {} customer portal users are eligible for statement emails",
            recipients.len(),
            total
        );
        Ok(recipients)
    }
}

#[async_trait::async_trait]
impl IStatementGenerator for BackendProvider {
    async fn generate(&self, request: &StatementRequest) -> anyhow::Result<StatementDocument> {
        let statement = self.api.post(request, GENERATE_STATEMENT_PATH).await?;
        Ok(statement)
    }
}

#[async_trait::async_trait]
impl IEmailSender for BackendProvider {
    async fn send_statement(&self, email: &StatementEmail<'_>) -> bool {
        let body = SendStatementEmailRequest::from(email);
        match self.api.post_accepted(&body, SEND_STATEMENT_EMAIL_PATH).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Statement email to {} for card code {} was not accepted. Error: {}",
                    email.to, email.statement.card_code, e
                );
                false
            }
        }
    }
}
