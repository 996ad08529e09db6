use crate::{APIResponse, BaseClient};
use reqwest::StatusCode;
use statement_mailer_api_structs::get_statement_schedule;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatementClient {
    base: Arc<BaseClient>,
}

impl StatementClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Where the weekly and monthly statement emails stand right now
    pub async fn get_schedule(&self) -> APIResponse<get_statement_schedule::APIResponse> {
        self.base
            .get("statement-emails/schedule", StatusCode::OK)
            .await
    }
}
