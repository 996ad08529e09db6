mod base;
mod statement;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use statement_mailer_api_structs::dtos::CadenceScheduleDTO as CadenceSchedule;
pub use statement_mailer_api_structs::get_statement_schedule::APIResponse as StatementSchedule;
pub use statement_mailer_domain::Cadence;
use statement::StatementClient;
use status::StatusClient;
use std::sync::Arc;

/// Statement Mailer SDK
///
/// The SDK contains methods for interacting with the statement mailer
/// server API.
#[derive(Clone)]
pub struct StatementMailerSDK {
    pub statement: StatementClient,
    pub status: StatusClient,
}

impl StatementMailerSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let statement = StatementClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { statement, status }
    }
}
