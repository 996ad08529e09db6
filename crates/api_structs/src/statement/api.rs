use serde::{Deserialize, Serialize};

pub mod get_statement_schedule {
    use super::*;
    use crate::dtos::CadenceScheduleDTO;
    use statement_mailer_domain::{CadenceStatus, ScheduleSettings};

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub enabled: bool,
        pub include_closed_invoices: bool,
        pub cadences: Vec<CadenceScheduleDTO>,
    }

    impl APIResponse {
        pub fn new(settings: &ScheduleSettings, cadences: Vec<CadenceStatus>) -> Self {
            Self {
                enabled: settings.enabled,
                include_closed_invoices: settings.include_closed_invoices,
                cadences: cadences.into_iter().map(CadenceScheduleDTO::new).collect(),
            }
        }
    }

}
