use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use statement_mailer_domain::{Cadence, CadenceStatus};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CadenceScheduleDTO {
    pub cadence: Cadence,
    pub schedule_point: DateTime<Utc>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_sent: Option<DateTime<Utc>>,
    pub due: bool,
}

impl CadenceScheduleDTO {
    pub fn new(status: CadenceStatus) -> Self {
        Self {
            cadence: status.cadence,
            schedule_point: status.schedule_point,
            from_date: status.reporting_period.from_date,
            to_date: status.reporting_period.to_date,
            last_sent: status.last_sent,
            due: status.due,
        }
    }
}
