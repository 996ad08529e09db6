use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// When statement emails go out and what they contain.
///
/// Hours and day of month are kept as configured; the schedule functions
/// clamp them into range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    pub enabled: bool,
    pub weekly_day_of_week: Weekday,
    pub weekly_send_hour_utc: i32,
    pub monthly_day_of_month: i32,
    pub monthly_send_hour_utc: i32,
    pub include_closed_invoices: bool,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            weekly_day_of_week: Weekday::Mon,
            weekly_send_hour_utc: 6,
            monthly_day_of_month: 1,
            monthly_send_hour_utc: 6,
            include_closed_invoices: true,
        }
    }
}
