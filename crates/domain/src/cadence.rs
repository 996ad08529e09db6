use crate::marker::is_due;
use crate::schedule::{
    monthly_period, most_recent_monthly_schedule, most_recent_weekly_schedule, weekly_period,
    ReportingPeriod,
};
use crate::settings::ScheduleSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the two independent recurring statement schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    Weekly,
    Monthly,
}

impl Cadence {
    pub const ALL: [Cadence; 2] = [Cadence::Weekly, Cadence::Monthly];

    /// Settings store key holding the last schedule point serviced for this cadence
    pub fn marker_key(&self) -> &'static str {
        match self {
            Self::Weekly => "StatementEmailsLastWeeklySentUtc",
            Self::Monthly => "StatementEmailsLastMonthlySentUtc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    pub fn most_recent_schedule(
        &self,
        now: DateTime<Utc>,
        settings: &ScheduleSettings,
    ) -> DateTime<Utc> {
        match self {
            Self::Weekly => most_recent_weekly_schedule(
                now,
                settings.weekly_day_of_week,
                settings.weekly_send_hour_utc,
            ),
            Self::Monthly => most_recent_monthly_schedule(
                now,
                settings.monthly_day_of_month,
                settings.monthly_send_hour_utc,
            ),
        }
    }

    pub fn reporting_period(&self, schedule_point: DateTime<Utc>) -> ReportingPeriod {
        match self {
            Self::Weekly => weekly_period(schedule_point),
            Self::Monthly => monthly_period(schedule_point),
        }
    }
}

/// Where a cadence stands at a given instant
#[derive(Debug, Clone, PartialEq)]
pub struct CadenceStatus {
    pub cadence: Cadence,
    pub schedule_point: DateTime<Utc>,
    pub reporting_period: ReportingPeriod,
    pub last_sent: Option<DateTime<Utc>>,
    pub due: bool,
}

impl CadenceStatus {
    pub fn evaluate(
        cadence: Cadence,
        now: DateTime<Utc>,
        settings: &ScheduleSettings,
        last_sent: Option<DateTime<Utc>>,
    ) -> Self {
        let schedule_point = cadence.most_recent_schedule(now, settings);
        Self {
            cadence,
            schedule_point,
            reporting_period: cadence.reporting_period(schedule_point),
            last_sent,
            due: is_due(last_sent, schedule_point),
        }
    }
}

impl Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
