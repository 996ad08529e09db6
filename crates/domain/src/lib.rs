mod cadence;
mod date;
mod marker;
mod recipient;
mod schedule;
mod settings;
mod statement;

pub use cadence::{Cadence, CadenceStatus};
pub use date::{days_in_month, is_leap_year};
pub use marker::{format_marker, is_due, parse_marker};
pub use recipient::Recipient;
pub use schedule::{
    monthly_period, most_recent_monthly_schedule, most_recent_weekly_schedule, weekly_period,
    ReportingPeriod,
};
pub use settings::ScheduleSettings;
pub use statement::{StatementDocument, StatementLine, StatementRequest};

pub use chrono::Weekday;
