use chrono::{DateTime, Utc};
use statement_mailer_domain::{format_marker, parse_marker, Cadence};
use statement_mailer_infra::StatementContext;
use tracing::warn;

/// Identity recorded on every marker write
pub const MARKER_MODIFIED_BY: &str = "statement-email-scheduler";

/// Reads the last schedule point serviced for `cadence`.
///
/// A missing or unparseable marker means the cadence was never sent. Errors
/// from the settings store are returned as is.
pub async fn read_last_sent(
    ctx: &StatementContext,
    cadence: Cadence,
) -> anyhow::Result<Option<DateTime<Utc>>> {
    let raw = ctx.repos.settings.get(cadence.marker_key()).await?;
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let last_sent = parse_marker(&raw);
    if last_sent.is_none() {
        warn!(
            "Ignoring unparseable {} marker value: {:?}",
            cadence.marker_key(),
            raw
        );
    }
    Ok(last_sent)
}

pub async fn write_last_sent(
    ctx: &StatementContext,
    cadence: Cadence,
    schedule_point: DateTime<Utc>,
) -> anyhow::Result<()> {
    ctx.repos
        .settings
        .set(
            cadence.marker_key(),
            &format_marker(schedule_point),
            MARKER_MODIFIED_BY,
        )
        .await
}
