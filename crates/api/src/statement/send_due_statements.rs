use super::last_sent::{read_last_sent, write_last_sent};
use crate::shared::usecase::UseCase;
use chrono::{DateTime, Utc};
use statement_mailer_domain::{
    Cadence, CadenceStatus, Recipient, ReportingPeriod, ScheduleSettings, StatementRequest,
};
use statement_mailer_infra::{StatementContext, StatementEmail};
use tracing::{error, info, warn};

/// One scheduler tick: sends the statements of every cadence whose most
/// recent schedule point has not been serviced yet.
#[derive(Debug, Default)]
pub struct SendDueStatementsUseCase {}

/// A tick never fails as a whole, problems are reported per cadence
#[derive(Debug)]
pub enum UseCaseError {}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementDispatchReport {
    /// Statement emails are switched off. Nothing was read or written.
    Disabled,
    Evaluated {
        weekly: CadenceOutcome,
        monthly: CadenceOutcome,
    },
}

impl StatementDispatchReport {
    pub fn outcome(&self, cadence: Cadence) -> Option<&CadenceOutcome> {
        match self {
            Self::Disabled => None,
            Self::Evaluated { weekly, monthly } => match cadence {
                Cadence::Weekly => Some(weekly),
                Cadence::Monthly => Some(monthly),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CadenceOutcome {
    NotDue {
        schedule_point: DateTime<Utc>,
        last_sent: Option<DateTime<Utc>>,
    },
    Dispatched(DispatchSummary),
    /// Nothing was sent and the marker was left untouched
    Failed {
        schedule_point: DateTime<Utc>,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSummary {
    pub cadence: Cadence,
    pub schedule_point: DateTime<Utc>,
    pub period: ReportingPeriod,
    pub recipients: usize,
    /// Emails handed to the sender, i.e. recipients whose statement was generated
    pub attempted: usize,
    pub sent: usize,
    pub failures: Vec<RecipientFailure>,
    /// `false` when the marker write failed after dispatching
    pub marker_saved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipientFailure {
    pub card_code: String,
    pub email: String,
    pub kind: RecipientFailureKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipientFailureKind {
    StatementGeneration(String),
    SendRejected,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueStatementsUseCase {
    type Response = StatementDispatchReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueStatements";

    async fn execute(&mut self, ctx: &StatementContext) -> Result<Self::Response, Self::Error> {
        let settings = &ctx.config.statement_emails;
        if !settings.enabled {
            return Ok(StatementDispatchReport::Disabled);
        }

        let now = ctx.sys.now();
        let weekly = process_cadence(ctx, settings, Cadence::Weekly, now).await;
        let monthly = process_cadence(ctx, settings, Cadence::Monthly, now).await;

        Ok(StatementDispatchReport::Evaluated { weekly, monthly })
    }
}

async fn process_cadence(
    ctx: &StatementContext,
    settings: &ScheduleSettings,
    cadence: Cadence,
    now: DateTime<Utc>,
) -> CadenceOutcome {
    let schedule_point = cadence.most_recent_schedule(now, settings);

    let last_sent = match read_last_sent(ctx, cadence).await {
        Ok(last_sent) => last_sent,
        Err(e) => {
            error!("Unable to read the {} statement marker: {:?}", cadence, e);
            return CadenceOutcome::Failed {
                schedule_point,
                reason: format!("Unable to read marker: {}", e),
            };
        }
    };

    let status = CadenceStatus::evaluate(cadence, now, settings, last_sent);
    if !status.due {
        return CadenceOutcome::NotDue {
            schedule_point,
            last_sent,
        };
    }

    let recipients = match ctx.services.recipients.eligible_recipients().await {
        Ok(recipients) => recipients,
        Err(e) => {
            error!(
                "Unable to list recipients for {} statements due at {}: {:?}",
                cadence, schedule_point, e
            );
            return CadenceOutcome::Failed {
                schedule_point,
                reason: format!("Unable to list recipients: {}", e),
            };
        }
    };

    info!(
        "Sending {} statements for {} to {} recipients",
        cadence,
        status.reporting_period,
        recipients.len()
    );
    let mut summary = dispatch(
        ctx,
        settings,
        cadence,
        schedule_point,
        status.reporting_period,
        &recipients,
    )
    .await;

    match write_last_sent(ctx, cadence, schedule_point).await {
        Ok(()) => summary.marker_saved = true,
        Err(e) => error!(
            "{} statements for {} were dispatched but the marker could not be saved, they will be sent again on the next tick: {:?}",
            cadence, status.reporting_period, e
        ),
    }

    info!(
        "{} statements for {}: {} of {} recipients sent, {} failed",
        cadence,
        summary.period,
        summary.sent,
        summary.recipients,
        summary.failures.len()
    );

    CadenceOutcome::Dispatched(summary)
}

async fn dispatch(
    ctx: &StatementContext,
    settings: &ScheduleSettings,
    cadence: Cadence,
    schedule_point: DateTime<Utc>,
    period: ReportingPeriod,
    recipients: &[Recipient],
) -> DispatchSummary {
    let mut summary = DispatchSummary {
        cadence,
        schedule_point,
        period,
        recipients: recipients.len(),
        attempted: 0,
        sent: 0,
        failures: Vec::new(),
        marker_saved: false,
    };

    for recipient in recipients {
        let request = StatementRequest {
            card_code: recipient.card_code.clone(),
            from_date: period.from_date,
            to_date: period.to_date,
            include_closed_invoices: settings.include_closed_invoices,
        };

        let statement = match ctx.services.statements.generate(&request).await {
            Ok(statement) => statement,
            Err(e) => {
                error!(
                    "Unable to generate {} statement for card code {}: {:?}",
                    cadence, recipient.card_code, e
                );
                summary.failures.push(RecipientFailure {
                    card_code: recipient.card_code.clone(),
                    email: recipient.email.clone(),
                    kind: RecipientFailureKind::StatementGeneration(e.to_string()),
                });
                continue;
            }
        };

        let display_name = if recipient.card_name.trim().is_empty() {
            &recipient.card_code
        } else {
            &recipient.card_name
        };
        let email = StatementEmail {
            to: &recipient.email,
            display_name,
            statement: &statement,
            period,
            cadence,
        };

        summary.attempted += 1;
        if ctx.services.email.send_statement(&email).await {
            summary.sent += 1;
        } else {
            warn!(
                "{} statement email for card code {} was rejected",
                cadence, recipient.card_code
            );
            summary.failures.push(RecipientFailure {
                card_code: recipient.card_code.clone(),
                email: recipient.email.clone(),
                kind: RecipientFailureKind::SendRejected,
            });
        }
    }

    summary
}
