use crate::{shared::usecase::execute, statement::send_due_statements::SendDueStatementsUseCase};
use statement_mailer_infra::StatementContext;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub const STATEMENT_EMAILS_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Starts the recurring statement emails job. The first tick runs right away.
pub fn start_statement_emails_job(
    ctx: StatementContext,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    start_statement_emails_job_every(ctx, shutdown, STATEMENT_EMAILS_POLL_INTERVAL)
}

fn start_statement_emails_job_every(
    ctx: StatementContext,
    shutdown: CancellationToken,
    period: Duration,
) -> JoinHandle<()> {
    actix_web::rt::spawn(async move {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            // Shutdown is only observed between ticks
            let tick = actix_web::rt::spawn(send_due_statements(ctx.clone()));
            if let Err(e) = tick.await {
                error!("Statement emails tick did not complete: {:?}", e);
            }
        }
        info!("Statement emails job stopped");
    })
}

async fn send_due_statements(ctx: StatementContext) {
    let usecase = SendDueStatementsUseCase {};
    let _ = execute(usecase, &ctx).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use statement_mailer_domain::{Cadence, Recipient, ScheduleSettings};
    use statement_mailer_infra::{
        IEmailSender, IRecipientSource, InMemoryEmailSender, InMemoryRecipientSource,
        InMemoryStatementGenerator, Services, StatementEmail, StaticTimeSys,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn enabled_context() -> StatementContext {
        let mut ctx = StatementContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(
            Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
        ));
        ctx.config.statement_emails = ScheduleSettings {
            enabled: true,
            ..Default::default()
        };
        ctx
    }

    /// Waits up to two seconds for `condition` to hold
    async fn wait_until(condition: impl Fn() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn recipients(count: usize) -> Vec<Recipient> {
        (1..=count)
            .map(|n| Recipient {
                card_code: format!("C{}", n),
                card_name: format!("Customer {}", n),
                email: format!("c{}@example.com", n),
            })
            .collect()
    }

    #[actix_web::test]
    async fn it_sends_once_and_stops_on_cancellation() {
        let mut ctx = enabled_context();
        let email = Arc::new(InMemoryEmailSender::new());
        ctx.services = Services {
            recipients: Arc::new(InMemoryRecipientSource::new(recipients(1))),
            statements: Arc::new(InMemoryStatementGenerator::new()),
            email: email.clone(),
        };

        let shutdown = CancellationToken::new();
        let job = start_statement_emails_job_every(
            ctx.clone(),
            shutdown.clone(),
            Duration::from_millis(20),
        );
        wait_until(|| email.attempts().len() >= 2).await;
        // Let a few more ticks run against the serviced schedule points
        tokio::time::sleep(Duration::from_millis(60)).await;
        shutdown.cancel();
        job.await.unwrap();

        // Several ticks ran, but every schedule point is serviced exactly once
        assert_eq!(email.attempts().len(), 2);
        for cadence in Cadence::ALL {
            assert!(ctx
                .repos
                .settings
                .get(cadence.marker_key())
                .await
                .unwrap()
                .is_some());
        }
    }

    struct PanickingRecipientSource {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IRecipientSource for PanickingRecipientSource {
        async fn eligible_recipients(&self) -> anyhow::Result<Vec<Recipient>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            panic!("recipient source blew up");
        }
    }

    #[actix_web::test]
    async fn a_panicking_tick_does_not_stop_the_job() {
        let mut ctx = enabled_context();
        let recipients = Arc::new(PanickingRecipientSource {
            calls: AtomicUsize::new(0),
        });
        ctx.services.recipients = recipients.clone();

        let shutdown = CancellationToken::new();
        let job = start_statement_emails_job_every(ctx, shutdown.clone(), Duration::from_millis(20));
        wait_until(|| recipients.calls.load(Ordering::SeqCst) >= 2).await;
        shutdown.cancel();
        job.await.unwrap();

        assert!(recipients.calls.load(Ordering::SeqCst) >= 2);
    }

    struct SlowEmailSender {
        started: AtomicUsize,
        completed: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl IEmailSender for SlowEmailSender {
        async fn send_statement(&self, _email: &StatementEmail<'_>) -> bool {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[actix_web::test]
    async fn cancellation_lets_the_running_tick_finish() {
        let mut ctx = enabled_context();
        let email = Arc::new(SlowEmailSender {
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });
        ctx.services = Services {
            recipients: Arc::new(InMemoryRecipientSource::new(recipients(5))),
            statements: Arc::new(InMemoryStatementGenerator::new()),
            email: email.clone(),
        };

        let shutdown = CancellationToken::new();
        let job = start_statement_emails_job_every(
            ctx.clone(),
            shutdown.clone(),
            Duration::from_secs(60 * 60),
        );
        wait_until(|| email.started.load(Ordering::SeqCst) >= 1).await;
        assert!(email.completed.load(Ordering::SeqCst) < 10);
        shutdown.cancel();
        job.await.unwrap();

        assert_eq!(email.started.load(Ordering::SeqCst), 10);
        assert_eq!(email.completed.load(Ordering::SeqCst), 10);
        for cadence in Cadence::ALL {
            assert_eq!(
                ctx.repos.settings.get(cadence.marker_key()).await.unwrap(),
                Some(match cadence {
                    Cadence::Weekly => "2024-03-11T06:00:00Z".to_string(),
                    Cadence::Monthly => "2024-03-01T06:00:00Z".to_string(),
                })
            );
        }
    }

    #[actix_web::test]
    async fn a_cancelled_token_stops_the_job_before_the_first_tick() {
        let mut ctx = enabled_context();
        let recipients = Arc::new(PanickingRecipientSource {
            calls: AtomicUsize::new(0),
        });
        ctx.services.recipients = recipients.clone();

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let job = start_statement_emails_job(ctx, shutdown);
        job.await.unwrap();

        assert_eq!(recipients.calls.load(Ordering::SeqCst), 0);
    }
}
