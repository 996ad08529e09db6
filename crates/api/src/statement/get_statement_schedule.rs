use super::last_sent::read_last_sent;
use crate::error::AppError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use statement_mailer_api_structs::get_statement_schedule::*;
use statement_mailer_domain::{Cadence, CadenceStatus};
use statement_mailer_infra::StatementContext;

fn handle_error(e: UseCaseError) -> AppError {
    match e {
        UseCaseError::StorageError => AppError::InternalError,
    }
}

pub async fn get_statement_schedule_controller(
    ctx: web::Data<StatementContext>,
) -> Result<HttpResponse, AppError> {
    let usecase = GetStatementScheduleUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|cadences| {
            HttpResponse::Ok().json(APIResponse::new(&ctx.config.statement_emails, cadences))
        })
        .map_err(handle_error)
}

/// Read only view of both cadences at the current instant
#[derive(Debug)]
struct GetStatementScheduleUseCase {}

#[derive(Debug)]
enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetStatementScheduleUseCase {
    type Response = Vec<CadenceStatus>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetStatementSchedule";

    async fn execute(&mut self, ctx: &StatementContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let mut cadences = Vec::with_capacity(Cadence::ALL.len());
        for cadence in Cadence::ALL {
            let last_sent = read_last_sent(ctx, cadence)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            cadences.push(CadenceStatus::evaluate(
                cadence,
                now,
                &ctx.config.statement_emails,
                last_sent,
            ));
        }
        Ok(cadences)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use statement_mailer_infra::StaticTimeSys;
    use std::sync::Arc;

    #[actix_web::test]
    async fn it_reports_both_cadences_without_writing_markers() {
        let mut ctx = StatementContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(
            Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
        ));
        ctx.repos
            .settings
            .set(
                Cadence::Monthly.marker_key(),
                "2024-03-01T06:00:00Z",
                "statement-email-scheduler",
            )
            .await
            .unwrap();

        let usecase = GetStatementScheduleUseCase {};
        let cadences = execute(usecase, &ctx).await.unwrap();

        assert_eq!(cadences.len(), 2);
        assert_eq!(cadences[0].cadence, Cadence::Weekly);
        assert!(cadences[0].due);
        assert!(cadences[0].last_sent.is_none());
        assert_eq!(cadences[1].cadence, Cadence::Monthly);
        assert!(!cadences[1].due);
        assert!(ctx
            .repos
            .settings
            .get(Cadence::Weekly.marker_key())
            .await
            .unwrap()
            .is_none());
    }
}
