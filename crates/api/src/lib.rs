mod error;
mod job_schedulers;
mod shared;
mod statement;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_schedulers::start_statement_emails_job;
use statement_mailer_infra::StatementContext;
use std::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

pub use statement::send_due_statements::{
    CadenceOutcome, DispatchSummary, RecipientFailure, RecipientFailureKind,
    StatementDispatchReport,
};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    statement::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    shutdown: CancellationToken,
    job_schedulers: Vec<JoinHandle<()>>,
}

impl Application {
    pub async fn new(context: StatementContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let shutdown = CancellationToken::new();
        let job_schedulers = Application::start_job_schedulers(context, shutdown.clone());

        Ok(Self {
            server,
            port,
            shutdown,
            job_schedulers,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(
        context: StatementContext,
        shutdown: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        vec![start_statement_emails_job(context, shutdown)]
    }

    async fn configure_server(context: StatementContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Runs until the server stops, then waits for the job schedulers to
    /// finish their current tick
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;

        info!("Server stopped, shutting down job schedulers");
        self.shutdown.cancel();
        for job in self.job_schedulers {
            if let Err(e) = job.await {
                error!("Job scheduler did not shut down cleanly: {:?}", e);
            }
        }

        res
    }
}
