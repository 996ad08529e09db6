use statement_mailer_api::Application;
use statement_mailer_infra::StatementContext;
use statement_mailer_sdk::StatementMailerSDK;

// Launch the application as a background task
pub async fn spawn_app(mut ctx: StatementContext) -> (StatementMailerSDK, String) {
    ctx.config.port = 0; // Random port

    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = StatementMailerSDK::new(address.clone());
    (sdk, address)
}
