use actix_web::{web, HttpResponse};
use statement_mailer_api_structs::get_service_health::*;

const HEALTHY_MESSAGE: &str = "Statement mailer is up";

async fn get_service_health() -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: HEALTHY_MESSAGE.into(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(get_service_health));
}
