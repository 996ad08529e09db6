mod get_statement_schedule;
mod last_sent;
pub mod send_due_statements;

use actix_web::web;
use get_statement_schedule::get_statement_schedule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/statement-emails/schedule",
        web::get().to(get_statement_schedule_controller),
    );
}
