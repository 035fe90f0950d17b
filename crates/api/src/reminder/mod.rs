mod delete_reminder;
mod get_reminder;
mod get_reminders;
mod get_reminders_by_month;
mod get_reminders_overview;
mod upsert_reminder;

use actix_web::web;
use delete_reminder::delete_reminder_controller;
use get_reminder::get_reminder_controller;
use get_reminders::get_reminders_controller;
use get_reminders_by_month::get_reminders_by_month_controller;
use get_reminders_overview::get_reminders_overview_controller;
use upsert_reminder::{create_reminder_controller, update_reminder_controller};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));

    cfg.route(
        "/reminders/views/overview",
        web::get().to(get_reminders_overview_controller),
    );
    cfg.route(
        "/reminders/views/month",
        web::get().to(get_reminders_by_month_controller),
    );

    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
}
