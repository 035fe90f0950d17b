mod create_notification;
mod delete_notification;
mod get_notification_expiry;
mod get_notifications;

use actix_web::web;
use create_notification::create_notification_controller;
use delete_notification::delete_notification_controller;
use get_notification_expiry::get_notification_expiry_controller;
use get_notifications::get_notifications_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notifications",
        web::post().to(create_notification_controller),
    );
    cfg.route("/notifications", web::get().to(get_notifications_controller));

    cfg.route(
        "/notifications/{notification_id}/expiry",
        web::get().to(get_notification_expiry_controller),
    );
    cfg.route(
        "/notifications/{notification_id}",
        web::delete().to(delete_notification_controller),
    );
}
