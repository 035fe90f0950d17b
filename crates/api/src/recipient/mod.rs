mod delete_recipient;
mod get_recipient;
mod get_recipients;
mod send_message;
mod upsert_recipient;

use actix_web::web;
use delete_recipient::delete_recipient_controller;
use get_recipient::get_recipient_controller;
use get_recipients::get_recipients_controller;
use send_message::send_message_controller;
use upsert_recipient::{create_recipient_controller, update_recipient_controller};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/recipients", web::post().to(create_recipient_controller));
    cfg.route("/recipients", web::get().to(get_recipients_controller));

    cfg.route(
        "/recipients/{recipient_id}",
        web::get().to(get_recipient_controller),
    );
    cfg.route(
        "/recipients/{recipient_id}",
        web::put().to(update_recipient_controller),
    );
    cfg.route(
        "/recipients/{recipient_id}",
        web::delete().to(delete_recipient_controller),
    );

    cfg.route(
        "/recipients/{recipient_id}/send",
        web::post().to(send_message_controller),
    );
}
