use crate::error::NotifierError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::{get_service_health, get_service_info};
use notifier_infra::{NotifierContext, ReminderSpaceRead};
use tracing::error;

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(get_service_health::APIResponse {
        message: "Yo! We are up!\r\n".into(),
    })
}

async fn info(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    let (reminder_count, notification_count) = {
        let guard = ctx.store.read().await;
        let reminders = guard.all_reminders().await;
        let notifications = guard.all_notifications().await;
        match (reminders, notifications) {
            (Ok(reminders), Ok(notifications)) => (reminders.len(), notifications.len()),
            (Err(e), _) | (_, Err(e)) => {
                error!("Unable to count reminders: {:?}", e);
                return Err(NotifierError::InternalError);
            }
        }
    };

    let tz = ctx.config.client_tz;
    Ok(HttpResponse::Ok().json(get_service_info::APIResponse {
        version: env!("CARGO_PKG_VERSION").into(),
        client_time_zone: tz.name().into(),
        client_time: ctx.sys.now().with_timezone(&tz).to_rfc3339(),
        reminder_count,
        notification_count,
        metrics: ctx.metrics.snapshot(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
    cfg.route("/info", web::get().to(info));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::auth::TOKEN_HEADER;
    use crate::shared::test_utils::{setup_context, API_KEY};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::prelude::*;

    #[actix_web::test]
    async fn info_is_served_to_authorized_requests_only() {
        let ctx = setup_context(Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/info")
            .insert_header((TOKEN_HEADER, API_KEY))
            .to_request();
        let res: get_service_info::APIResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(res.client_time_zone, "Europe/Berlin");
        assert_eq!(res.reminder_count, 0);

        let req = test::TestRequest::get().uri("/info").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
