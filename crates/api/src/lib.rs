mod error;
mod lifecycle;
mod notification;
mod recipient;
mod reminder;
mod shared;
mod status;
mod warner;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
pub use lifecycle::{Lifecycle, LifecycleError, Rescheduled};
use notifier_infra::NotifierContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;
pub use warner::{start_warner, tick, TickReport, WarnerHandle};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    notification::configure_routes(cfg);
    recipient::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    warner: WarnerHandle,
}

impl Application {
    pub async fn new(context: NotifierContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let warner = start_warner(context);

        Ok(Self {
            server,
            port,
            warner,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: NotifierContext) -> Result<(Server, u16), std::io::Error> {
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

    /// Serves until the server is shut down, then stops the warner
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        self.warner.stop().await;
        res
    }
}
