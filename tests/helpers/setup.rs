use notifier_api::Application;
use notifier_infra::{Config, NotifierContext};

pub const API_KEY: &str = "integration-test-key";

pub struct TestApp {
    pub config: Config,
    pub address: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("X-Token", &self.config.api_key)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("X-Token", &self.config.api_key)
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("X-Token", &self.config.api_key)
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("X-Token", &self.config.api_key)
    }

    /// Request without the `X-Token` header
    pub fn anonymous_get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let mut config = Config::from_lookup(|_| None);
    config.port = 0; // Random port
    config.api_key = API_KEY.into();
    let ctx = NotifierContext::create(config.clone());

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

    TestApp {
        config,
        address,
        client: reqwest::Client::new(),
    }
}
