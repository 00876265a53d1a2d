#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use bookmark_api::app::{self, AppState};
use bookmark_api::auth::JwtKeys;
use bookmark_api::config::AppConfig;

/// Router served in-process on an ephemeral port, backed by its own memory store.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let config = AppConfig::for_tests();
        let keys = JwtKeys::from_config(&config.security).context("test JWT keys")?;
        let app = app::router(AppState::in_memory(keys), &config);

        let listener = TcpListener::bind("127.0.0.1:0").await.context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        // Lives as long as the test's runtime.
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(format!("{}{}", self.base_url, path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(format!("{}{}", self.base_url, path))
    }

    /// Sign up a fresh account and return its access token.
    pub async fn signup(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .post("/auth/signup")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());

        let body: Value = res.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("signup response has no access_token")
    }

    /// Token for a brand new user with a random email.
    pub async fn new_user(&self) -> Result<String> {
        self.signup(&unique_email(), "test1234").await
    }
}

pub fn unique_email() -> String {
    format!("user-{}@example.com", uuid::Uuid::new_v4().simple())
}
