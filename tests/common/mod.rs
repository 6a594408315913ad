#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use metis_api::auth::{generate_jwt, Claims};
use metis_api::config;
use metis_api::database::fixtures::{demo_login, seed_demo_data};
use metis_api::database::MemoryStore;
use metis_api::notification::MemorySink;
use metis_api::server::{app, AppState};

/// An API server on a free port, backed by a freshly seeded in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: MemoryStore,
    pub sink: MemorySink,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = MemoryStore::new();
        seed_demo_data(&store).await?;
        let sink = MemorySink::new();

        let state = AppState::new(Arc::new(store.clone()), Arc::new(sink.clone()));
        let router = app(state, config::config());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            store,
            sink,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn answer_posts_url(&self, course_id: i64) -> String {
        self.url(&format!("/api/courses/{}/answer-posts", course_id))
    }

    pub fn answer_post_url(&self, course_id: i64, answer_post_id: i64) -> String {
        self.url(&format!("/api/courses/{}/answer-posts/{}", course_id, answer_post_id))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Request builder carrying a bearer token for one of the demo users
    pub fn as_user(&self, builder: RequestBuilder, user_id: i64) -> RequestBuilder {
        builder.bearer_auth(token_for(user_id))
    }
}

pub fn token_for(user_id: i64) -> String {
    let login = demo_login(user_id).expect("demo user");
    generate_jwt(&Claims::new(login, user_id)).expect("token")
}

pub async fn json_body(resp: reqwest::Response) -> Result<Value> {
    Ok(resp.json::<Value>().await?)
}
