#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use book_review_api::store::MemoryStore;
use book_review_api::{app, AppConfig, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

/// A registered account and the token issued for it.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestServer {
    /// Serve a fresh app backed by an empty in-memory store.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(&[]).await
    }

    pub async fn spawn_with(extra_vars: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut vars = vec![
            ("JWT_SECRET".to_string(), "test-secret".to_string()),
            ("BCRYPT_COST".to_string(), "4".to_string()),
        ];
        vars.extend(extra_vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let config = AppConfig::from_vars(|key| {
            vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })?;

        let state = AppState::new(config, Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
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

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Response> {
        let res = self
            .client
            .post(self.url("/register"))
            .json(&json!({ "email": email, "password": password, "name": name }))
            .send()
            .await?;
        Ok(res)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Ok(res)
    }

    /// Register an account and return its id and token.
    pub async fn create_user(&self, email: &str) -> Result<TestUser> {
        let res = self.register(email, "correct-horse", "Test Reader").await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let body: Value = res.json().await?;
        Ok(TestUser {
            id: body["data"]["user"]["id"].as_str().context("missing user id")?.to_string(),
            email: email.to_string(),
            token: body["data"]["token"].as_str().context("missing token")?.to_string(),
        })
    }

    pub async fn post_json(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<Response> {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }

    pub async fn put_json(&self, path: &str, token: &str, body: &Value) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Add a book as `user` and return its id.
    pub async fn create_book(
        &self,
        user: &TestUser,
        title: &str,
        author: &str,
        genre: &str,
    ) -> Result<String> {
        let res = self
            .post_json(
                "/books",
                Some(&user.token),
                &json!({
                    "title": title,
                    "author": author,
                    "genre": genre,
                    "description": format!("{} by {}", title, author),
                    "published": "2001-02-03"
                }),
            )
            .await?;
        anyhow::ensure!(
            res.status() == StatusCode::CREATED,
            "create book failed: {}",
            res.status()
        );
        let body: Value = res.json().await?;
        Ok(body["data"]["id"].as_str().context("missing book id")?.to_string())
    }

    /// Review `book_id` as `user` and return the raw response.
    pub async fn review(
        &self,
        user: &TestUser,
        book_id: &str,
        rating: i64,
        comment: &str,
    ) -> Result<Response> {
        self.post_json(
            &format!("/books/{}/reviews", book_id),
            Some(&user.token),
            &json!({ "rating": rating, "comment": comment }),
        )
        .await
    }
}

/// Assert the error envelope and return its code.
pub async fn error_code(res: Response) -> Result<String> {
    let body: Value = res.json().await?;
    anyhow::ensure!(body["success"] == false, "expected error envelope: {}", body);
    anyhow::ensure!(body["error"] == true, "expected error flag: {}", body);
    Ok(body["code"].as_str().context("missing code")?.to_string())
}
