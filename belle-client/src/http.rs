// belle-client/src/http.rs
// HTTP 客户端 - 网络通信

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::session::Session;
use crate::{ClientError, ClientResult};

/// Backend error body (`{"message": "..."}`)
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP 客户端 trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
}

/// 网络 HTTP 客户端
///
/// Attaches `Authorization: Bearer <token>` when the session has a token and
/// tears the session down on any 401.
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            session,
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.session.token().map(|t| format!("Bearer {}", t))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> ClientResult<T> {
        let started = Instant::now();
        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                tracing::warn!(%method, path, error = %err, "Request failed without response");
                return Err(err);
            }
        };
        tracing::debug!(
            %method,
            path,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.session.teardown();
            }
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .ok()
                .and_then(|body| body.message);
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        // 空响应体按 null 解析 (DELETE 等返回 204)
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::GET, path);
        self.send(Method::GET, path, req).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, req).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::POST, path);
        self.send(Method::POST, path, req).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, req).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, req).await
    }
}
