//! 模型服务客户端
//!
//! 每个 (模型类型, 门店, 品牌) 组合部署在某个模型服务上，
//! 路由层把原始请求体原样 POST 过去。

use std::time::Duration;

use async_trait::async_trait;
use manymodels_errors::{AppError, AppResult};
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, Secret};
use tracing::debug;

use crate::types::ForecastResponse;

/// 模型服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    /// 转发请求体，返回下游的状态码与响应体；仅在下游不可达时返回错误
    async fn forward(&self, url: &str, body: String) -> AppResult<ForecastResponse>;
}

/// 基于 HTTP 的模型服务客户端
#[derive(Clone)]
pub struct HttpModelEndpoint {
    client: reqwest::Client,
    api_key: Option<Secret<String>>,
}

impl HttpModelEndpoint {
    /// 创建客户端；未指定超时则沿用 reqwest 默认行为
    pub fn new(timeout: Option<Duration>, api_key: Option<Secret<String>>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl ModelEndpoint for HttpModelEndpoint {
    async fn forward(&self, url: &str, body: String) -> AppResult<ForecastResponse> {
        debug!(url, bytes = body.len(), "Calling model endpoint");

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::downstream(format!("Failed to call model endpoint {url}: {e}")))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| {
            AppError::downstream(format!("Failed to read response from {url}: {e}"))
        })?;

        Ok(ForecastResponse {
            status,
            body,
            content_type,
        })
    }
}
