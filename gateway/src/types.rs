//! 预测请求与响应

use axum::body::{Body, Bytes};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use manymodels_errors::{AppError, AppResult};
use manymodels_registry::{compose_key, validate_key_part};
use serde::{Deserialize, Serialize};

/// 预测请求（完整的线上格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub store: String,
    pub brand: String,
    pub model_type: String,
    pub forecast_horizon: u32,
    /// 日历频率代码，如 `W-THU`
    pub date_freq: String,
    pub data: ForecastData,
}

/// 历史序列，路由层不解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

/// 路由所需的请求元数据：除 `data` 以外的全部顶层字段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForecastMetadata {
    pub store: String,
    pub brand: String,
    pub model_type: String,
    pub forecast_horizon: u32,
    pub date_freq: String,
}

impl ForecastMetadata {
    /// 从原始请求体解析并校验元数据
    ///
    /// `data` 字段只做 JSON 语法检查，内容被跳过。
    pub fn parse(raw: &str) -> AppResult<Self> {
        let metadata: Self = serde_json::from_str(raw)
            .map_err(|e| AppError::malformed(format!("Invalid forecast request: {e}")))?;

        validate_key_part("model_type", &metadata.model_type)?;
        validate_key_part("store", &metadata.store)?;
        validate_key_part("brand", &metadata.brand)?;

        Ok(metadata)
    }

    pub fn model_key(&self) -> String {
        compose_key(&self.model_type, &self.store, &self.brand)
    }
}

/// 预测响应：状态码与响应体，来自下游模型服务或路由层本身
///
/// 响应体按原始字节保存，不做字符集转换。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastResponse {
    pub status: u16,
    pub body: Bytes,
    pub content_type: Option<String>,
}

impl ForecastResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl From<AppError> for ForecastResponse {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.to_string()).with_content_type("text/plain; charset=utf-8")
    }
}

impl IntoResponse for ForecastResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        // 下游未给出 content-type 时不补默认值
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        if let Some(value) = self
            .content_type
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }

        response
    }
}
