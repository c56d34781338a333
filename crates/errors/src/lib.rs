//! manymodels-errors - 统一错误处理
//!
//! 路由服务的错误分类：启动期配置错误直接终止进程，
//! 请求期错误一律转换为 HTTP 响应，不越过 handler 边界。

use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 启动期配置错误（路由表缺失、重复等），不可恢复
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 请求体不是合法 JSON 或缺少必需字段
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// 路由表中没有对应的模型
    #[error("Model not found for store {store} and brand {brand} of type {model_type}")]
    RoutingMiss {
        store: String,
        brand: String,
        model_type: String,
    },

    /// 下游模型服务不可达
    #[error("Downstream error: {0}")]
    Downstream(String),
}

impl AppError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    pub fn routing_miss(
        store: impl Into<String>,
        brand: impl Into<String>,
        model_type: impl Into<String>,
    ) -> Self {
        Self::RoutingMiss {
            store: store.into(),
            brand: brand.into(),
            model_type: model_type.into(),
        }
    }

    pub fn downstream(msg: impl Into<String>) -> Self {
        Self::Downstream(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) => 500,
            Self::MalformedRequest(_) => 400,
            Self::RoutingMiss { .. } => 400,
            Self::Downstream(_) => 502,
        }
    }

    /// 指标与日志使用的结果标签
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::MalformedRequest(_) => "malformed",
            Self::RoutingMiss { .. } => "routing_miss",
            Self::Downstream(_) => "downstream_error",
        }
    }

    /// 是否为调用方造成的错误
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
