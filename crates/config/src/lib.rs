//! manymodels-config - 配置加载库
//!
//! 加载顺序（后者覆盖前者）：内置默认值 → `default.toml` → `{APP_ENV}.toml`
//! → `MANYMODELS_*` 环境变量 → 托管平台挂载的 `AZUREML_MODEL_DIR`。

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

/// 托管平台注入的模型目录环境变量
pub const MODEL_DIR_ENV: &str = "AZUREML_MODEL_DIR";

/// 本服务环境变量前缀，`__` 表示嵌套，如 `MANYMODELS_SERVER__PORT`
pub const ENV_PREFIX: &str = "MANYMODELS_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// 输出 JSON 格式日志；生产环境下总是启用
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// 路由配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// 路由表制品所在目录，目录下必须恰好有一个文件
    pub model_dir: PathBuf,
    /// 转发请求超时；未设置时使用 HTTP 客户端默认值
    pub request_timeout_secs: Option<u64>,
    /// 模型服务的访问密钥，以 Bearer token 方式发送
    pub endpoint_key: Option<Secret<String>>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            request_timeout_secs: None,
            endpoint_key: None,
        }
    }
}

impl RoutingConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub routing: RoutingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "manymodels-router".to_string(),
            app_env: "development".to_string(),
            server: ServerConfig::default(),
            telemetry: TelemetryConfig::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(config_dir).extract()?;
        Ok(config)
    }

    /// 构建分层配置源
    pub fn figment(config_dir: &str) -> Figment {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[MODEL_DIR_ENV])
                    .map(|_| "routing.model_dir".into()),
            )
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    /// 服务监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests;
