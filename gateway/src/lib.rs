//! 多模型预测路由服务
//!
//! 按 `{model_type}_{store}_{brand}` 把预测请求转发到对应的模型服务。

pub mod endpoint;
pub mod metrics;
pub mod routing;
pub mod service;
pub mod types;

pub use endpoint::{HttpModelEndpoint, ModelEndpoint};
pub use routing::{AppState, api_routes};
pub use service::RoutingService;
pub use types::{ForecastData, ForecastMetadata, ForecastRequest, ForecastResponse};
