//! 预测路由服务
//!
//! 解析请求元数据 → 组合模型键 → 查路由表 → 原样转发请求体 → 透传下游响应。
//! 路由表在启动时加载后只读，多个请求并发访问无需加锁。

use std::sync::Arc;

use manymodels_errors::{AppError, AppResult};
use manymodels_registry::RoutingTable;
use tracing::{debug, error, info, warn};

use crate::endpoint::ModelEndpoint;
use crate::metrics::RequestTimer;
use crate::types::{ForecastMetadata, ForecastResponse};

/// 路由服务
#[derive(Clone)]
pub struct RoutingService {
    table: Arc<RoutingTable>,
    endpoint: Arc<dyn ModelEndpoint>,
}

impl RoutingService {
    pub fn new(table: Arc<RoutingTable>, endpoint: Arc<dyn ModelEndpoint>) -> Self {
        Self { table, endpoint }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// 处理一次预测请求
    ///
    /// 所有请求期错误都会转换为响应，不会向上抛出。
    pub async fn handle(&self, raw: String) -> ForecastResponse {
        let timer = RequestTimer::start();

        match self.route(raw).await {
            Ok(response) => {
                let duration_ms = timer.finish("routed");
                info!(status = response.status, duration_ms, "Forecast request routed");
                response
            }
            Err(err) => {
                let duration_ms = timer.finish(err.outcome());
                if err.is_client_error() {
                    warn!(error = %err, duration_ms, "Forecast request rejected");
                } else {
                    error!(error = %err, duration_ms, "Forecast request failed");
                }
                err.into()
            }
        }
    }

    async fn route(&self, raw: String) -> AppResult<ForecastResponse> {
        let metadata = ForecastMetadata::parse(&raw)?;
        let model_key = metadata.model_key();

        let Some(url) = self.table.lookup(&model_key) else {
            return Err(AppError::routing_miss(
                metadata.store,
                metadata.brand,
                metadata.model_type,
            ));
        };

        debug!(
            %model_key,
            url,
            forecast_horizon = metadata.forecast_horizon,
            date_freq = %metadata.date_freq,
            "Resolved model endpoint"
        );

        self.endpoint.forward(url, raw).await
    }
}
