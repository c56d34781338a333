//! 多模型预测路由服务

use std::net::SocketAddr;
use std::sync::Arc;

use manymodels_config::AppConfig;
use manymodels_errors::AppError;
use manymodels_gateway::{AppState, HttpModelEndpoint, RoutingService, api_routes, metrics};
use manymodels_registry::RoutingTable;
use manymodels_telemetry::{init_metrics, init_tracing, init_tracing_json};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config_dir =
        std::env::var("MANYMODELS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir)?;

    // 初始化 tracing
    if config.is_production() || config.telemetry.json {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }
    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );

    let metrics_handle = init_metrics()?;

    // 加载路由表，失败则拒绝启动
    info!(model_dir = %config.routing.model_dir.display(), "Loading routing table");
    let table = RoutingTable::load_from_model_dir(&config.routing.model_dir).map_err(|e| {
        error!(error = %e, "Routing table is not usable, refusing to start");
        AppError::from(e)
    })?;
    metrics::set_routing_table_size(table.len());

    let endpoint = HttpModelEndpoint::new(
        config.routing.request_timeout(),
        config.routing.endpoint_key.clone(),
    )?;
    let service = RoutingService::new(Arc::new(table), Arc::new(endpoint));

    let app = api_routes(AppState::new(service).with_metrics(metrics_handle))
        .layer(TraceLayer::new_for_http());

    // 启动服务器
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!(%addr, "Starting forecast router");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Forecast router stopped");
    Ok(())
}

/// 等待关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
