//! Metrics 模块

use std::time::Instant;

use metrics::{counter, gauge, histogram};

/// 记录一次预测路由
pub fn record_forecast_request(outcome: &str, duration_ms: f64) {
    let labels = [("outcome", outcome.to_string())];

    counter!("forecast_requests_total", &labels).increment(1);
    histogram!("forecast_request_duration_ms", &labels).record(duration_ms);
}

/// 设置路由表条目数
pub fn set_routing_table_size(routes: usize) {
    gauge!("routing_table_routes").set(routes as f64);
}

/// 请求计时器
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn finish(self, outcome: &str) -> f64 {
        let duration = self.start.elapsed().as_secs_f64() * 1000.0;
        record_forecast_request(outcome, duration);
        duration
    }
}
