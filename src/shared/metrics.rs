//! Prometheus Metrics Module
//!
//! 健康检查引擎自身的运行指标
//!
//! ## 指标类型
//! - **Counter**: 报告次数、探针失败次数、心跳写入次数
//! - **Histogram**: 探针耗时
//! - **Gauge**: 每个检查的最近状态 (0=ok, 1=warning, 2=critical)
//!
//! ## 使用示例
//! ```rust,ignore
//! use vigilant_health::shared::metrics::METRICS;
//!
//! let timer = METRICS.probe_duration.with_label_values(&["check", "database"]).start_timer();
//! // ... 执行检查 ...
//! timer.observe_duration();
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};

lazy_static! {
    /// 全局Metrics实例
    pub static ref METRICS: Metrics = Metrics::new();
}

/// 健康检查核心指标
pub struct Metrics {
    /// 报告总数 (按总体状态)
    pub reports_total: CounterVec,

    /// 探针耗时分布 (秒, 按 kind=check/metric 和名称)
    pub probe_duration: HistogramVec,

    /// 探针失败总数 (按 kind 和原因)
    pub probe_failures_total: CounterVec,

    /// 每个检查最近一次的状态
    pub check_status: GaugeVec,

    /// 心跳写入总数 (按来源和结果)
    pub heartbeat_writes_total: CounterVec,
}

impl Metrics {
    /// 创建新的Metrics实例
    pub fn new() -> Self {
        Self {
            reports_total: register_counter_vec!(
                "vigilant_health_reports_total",
                "Total number of health reports generated",
                &["status"]
            )
            .expect("register vigilant_health_reports_total"),

            probe_duration: register_histogram_vec!(
                "vigilant_health_probe_duration_seconds",
                "Duration of individual checks and metrics",
                &["kind", "name"],
                vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
            )
            .expect("register vigilant_health_probe_duration_seconds"),

            probe_failures_total: register_counter_vec!(
                "vigilant_health_probe_failures_total",
                "Total number of probe execution failures",
                &["kind", "reason"]
            )
            .expect("register vigilant_health_probe_failures_total"),

            check_status: register_gauge_vec!(
                "vigilant_health_check_status",
                "Latest status per check (0=ok, 1=warning, 2=critical)",
                &["name"]
            )
            .expect("register vigilant_health_check_status"),

            heartbeat_writes_total: register_counter_vec!(
                "vigilant_health_heartbeat_writes_total",
                "Total number of heartbeat writes",
                &["source", "result"]
            )
            .expect("register vigilant_health_heartbeat_writes_total"),
        }
    }

    /// 导出Prometheus格式的指标
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("指标编码失败: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
