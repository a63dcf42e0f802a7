//! 健康状态模型
//!
//! 单个探针的结果（`CheckResult`）和指标读数（`MetricReading`）。
//! 两者产生后不可变。
//!
//! ## 严重程度
//! `Ok < Warning < Critical`，聚合时取最大值。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 健康状态
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// 正常
    #[default]
    Ok,
    /// 警告（仅供参考，不影响流量）
    Warning,
    /// 严重（应从负载均衡中摘除）
    Critical,
}

impl Status {
    /// 聚合一组状态，空集合为 `Ok`
    pub fn aggregate<I>(statuses: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        statuses.into_iter().max().unwrap_or(Status::Ok)
    }

    /// Prometheus gauge 使用的数值
    pub fn as_gauge(self) -> f64 {
        match self {
            Status::Ok => 0.0,
            Status::Warning => 1.0,
            Status::Critical => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 详情字段中的标量值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        i64::try_from(v).map(Scalar::Int).unwrap_or(Scalar::Float(v as f64))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// 单个检查的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// 检查名称
    pub name: String,
    /// 状态
    pub status: Status,
    /// 描述信息
    pub message: String,
    /// 结构化详情（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<BTreeMap<String, Scalar>>,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Ok, message)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Warning, message)
    }

    pub fn critical(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Critical, message)
    }

    /// 附加一个详情字段
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.detail
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// 指标值：数值或字符串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

/// 指标读数
///
/// 指标没有通过/失败语义。采集失败时 `value` 为空，`error` 描述原因。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricReading {
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            unit: None,
            error: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// 采集失败的读数
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            unit: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(Status::Ok < Status::Warning);
        assert!(Status::Warning < Status::Critical);
        assert_eq!(Status::Ok.max(Status::Critical), Status::Critical);
    }

    #[test]
    fn test_aggregate_empty_is_ok() {
        assert_eq!(Status::aggregate(Vec::new()), Status::Ok);
    }

    #[test]
    fn test_aggregate_takes_max() {
        let statuses = vec![Status::Ok, Status::Warning, Status::Ok];
        assert_eq!(Status::aggregate(statuses), Status::Warning);

        let statuses = vec![Status::Critical, Status::Warning];
        assert_eq!(Status::aggregate(statuses), Status::Critical);
    }

    #[test]
    fn test_result_detail() {
        let result = CheckResult::warning("disk", "almost full")
            .with_detail("used_percent", 85.5)
            .with_detail("mount", "/");

        assert_eq!(result.status, Status::Warning);
        let detail = result.detail.unwrap();
        assert_eq!(detail.get("used_percent"), Some(&Scalar::Float(85.5)));
        assert_eq!(detail.get("mount"), Some(&Scalar::Text("/".to_string())));
    }

    #[test]
    fn test_serialization() {
        let result = CheckResult::critical("database", "connection refused");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"critical\""));
        assert!(!json.contains("detail"));

        let reading = MetricReading::failed("cpu_load", "unsupported");
        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("unsupported"));
        assert!(!json.contains("\"value\""));
    }
}
