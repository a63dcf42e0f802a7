/// 必需环境变量检查

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// 环境变量检查，缺失或为空的变量都视为缺失
pub struct EnvCheck {
    required: Vec<String>,
    lookup: Lookup,
}

impl EnvCheck {
    /// 从进程环境读取
    pub fn new(required: Vec<String>) -> Self {
        Self::with_lookup(required, |key| std::env::var(key).ok())
    }

    /// 使用自定义来源读取
    pub fn with_lookup<F>(required: Vec<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            required,
            lookup: Box::new(lookup),
        }
    }

    fn missing(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|key| (self.lookup)(key).map_or(true, |v| v.trim().is_empty()))
            .map(String::as_str)
            .collect()
    }
}

#[async_trait]
impl Check for EnvCheck {
    fn name(&self) -> &str {
        "env"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(CheckResult::ok(
                self.name(),
                format!("All {} required variables are set", self.required.len()),
            ));
        }

        Ok(CheckResult::critical(
            self.name(),
            format!("Missing environment variables: {}", missing.join(", ")),
        )
        .with_detail("missing", missing.len() as u64))
    }
}
