/// 生产环境禁止调试模式

use crate::domain::check::{Check, CheckError};
use crate::domain::status::CheckResult;
use async_trait::async_trait;

const PRODUCTION: &str = "production";

pub struct DebugModeCheck {
    debug: bool,
    environment: String,
}

impl DebugModeCheck {
    pub fn new(debug: bool, environment: impl Into<String>) -> Self {
        Self {
            debug,
            environment: environment.into(),
        }
    }
}

#[async_trait]
impl Check for DebugModeCheck {
    fn name(&self) -> &str {
        "debug_mode"
    }

    async fn run(&self) -> Result<CheckResult, CheckError> {
        let production = self.environment.eq_ignore_ascii_case(PRODUCTION);
        let result = if self.debug && production {
            CheckResult::critical(self.name(), "Debug mode is enabled in production")
        } else if self.debug {
            CheckResult::ok(
                self.name(),
                format!("Debug mode is enabled ({} environment)", self.environment),
            )
        } else {
            CheckResult::ok(self.name(), "Debug mode is disabled")
        };
        Ok(result
            .with_detail("debug", self.debug)
            .with_detail("environment", self.environment.as_str()))
    }
}
