/// 时钟抽象
///
/// 心跳的写入方和读取方必须使用同一个时钟来源，
/// 过期判断只比较 `now - timestamp`。
///
/// - `SystemClock`: 生产环境使用的系统时钟
/// - `ManualClock`: 可手动设置的时钟，用于测试和模拟时间推进

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// 时钟
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手动时钟
///
/// 克隆共享同一个时间点。
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// 设置当前时间
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.write() = at;
    }

    /// 时间前进
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// 共享时钟句柄
pub type SharedClock = Arc<dyn Clock>;

/// 默认系统时钟句柄
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}
