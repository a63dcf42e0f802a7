/// 心跳存储实现
///
/// - `file`: 多进程共享目录中的文件存储（生产环境）
/// - `memory`: 进程内存储（单进程宿主和测试）

pub mod file;
pub mod memory;

pub use file::FileHeartbeatStore;
pub use memory::InMemoryHeartbeatStore;
