use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("启动器已经启动过，不能重复初始化GUI运行时")]
    AlreadyStarted,

    #[error("无法创建主窗口: {0}")]
    RuntimeInitialization(String),

    #[error("主窗口运行期间事件循环失败: {0}")]
    EventLoop(String),
}
