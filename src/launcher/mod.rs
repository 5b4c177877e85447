// 启动器：生命周期状态机与GUI运行时适配接口
pub mod error;
#[allow(clippy::module_inception)]
pub mod launcher;
pub mod lifecycle;
pub mod runtime;

pub use error::LaunchError;
pub use launcher::{Launcher, launch};
pub use lifecycle::LifecycleState;
pub use runtime::{CloseSignal, GuiRuntime, RuntimeError, WindowSpec};
