use thiserror::Error;

/// 事件循环结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseSignal {
    /// 用户点击窗口关闭按钮或系统请求关闭
    WindowClosed,
    /// 应用内部的退出操作（菜单或快捷键）
    QuitRequested,
}

/// 主窗口参数
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// 本进程已经运行过事件循环
    #[error("GUI事件循环在本进程中已被占用")]
    AlreadyClaimed,

    /// 窗口显示之前失败
    #[error("GUI运行时初始化失败: {0}")]
    Init(String),

    /// 窗口显示之后事件循环出错
    #[error("GUI事件循环出错: {0}")]
    Loop(String),
}

/// GUI工具包适配层
///
/// `run` 创建唯一的主窗口并阻塞调用线程直到收到关闭信号。
/// 主窗口构建完成、即将进入事件循环时，实现方必须在调用线程上恰好调用一次 `on_shown`。
pub trait GuiRuntime {
    /// 本进程是否还能创建事件循环；为 false 时 `Launcher::start` 不改变状态
    fn is_available(&self) -> bool {
        true
    }


    fn run(
        &mut self,
        window: &WindowSpec,
        on_shown: &mut dyn FnMut(),
    ) -> Result<CloseSignal, RuntimeError>;
}
