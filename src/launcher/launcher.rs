use std::process::ExitCode;

use log::{error, info, warn};

use super::error::LaunchError;
use super::lifecycle::{Lifecycle, LifecycleState};
use super::runtime::{CloseSignal, GuiRuntime, RuntimeError, WindowSpec};

/// 进程入口：启动GUI运行时、创建主窗口并驻留在事件循环中
///
/// 生命周期状态由启动器实例独占，只在调用 `start` 的线程上修改。
pub struct Launcher<R: GuiRuntime> {
    runtime: R,
    window: WindowSpec,
    args: Vec<String>,
    lifecycle: Lifecycle,
}

impl<R: GuiRuntime> Launcher<R> {
    pub fn new(runtime: R, window: WindowSpec) -> Self {
        Self {
            runtime,
            window,
            args: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// 平台传入的进程参数，可以为空
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.args = args.into_iter().collect();
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn history(&self) -> &[LifecycleState] {
        self.lifecycle.history()
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// 阻塞直到主窗口关闭
    ///
    /// 成功时生命周期走完 Starting -> Running -> ShuttingDown -> Terminated
    /// 并返回关闭信号。窗口未能显示时停留在 Starting。
    /// 同一实例重复调用返回 `AlreadyStarted`，状态保持不变。
    pub fn start(&mut self) -> Result<CloseSignal, LaunchError> {
        if self.lifecycle.state() != LifecycleState::Uninitialized {
            warn!("重复调用start，当前状态: {}", self.lifecycle.state());
            return Err(LaunchError::AlreadyStarted);
        }
        if !self.runtime.is_available() {
            warn!("本进程的GUI事件循环已被占用");
            return Err(LaunchError::AlreadyStarted);
        }

        self.lifecycle.advance(LifecycleState::Starting);
        info!("正在启动GUI: {} (参数 {:?})", self.window.title, self.args);

        let lifecycle = &mut self.lifecycle;
        let result = self.runtime.run(&self.window, &mut || {
            if lifecycle.advance(LifecycleState::Running) {
                info!("主窗口已显示");
            }
        });

        match result {
            Ok(signal) if self.lifecycle.state() == LifecycleState::Running => {
                self.shut_down();
                info!("GUI正常退出: {:?}", signal);
                Ok(signal)
            }
            Ok(_) => {
                let message = "运行时在主窗口显示前退出".to_string();
                error!("{}", message);
                Err(LaunchError::RuntimeInitialization(message))
            }
            Err(RuntimeError::AlreadyClaimed) => {
                error!("本进程已运行过GUI事件循环");
                Err(LaunchError::AlreadyStarted)
            }
            Err(RuntimeError::Loop(message))
                if self.lifecycle.state() == LifecycleState::Running =>
            {
                error!("事件循环失败: {}", message);
                self.shut_down();
                Err(LaunchError::EventLoop(message))
            }
            Err(RuntimeError::Init(message) | RuntimeError::Loop(message)) => {
                error!("GUI运行时初始化失败: {}", message);
                Err(LaunchError::RuntimeInitialization(message))
            }
        }
    }

    fn shut_down(&mut self) {
        self.lifecycle.advance(LifecycleState::ShuttingDown);
        self.lifecycle.advance(LifecycleState::Terminated);
    }
}

/// 运行启动器并换算为进程退出码：到达 Terminated 的正常关闭为 0，其余为非0
pub fn launch<R: GuiRuntime>(launcher: &mut Launcher<R>) -> ExitCode {
    match launcher.start() {
        Ok(signal) => {
            info!("已退出 ({:?}), 最终状态: {}", signal, launcher.state());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("启动失败: {} (状态: {})", e, launcher.state());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    /// 按预设脚本运行的假运行时
    enum Script {
        Close(CloseSignal),
        FailBeforeShown(RuntimeError),
        FailAfterShown(String),
        ReturnWithoutShowing,
        ShowTwice,
    }

    struct MockRuntime {
        script: Script,
        available: bool,
        runs: usize,
        windows_shown: usize,
    }

    impl MockRuntime {
        fn new(script: Script) -> Self {
            Self {
                script,
                available: true,
                runs: 0,
                windows_shown: 0,
            }
        }
    }

    impl GuiRuntime for MockRuntime {
        fn is_available(&self) -> bool {
            self.available
        }

        fn run(
            &mut self,
            _window: &WindowSpec,
            on_shown: &mut dyn FnMut(),
        ) -> Result<CloseSignal, RuntimeError> {
            self.runs += 1;
            match &self.script {
                Script::Close(signal) => {
                    self.windows_shown += 1;
                    on_shown();
                    Ok(*signal)
                }
                Script::FailBeforeShown(err) => Err(err.clone()),
                Script::FailAfterShown(message) => {
                    self.windows_shown += 1;
                    on_shown();
                    Err(RuntimeError::Loop(message.clone()))
                }
                Script::ReturnWithoutShowing => Ok(CloseSignal::WindowClosed),
                Script::ShowTwice => {
                    self.windows_shown += 1;
                    on_shown();
                    on_shown();
                    Ok(CloseSignal::QuitRequested)
                }
            }
        }
    }

    fn window() -> WindowSpec {
        WindowSpec {
            title: "Mini Universalis".to_string(),
            inner_size: [1000.0, 800.0],
            min_inner_size: [400.0, 300.0],
        }
    }

    fn launcher(script: Script) -> Launcher<MockRuntime> {
        Launcher::new(MockRuntime::new(script), window())
    }

    #[test]
    fn start_walks_the_full_lifecycle() {
        let mut launcher = launcher(Script::Close(CloseSignal::WindowClosed));
        assert_eq!(launcher.state(), Uninitialized);

        let signal = launcher.start().unwrap();
        assert_eq!(signal, CloseSignal::WindowClosed);
        assert_eq!(launcher.state(), Terminated);
        assert_eq!(
            launcher.history(),
            &[Uninitialized, Starting, Running, ShuttingDown, Terminated]
        );
        assert_eq!(launcher.runtime().windows_shown, 1);
    }

    #[test]
    fn close_signal_is_passed_through() {
        let mut launcher = launcher(Script::Close(CloseSignal::QuitRequested));
        assert_eq!(launcher.start(), Ok(CloseSignal::QuitRequested));
    }

    #[test]
    fn second_start_fails_without_touching_state() {
        let mut launcher = launcher(Script::Close(CloseSignal::WindowClosed));
        launcher.start().unwrap();
        let history = launcher.history().to_vec();

        assert_eq!(launcher.start(), Err(LaunchError::AlreadyStarted));
        assert_eq!(launcher.state(), Terminated);
        assert_eq!(launcher.history(), history.as_slice());
        assert_eq!(launcher.runtime().runs, 1);
    }

    #[test]
    fn second_start_after_failed_init_is_rejected() {
        let mut launcher = launcher(Script::FailBeforeShown(RuntimeError::Init(
            "no display".to_string(),
        )));
        assert!(launcher.start().is_err());
        assert_eq!(launcher.start(), Err(LaunchError::AlreadyStarted));
        assert_eq!(launcher.state(), Starting);
        assert_eq!(launcher.runtime().runs, 1);
    }

    #[test]
    fn init_failure_leaves_state_at_starting() {
        let mut launcher = launcher(Script::FailBeforeShown(RuntimeError::Init(
            "no display".to_string(),
        )));
        assert_eq!(
            launcher.start(),
            Err(LaunchError::RuntimeInitialization("no display".to_string()))
        );
        assert_eq!(launcher.state(), Starting);
        assert_eq!(launcher.history(), &[Uninitialized, Starting]);
        assert_eq!(launcher.runtime().windows_shown, 0);
    }

    #[test]
    fn runtime_exiting_before_window_is_an_init_failure() {
        let mut launcher = launcher(Script::ReturnWithoutShowing);
        assert!(matches!(
            launcher.start(),
            Err(LaunchError::RuntimeInitialization(_))
        ));
        assert_eq!(launcher.state(), Starting);
    }

    #[test]
    fn claimed_event_loop_maps_to_already_started() {
        let mut launcher = launcher(Script::FailBeforeShown(RuntimeError::AlreadyClaimed));
        assert_eq!(launcher.start(), Err(LaunchError::AlreadyStarted));
        assert_eq!(launcher.state(), Starting);
    }

    #[test]
    fn unavailable_runtime_is_rejected_before_starting() {
        let mut runtime = MockRuntime::new(Script::Close(CloseSignal::WindowClosed));
        runtime.available = false;
        let mut launcher = Launcher::new(runtime, window());

        assert_eq!(launcher.start(), Err(LaunchError::AlreadyStarted));
        assert_eq!(launcher.state(), Uninitialized);
        assert_eq!(launcher.history(), &[Uninitialized]);
        assert_eq!(launcher.runtime().runs, 0);
    }

    #[test]
    fn launch_exits_zero_after_orderly_shutdown() {
        let mut launcher = launcher(Script::Close(CloseSignal::WindowClosed));
        assert_eq!(launch(&mut launcher), ExitCode::SUCCESS);
        assert_eq!(launcher.state(), Terminated);
    }

    #[test]
    fn launch_exits_non_zero_when_window_fails() {
        let mut no_window = launcher(Script::FailBeforeShown(RuntimeError::Init(
            "no display".to_string(),
        )));
        assert_eq!(launch(&mut no_window), ExitCode::FAILURE);
        assert_eq!(no_window.state(), Starting);

        let mut broken_loop = launcher(Script::FailAfterShown("surface lost".to_string()));
        assert_eq!(launch(&mut broken_loop), ExitCode::FAILURE);
        assert_eq!(broken_loop.state(), Terminated);
    }

    #[test]
    fn loop_failure_after_shown_still_terminates() {
        let mut launcher = launcher(Script::FailAfterShown("surface lost".to_string()));
        assert_eq!(
            launcher.start(),
            Err(LaunchError::EventLoop("surface lost".to_string()))
        );
        assert_eq!(launcher.state(), Terminated);
        assert_eq!(
            launcher.history(),
            &[Uninitialized, Starting, Running, ShuttingDown, Terminated]
        );
    }

    #[test]
    fn repeated_shown_callback_is_ignored() {
        let mut launcher = launcher(Script::ShowTwice);
        assert_eq!(launcher.start(), Ok(CloseSignal::QuitRequested));
        assert_eq!(
            launcher.history(),
            &[Uninitialized, Starting, Running, ShuttingDown, Terminated]
        );
    }

    #[test]
    fn args_may_be_empty() {
        let launcher = launcher(Script::Close(CloseSignal::WindowClosed));
        assert!(launcher.args().is_empty());
        let launcher = launcher.with_args(vec!["--config".to_string(), "a.toml".to_string()]);
        assert_eq!(launcher.args().len(), 2);
    }
}
