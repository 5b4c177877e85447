use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::app::UniversalisApp;
use crate::io::AppSettings;
use crate::launcher::{CloseSignal, GuiRuntime, RuntimeError, WindowSpec};

/// winit 不允许同一进程创建第二个事件循环
static EVENT_LOOP_CLAIMED: AtomicBool = AtomicBool::new(false);

/// 基于 eframe 的 GUI 运行时
pub struct EframeRuntime {
    settings: AppSettings,
}

impl EframeRuntime {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings }
    }
}

impl GuiRuntime for EframeRuntime {
    fn is_available(&self) -> bool {
        !EVENT_LOOP_CLAIMED.load(Ordering::SeqCst)
    }

    fn run(
        &mut self,
        window: &WindowSpec,
        on_shown: &mut dyn FnMut(),
    ) -> Result<CloseSignal, RuntimeError> {
        // is_available 与这里之间可能有其他启动器抢先占用
        if EVENT_LOOP_CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(RuntimeError::AlreadyClaimed);
        }

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(window.title.clone())
                .with_inner_size(window.inner_size)
                .with_min_inner_size(window.min_inner_size),
            ..Default::default()
        };

        let shown = Cell::new(false);
        let close_signal = Rc::new(Cell::new(CloseSignal::WindowClosed));
        let app_signal = Rc::clone(&close_signal);
        let settings = self.settings.clone();

        // app创建回调在窗口和渲染上下文建好之后、进入事件循环之前执行。
        // 此时视口仍是隐藏的，eframe 画完第一帧后才显示窗口。
        let result = eframe::run_native(
            &window.title,
            options,
            Box::new(|cc| {
                shown.set(true);
                on_shown();
                Ok(Box::new(UniversalisApp::new(settings, cc, app_signal)))
            }),
        );

        match result {
            Ok(()) => {
                debug!("事件循环正常结束");
                Ok(close_signal.get())
            }
            Err(e) if shown.get() => Err(RuntimeError::Loop(e.to_string())),
            Err(e) => Err(RuntimeError::Init(e.to_string())),
        }
    }
}
