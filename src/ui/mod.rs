// UI模块：eframe运行时适配与主窗口
pub mod app;
pub mod eframe_runtime;
pub mod palette;
pub mod simulation;

pub use app::UniversalisApp;
pub use eframe_runtime::EframeRuntime;
