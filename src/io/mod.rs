// 配置、命令行与终端输出
pub mod app_settings;
pub mod config_loader;
pub mod headless;
pub mod simple_cli;

pub use app_settings::AppSettings;
pub use config_loader::TomlConfigLoader;
pub use headless::play_headless;
pub use simple_cli::SimpleCli;
