use clap::Parser;
use log::info;

use super::app_settings::AppSettings;
use super::config_loader::TomlConfigLoader;

const EXAMPLE_CONFIG_PATH: &str = "universalis_example.toml";

/// 命令行参数 - 只负责配置文件和运行模式
#[derive(Parser, Debug)]
#[command(name = "universalis")]
#[command(about = "Mini Universalis - 回合制领土模拟")]
pub struct SimpleCli {
    /// 配置文件路径（TOML格式）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 无头模式：不打开窗口，在终端打印每回合快照
    #[arg(long)]
    pub headless: bool,

    /// 生成示例配置文件并加载
    #[arg(long)]
    pub use_example_config: bool,

    /// 覆盖配置中的随机种子
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SimpleCli {
    /// 解析进程参数，返回设置和是否启动GUI
    pub fn process() -> Result<(AppSettings, bool), String> {
        Self::parse().resolve()
    }

    pub fn resolve(&self) -> Result<(AppSettings, bool), String> {
        let mut settings = if self.use_example_config {
            TomlConfigLoader::create_example_config(EXAMPLE_CONFIG_PATH)?;
            info!("已创建示例配置: {}", EXAMPLE_CONFIG_PATH);
            TomlConfigLoader::load_from_file(EXAMPLE_CONFIG_PATH)
                .map_err(|e| format!("加载示例配置失败: {}", e))?
        } else if let Some(config_path) = &self.config {
            info!("加载配置文件: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("配置文件加载失败: {}", e))?
        } else {
            info!("使用默认设置");
            AppSettings::default()
        };

        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        settings.validate()?;

        Ok((settings, !self.headless))
    }
}
