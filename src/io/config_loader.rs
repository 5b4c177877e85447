use std::path::Path;

use log::warn;
use toml::Value;

use super::app_settings::AppSettings;

/// TOML配置管理器 - 统一处理配置的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<AppSettings, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("读取配置文件失败: {}", e))?;

        Self::load_from_content(&content)
    }

    /// 未出现的键保留默认值
    pub fn load_from_content(content: &str) -> Result<AppSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("解析TOML失败: {}", e))?;

        Self::parse_toml_to_settings(toml_value)
    }

    pub fn save_to_file<P: AsRef<Path>>(settings: &AppSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content).map_err(|e| format!("写入配置文件失败: {}", e))
    }

    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let settings = AppSettings {
            seed: Some(42),
            ..Default::default()
        };
        Self::save_to_file(&settings, path).map_err(|e| format!("创建示例配置失败: {}", e))
    }

    // ===== TOML -> AppSettings =====

    fn parse_toml_to_settings(toml: Value) -> Result<AppSettings, String> {
        let mut settings = AppSettings::default();

        if let Some(game) = toml.get("game").and_then(|v| v.as_table()) {
            Self::parse_game_section(&mut settings, game)?;
        }

        if let Some(window) = toml.get("window").and_then(|v| v.as_table()) {
            Self::parse_window_section(&mut settings, window)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn parse_game_section(settings: &mut AppSettings, game: &toml::Table) -> Result<(), String> {
        if let Some(map_size) = Self::non_negative(game, "map_size")? {
            settings.map_size = usize::try_from(map_size)
                .map_err(|_| format!("map_size 超出范围: {}", map_size))?;
        }
        if let Some(nations) = Self::non_negative(game, "nations")? {
            settings.nations = usize::try_from(nations)
                .map_err(|_| format!("nations 超出范围: {}", nations))?;
        }
        if let Some(delay) = Self::non_negative(game, "turn_delay_ms")? {
            settings.turn_delay_ms = delay as u64;
        }
        if let Some(idle) = Self::non_negative(game, "max_idle_turns")? {
            settings.max_idle_turns = u32::try_from(idle)
                .map_err(|_| format!("max_idle_turns 超出范围: {}", idle))?;
        }
        if let Some(seed) = Self::non_negative(game, "seed")? {
            settings.seed = Some(seed as u64);
        }

        for key in game.keys() {
            if !["map_size", "nations", "turn_delay_ms", "max_idle_turns", "seed"]
                .contains(&key.as_str())
            {
                warn!("[game] 中的未知配置项 '{}' 已忽略", key);
            }
        }
        Ok(())
    }

    fn parse_window_section(
        settings: &mut AppSettings,
        window: &toml::Table,
    ) -> Result<(), String> {
        if let Some(title) = window.get("title") {
            match title.as_str() {
                Some(title) => settings.window_title = title.to_string(),
                None => warn!("window.title 应为字符串，已忽略"),
            }
        }
        if let Some(width) = Self::float(window, "width") {
            settings.window_width = width;
        }
        if let Some(height) = Self::float(window, "height") {
            settings.window_height = height;
        }
        if let Some(tile_size) = Self::float(window, "tile_size") {
            settings.tile_size = tile_size;
        }
        Ok(())
    }

    fn non_negative(table: &toml::Table, key: &str) -> Result<Option<i64>, String> {
        match table.get(key) {
            None => Ok(None),
            Some(value) => match value.as_integer() {
                Some(n) if n >= 0 => Ok(Some(n)),
                Some(n) => Err(format!("{} 不能为负数: {}", key, n)),
                None => Err(format!("{} 应为整数", key)),
            },
        }
    }

    /// 整数和浮点数都接受；类型不符时警告并忽略
    fn float(table: &toml::Table, key: &str) -> Option<f32> {
        let value = table.get(key)?;
        match value.as_float().or_else(|| value.as_integer().map(|n| n as f64)) {
            Some(n) => Some(n as f32),
            None => {
                warn!("window.{} 应为数字，已忽略", key);
                None
            }
        }
    }

    // ===== AppSettings -> TOML =====

    fn settings_to_toml(settings: &AppSettings) -> String {
        let mut content = String::new();

        content.push_str("# Mini Universalis 配置文件\n");
        content.push_str("# 所有键均可省略，省略时使用默认值\n\n");

        content.push_str("[game]\n");
        content.push_str(&format!("map_size = {}\n", settings.map_size));
        content.push_str(&format!("nations = {}\n", settings.nations));
        content.push_str(&format!("turn_delay_ms = {}\n", settings.turn_delay_ms));
        content.push_str(&format!("max_idle_turns = {}\n", settings.max_idle_turns));
        match settings.seed {
            Some(seed) => content.push_str(&format!("seed = {}\n", seed)),
            None => content.push_str("# seed = 42  # 可选：固定随机种子以复现对局\n"),
        }
        content.push('\n');

        content.push_str("[window]\n");
        content.push_str(&format!("title = {:?}\n", settings.window_title));
        content.push_str(&format!("width = {:.1}\n", settings.window_width));
        content.push_str(&format!("height = {:.1}\n", settings.window_height));
        content.push_str(&format!("tile_size = {:.1}\n", settings.tile_size));

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_defaults() {
        let settings = TomlConfigLoader::load_from_content("").unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn parses_both_sections() {
        let content = r#"
            [game]
            map_size = 12
            nations = 4
            turn_delay_ms = 0
            max_idle_turns = 30
            seed = 7

            [window]
            title = "Test Map"
            width = 640
            height = 480.5
            tile_size = 16.0
        "#;
        let settings = TomlConfigLoader::load_from_content(content).unwrap();
        assert_eq!(settings.map_size, 12);
        assert_eq!(settings.nations, 4);
        assert_eq!(settings.turn_delay_ms, 0);
        assert_eq!(settings.max_idle_turns, 30);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.window_title, "Test Map");
        assert_eq!(settings.window_width, 640.0);
        assert_eq!(settings.window_height, 480.5);
        assert_eq!(settings.tile_size, 16.0);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(TomlConfigLoader::load_from_content("[game]\nmap_size = -1\n").is_err());
        assert!(TomlConfigLoader::load_from_content("[game]\nmap_size = 5000000000\n").is_err());
        assert!(TomlConfigLoader::load_from_content("[game]\nnations = \"ten\"\n").is_err());
        assert!(TomlConfigLoader::load_from_content("[game]\nmap_size = 2\nnations = 5\n").is_err());
        assert!(TomlConfigLoader::load_from_content("[game\n").is_err());
    }

    #[test]
    fn wrongly_typed_window_values_are_ignored() {
        let settings =
            TomlConfigLoader::load_from_content("[window]\nwidth = \"wide\"\ntitle = 3\n").unwrap();
        assert_eq!(settings.window_width, AppSettings::default().window_width);
        assert_eq!(settings.window_title, AppSettings::default().window_title);
    }

    #[test]
    fn generated_toml_loads_back() {
        let settings = AppSettings {
            map_size: 9,
            nations: 3,
            seed: Some(5),
            window_title: "Quoted \"Title\"".to_string(),
            ..Default::default()
        };
        let content = TomlConfigLoader::settings_to_toml(&settings);
        let loaded = TomlConfigLoader::load_from_content(&content).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn example_config_is_written_to_disk() {
        let path = std::env::temp_dir().join(format!(
            "universalis_example_{}.toml",
            std::process::id()
        ));
        TomlConfigLoader::create_example_config(&path).unwrap();
        let loaded = TomlConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(loaded.seed, Some(42));
        let _ = std::fs::remove_file(&path);
    }
}
