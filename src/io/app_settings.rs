use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::constants::{MAX_IDLE_TURNS, MAX_MAP_SIZE};
use crate::launcher::WindowSpec;

/// 所有可通过TOML配置的参数
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    // ===== [game] =====
    /// 正方形地图边长
    pub map_size: usize,
    /// 开局国家数量
    pub nations: usize,
    /// GUI模式下每回合之间的等待毫秒数
    pub turn_delay_ms: u64,
    /// 判定僵局的连续空闲回合数，0 表示关闭检测
    pub max_idle_turns: u32,
    /// 固定随机种子，None 时使用系统熵
    pub seed: Option<u64>,

    // ===== [window] =====
    pub window_title: String,
    pub window_width: f32,
    pub window_height: f32,
    /// 每个省份格子的像素边长
    pub tile_size: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            map_size: 40,
            nations: 10,
            turn_delay_ms: 50,
            max_idle_turns: MAX_IDLE_TURNS,
            seed: None,

            window_title: "Mini Universalis".to_string(),
            window_width: 1000.0,
            window_height: 800.0,
            tile_size: 20.0,
        }
    }
}

impl AppSettings {
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            title: self.window_title.clone(),
            inner_size: [self.window_width, self.window_height],
            min_inner_size: [400.0, 300.0],
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.map_size == 0 {
            return Err("错误: 地图边长必须大于0".to_string());
        }
        if self.map_size > MAX_MAP_SIZE {
            return Err(format!(
                "错误: 地图边长 {} 超过上限 {}",
                self.map_size, MAX_MAP_SIZE
            ));
        }
        if self.nations == 0 {
            return Err("错误: 国家数量必须大于0".to_string());
        }
        let tiles = self
            .map_size
            .checked_mul(self.map_size)
            .ok_or_else(|| format!("错误: 地图边长 {} 过大", self.map_size))?;
        if self.nations > tiles {
            return Err(format!(
                "错误: 国家数量 {} 超过地图格子数 {}",
                self.nations, tiles
            ));
        }
        if self.window_title.trim().is_empty() {
            return Err("错误: 窗口标题不能为空".to_string());
        }
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return Err("错误: 窗口宽度和高度必须大于0".to_string());
        }
        if self.tile_size <= 0.0 {
            return Err("错误: 格子尺寸必须大于0".to_string());
        }
        Ok(())
    }
}
