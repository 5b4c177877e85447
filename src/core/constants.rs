//! 模拟规则常量

// ===== 国家 =====
pub const MINIMUM_ARMY_SIZE: i32 = 1;
pub const ARMY_GROWTH_MODIFIER: i32 = 5;
pub const ARMY_CAP_MODIFIER: i32 = 8;
pub const ARMY_LOSS_FACTOR: i32 = 2;
pub const CAPTURE_DEVELOPMENT_PENALTY: i32 = -1;
/// 军队低于上限的该比例时视为兵力不足
pub const LOW_ARMY_RATIO: f64 = 0.2;

// ===== 省份 =====
pub const MIN_DEV: i32 = 0;
pub const MAX_DEV: i32 = 25;
/// 随机省份的初始发展度取值范围为 [MIN_DEV, MIN_DEV + MAX_STARTING_DEV)
pub const MAX_STARTING_DEV: i32 = 3;

// ===== 防御策略 =====
pub const CHANCE_OF_INCREASING_DEVELOPMENT: f64 = 0.25;
pub const AMOUNT_TO_INCREASE_DEVELOPMENT: i32 = 1;

// ===== 回合引擎 =====
pub const DEVELOPMENT_PROVINCE_FACTOR: usize = 2;
pub const INCREASE_DEVELOPMENT_VALUE: i32 = 1;
/// 领土总数连续不变的回合数达到该值即判定僵局
pub const MAX_IDLE_TURNS: u32 = 250;
/// 地图边长上限
pub const MAX_MAP_SIZE: usize = 1000;
/// 快照中国家名称的最大显示长度
pub const MAX_NAME_LENGTH: usize = 10;

/// 四邻域方向 (dx, dy)，顺序决定扫描顺序
pub const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
