use thiserror::Error;

/// 模拟核心的错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("地图尺寸无效: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("地图边长必须大于0")]
    InvalidMapSize,

    #[error("地图边长 {size} 超出上限")]
    MapTooLarge { size: usize },

    #[error("国家数量必须大于0")]
    InvalidNationCount,

    #[error("国家数量 {nations} 超过地图格子数 {tiles}")]
    TooManyNations { nations: usize, tiles: usize },

    #[error("地图尚未创建，请先调用 create")]
    NotCreated,

    #[error("所有国家名称组合已用尽")]
    NamesExhausted,
}
