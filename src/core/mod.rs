// 模拟核心：省份、国家、地图、策略与回合引擎
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod name_factory;
pub mod nation;
pub mod province;
pub mod strategy;
pub mod world_map;

pub use error::GameError;
pub use events::{GameEvent, GameOutcome, GameSnapshot};
pub use game::{Universalis, setup_default_game};
