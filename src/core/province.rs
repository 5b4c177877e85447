use rand::Rng;

use super::constants::{MAX_DEV, MAX_STARTING_DEV, MIN_DEV};
use super::nation::NationId;

/// 地图上的单个省份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Province {
    development: i32,
    owner: Option<NationId>,
}

impl Province {
    /// 以给定发展度创建无主省份，不做范围限制
    pub fn new(development: i32) -> Self {
        Self {
            development,
            owner: None,
        }
    }

    /// 随机初始发展度的无主省份
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(MIN_DEV + rng.random_range(0..MAX_STARTING_DEV))
    }

    pub fn development(&self) -> i32 {
        self.development
    }

    pub fn owner(&self) -> Option<NationId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<NationId>) {
        self.owner = owner;
    }

    pub fn is_owned_by(&self, nation: NationId) -> bool {
        self.owner == Some(nation)
    }

    /// 调整发展度，结果限制在 [MIN_DEV, MAX_DEV]
    pub fn change_development(&mut self, delta: i32) {
        self.development = (self.development + delta).clamp(MIN_DEV, MAX_DEV);
    }
}
