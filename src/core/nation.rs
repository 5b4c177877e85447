use std::fmt;

use super::constants::{
    ARMY_CAP_MODIFIER, ARMY_GROWTH_MODIFIER, ARMY_LOSS_FACTOR, CAPTURE_DEVELOPMENT_PENALTY,
    MINIMUM_ARMY_SIZE,
};
use super::strategy::Strategy;
use super::world_map::{Coord, WorldMap};

/// 国家的稳定标识，在整局游戏中唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NationId(pub usize);

impl fmt::Display for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 参与模拟的国家
///
/// 省份以坐标形式记录，发展度等数值始终从地图读取。
/// 省份的归属（`Province::owner`）由调用方负责同步设置。
#[derive(Debug, Clone)]
pub struct Nation {
    id: NationId,
    name: String,
    strategy: Strategy,
    provinces: Vec<Coord>,
    army: i32,
}

impl Nation {
    pub fn new(id: NationId, name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            id,
            name: name.into(),
            strategy,
            provinces: Vec::new(),
            army: 0,
        }
    }

    pub fn id(&self) -> NationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    pub fn provinces(&self) -> &[Coord] {
        &self.provinces
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    pub fn owns(&self, coord: Coord) -> bool {
        self.provinces.contains(&coord)
    }

    pub fn army(&self) -> i32 {
        self.army
    }

    /// 设置军队规模，不低于 MINIMUM_ARMY_SIZE
    pub fn set_army(&mut self, army: i32) {
        self.army = army.max(MINIMUM_ARMY_SIZE);
    }

    /// 战斗损耗：军队直接减半，不受最小规模限制
    pub(crate) fn suffer_battle_losses(&mut self) {
        self.army /= ARMY_LOSS_FACTOR;
    }

    /// 征服省份：加入领土并对该省施加发展度惩罚。已拥有时不做任何事
    pub fn capture_province(&mut self, coord: Coord, map: &mut WorldMap) -> bool {
        if self.owns(coord) {
            return false;
        }
        let Some(province) = map.province_at_mut(coord) else {
            return false;
        };
        province.change_development(CAPTURE_DEVELOPMENT_PENALTY);
        self.provinces.push(coord);
        true
    }

    /// 开局分配省份，无发展度惩罚
    pub fn add_province_on_setup(&mut self, coord: Coord) -> bool {
        if self.owns(coord) {
            return false;
        }
        self.provinces.push(coord);
        true
    }

    pub fn remove_province(&mut self, coord: Coord) -> bool {
        match self.provinces.iter().position(|&c| c == coord) {
            Some(index) => {
                self.provinces.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn total_development(&self, map: &WorldMap) -> i32 {
        self.provinces
            .iter()
            .filter_map(|&coord| map.province_at(coord))
            .map(|province| province.development())
            .sum()
    }

    pub fn army_cap(&self, map: &WorldMap) -> i32 {
        (ARMY_CAP_MODIFIER * self.total_development(map)).max(MINIMUM_ARMY_SIZE)
    }

    /// 按总发展度扩军，不超过上限；无发展度时不增长
    pub fn grow_army(&mut self, map: &WorldMap) {
        let growth = self.total_development(map);
        if growth <= 0 {
            return;
        }
        let cap = self.army_cap(map);
        self.army = (self.army + growth * ARMY_GROWTH_MODIFIER).min(cap);
    }
}
