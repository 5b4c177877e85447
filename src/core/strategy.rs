use std::fmt;

use rand::Rng;

use super::constants::{AMOUNT_TO_INCREASE_DEVELOPMENT, CHANCE_OF_INCREASING_DEVELOPMENT};
use super::game::Universalis;
use super::nation::NationId;

/// 国家每回合采用的行动策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// 什么也不做，仅在回合末扩军
    #[default]
    NoOp,
    /// 扩张到空地，没有空地时进攻邻国
    Offensive,
    /// 随机提升本国省份发展度
    Defensive,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::NoOp, Strategy::Offensive, Strategy::Defensive];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn execute(self, nation: NationId, game: &mut Universalis) {
        match self {
            Strategy::NoOp => {}
            Strategy::Offensive => game.expand_or_attack(nation),
            Strategy::Defensive => develop_provinces(nation, game),
        }
    }
}

fn develop_provinces(nation: NationId, game: &mut Universalis) {
    let Some(provinces) = game.nation(nation).map(|n| n.provinces().to_vec()) else {
        return;
    };
    for coord in provinces {
        if game.rng_mut().random::<f64>() < CHANCE_OF_INCREASING_DEVELOPMENT {
            if let Some(province) = game.map_mut().province_at_mut(coord) {
                province.change_development(AMOUNT_TO_INCREASE_DEVELOPMENT);
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strategy::NoOp => "NoOp Strategy",
            Strategy::Offensive => "Offensive Strategy",
            Strategy::Defensive => "Defensive Strategy",
        };
        f.write_str(label)
    }
}
