use std::collections::HashSet;

use rand::Rng;

use super::error::GameError;
use super::nation::{Nation, NationId};
use super::strategy::Strategy;

const BASE_NAMES: [&str; 25] = [
    "France", "Japan", "India", "China", "Brazil", "Norway", "Sweden", "Spain", "Peru", "Mexico",
    "Canada", "Turkey", "Poland", "Greece", "Morocco", "Nepal", "Vietnam", "Thailand", "Australia",
    "England", "Portugal", "Italy", "Indonesia", "Scotland", "Antarctica",
];

const SUFFIXES: [&str; 25] = [
    "County", "Duchy", "Kingdom", "Empire", "Province", "Realm", "Republic", "Federation", "Tribe",
    "Dynasty", "Coalition", "Union", "Confederacy", "Dominion", "Territory", "Colony", "Collective",
    "Clan", "Regime", "League", "Protectorate", "Domain", "March", "Principality", "Faction",
];

/// 生成不重复的 "国名 后缀" 组合
#[derive(Debug, Default)]
pub struct NationNameFactory {
    used: HashSet<String>,
}

impl NationNameFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity() -> usize {
        BASE_NAMES.len() * SUFFIXES.len()
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn next_name<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, GameError> {
        if self.used.len() >= Self::capacity() {
            return Err(GameError::NamesExhausted);
        }
        loop {
            let base = BASE_NAMES[rng.random_range(0..BASE_NAMES.len())];
            let suffix = SUFFIXES[rng.random_range(0..SUFFIXES.len())];
            let name = format!("{base} {suffix}");
            if self.used.insert(name.clone()) {
                return Ok(name);
            }
        }
    }

    /// 以随机名称和 NoOp 策略创建国家
    pub fn create_nation<R: Rng + ?Sized>(
        &mut self,
        id: NationId,
        rng: &mut R,
    ) -> Result<Nation, GameError> {
        let name = self.next_name(rng)?;
        Ok(Nation::new(id, name, Strategy::NoOp))
    }

    pub fn clear_used_names(&mut self) {
        self.used.clear();
    }
}
