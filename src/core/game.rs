use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::constants::{
    ARMY_LOSS_FACTOR, DEVELOPMENT_PROVINCE_FACTOR, INCREASE_DEVELOPMENT_VALUE, LOW_ARMY_RATIO,
    MAX_IDLE_TURNS, MAX_MAP_SIZE,
};
use super::error::GameError;
use super::events::{GameEvent, GameEventBus, GameOutcome, GameSnapshot, NationSummary};
use super::name_factory::NationNameFactory;
use super::nation::{Nation, NationId};
use super::strategy::Strategy;
use super::world_map::{Coord, MapBuilder, WorldMap};

/// 回合制领土模拟引擎
///
/// 持有地图、按回合顺序排列的国家、随机数源和事件总线。
/// 国家在某回合结束时若已失去全部省份则被移除。
pub struct Universalis {
    map: WorldMap,
    nations: Vec<Nation>,
    rng: StdRng,
    bus: GameEventBus,
    turn: u32,
    turn_delay: Duration,
    max_idle_turns: u32,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl Universalis {
    pub fn new(map: WorldMap, nations: Vec<Nation>) -> Self {
        Self::with_rng(map, nations, StdRng::from_os_rng())
    }

    pub fn with_rng(map: WorldMap, nations: Vec<Nation>, rng: StdRng) -> Self {
        Self {
            map,
            nations,
            rng,
            bus: GameEventBus::new(),
            turn: 0,
            turn_delay: Duration::ZERO,
            max_idle_turns: MAX_IDLE_TURNS,
            stop_flag: None,
        }
    }

    /// 两回合之间的等待时间，供界面观察
    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    /// 0 表示不做僵局检测
    pub fn with_max_idle_turns(mut self, turns: u32) -> Self {
        self.max_idle_turns = turns;
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut WorldMap {
        &mut self.map
    }

    pub fn nations(&self) -> &[Nation] {
        &self.nations
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.iter().find(|n| n.id() == id)
    }

    pub fn nation_mut(&mut self, id: NationId) -> Option<&mut Nation> {
        self.nations.iter_mut().find(|n| n.id() == id)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.bus.subscribe(subscriber);
    }

    fn index_of(&self, id: NationId) -> Option<usize> {
        self.nations.iter().position(|n| n.id() == id)
    }

    fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn,
            map: self.map.clone(),
            nations: self
                .nations
                .iter()
                .map(|n| NationSummary {
                    id: n.id(),
                    name: n.name().to_string(),
                    strategy: n.strategy(),
                    province_count: n.province_count(),
                    total_development: n.total_development(&self.map),
                    army: n.army(),
                })
                .collect(),
        }
    }

    // ===== 回合流程 =====

    /// 最多推进 `turns` 回合，只剩一个国家时提前结束
    pub fn run_turns(&mut self, turns: u32) {
        for _ in 0..turns {
            if self.nations.len() <= 1 {
                break;
            }
            self.play_turn();
        }
    }

    /// 一直推进到只剩一个国家、出现僵局或收到停止请求
    pub fn play_to_completion(&mut self) -> GameOutcome {
        self.play_to_completion_with(|_| {})
    }

    /// 同 `play_to_completion`，每回合开始前先以当前局面调用 `before_turn`
    pub fn play_to_completion_with<F>(&mut self, mut before_turn: F) -> GameOutcome
    where
        F: FnMut(&Universalis),
    {
        let start_turn = self.turn;
        let mut idle_turns = 0;
        let mut last_owned = self.total_owned_provinces();
        let mut stalemate = false;
        let mut cancelled = false;

        while self.nations.len() > 1 {
            if self.stop_requested() {
                cancelled = true;
                break;
            }

            before_turn(self);
            self.play_turn();

            let owned = self.total_owned_provinces();
            if owned == last_owned {
                idle_turns += 1;
            } else {
                idle_turns = 0;
            }
            last_owned = owned;

            if self.max_idle_turns > 0 && idle_turns >= self.max_idle_turns {
                warn!("连续 {} 回合领土无变化，判定为僵局", idle_turns);
                stalemate = true;
                break;
            }

            if !self.turn_delay.is_zero() {
                thread::sleep(self.turn_delay);
            }
        }

        let outcome = GameOutcome {
            turns: self.turn - start_turn,
            winner: self.nations.first().map(|n| n.name().to_string()),
            idle_turns,
            stalemate,
            cancelled,
        };
        info!(
            "对局结束: {} 回合, 胜者: {}",
            outcome.turns,
            outcome.winner.as_deref().unwrap_or("None")
        );

        let event = GameEvent::GameFinished {
            snapshot: self.snapshot(),
            outcome: outcome.clone(),
        };
        self.bus.publish(&event);
        outcome
    }

    fn play_turn(&mut self) {
        self.turn += 1;

        // 本回合开始时存活的国家都会行动，即便途中失去全部领土
        let order: Vec<NationId> = self.nations.iter().map(|n| n.id()).collect();
        for id in order {
            self.take_turn(id);
        }

        let before = self.nations.len();
        self.nations.retain(|n| n.province_count() > 0);
        if self.nations.len() != before {
            info!(
                "第 {} 回合: {} 个国家被消灭, 剩余 {}",
                self.turn,
                before - self.nations.len(),
                self.nations.len()
            );
        }

        self.distribute_development_points();
        debug!("第 {} 回合完成", self.turn);

        let event = GameEvent::TurnCompleted(self.snapshot());
        self.bus.publish(&event);
    }

    fn total_owned_provinces(&self) -> usize {
        self.nations.iter().map(|n| n.province_count()).sum()
    }

    /// 每个国家获得 省份数/2 点发展度，逐点随机分配到本国省份
    fn distribute_development_points(&mut self) {
        for nation in &self.nations {
            let points = nation.province_count() / DEVELOPMENT_PROVINCE_FACTOR;
            let provinces = nation.provinces();
            for _ in 0..points {
                if provinces.is_empty() {
                    break;
                }
                let coord = provinces[self.rng.random_range(0..provinces.len())];
                if let Some(province) = self.map.province_at_mut(coord) {
                    province.change_development(INCREASE_DEVELOPMENT_VALUE);
                }
            }
        }
    }

    /// 单个国家的回合：调整策略、执行策略、扩军
    pub fn take_turn(&mut self, id: NationId) {
        let Some(index) = self.index_of(id) else {
            return;
        };

        let nation = &self.nations[index];
        let total_development = nation.total_development(&self.map);
        let cap = nation.army_cap(&self.map);
        let low_army = cap == 0 || f64::from(nation.army()) < LOW_ARMY_RATIO * f64::from(cap);

        if low_army || total_development == 0 {
            self.nations[index].set_strategy(Strategy::Defensive);
        }
        if !self.empty_frontier(id).is_empty() {
            self.nations[index].set_strategy(Strategy::Offensive);
        }
        if self.adjacent_weaker_nation(id).is_some() {
            self.nations[index].set_strategy(Strategy::Offensive);
        }

        let strategy = self.nations[index].strategy();
        strategy.execute(id, self);

        // 策略执行期间不会移除国家，下标仍然有效
        self.nations[index].grow_army(&self.map);
    }

    /// 与本国任一省份相邻的无主格子，去重，按扫描顺序排列
    pub fn empty_frontier(&self, id: NationId) -> Vec<Coord> {
        let mut frontier = Vec::new();
        for coord in self.owned_tiles(id) {
            for neighbor in self.map.neighbors(coord) {
                let unowned = self
                    .map
                    .province_at(neighbor)
                    .is_some_and(|p| p.owner().is_none());
                if unowned && !frontier.contains(&neighbor) {
                    frontier.push(neighbor);
                }
            }
        }
        frontier
    }

    /// 扫描到的第一个军队少于本国的相邻敌国
    pub fn adjacent_weaker_nation(&self, id: NationId) -> Option<NationId> {
        let army = self.nation(id)?.army();
        for coord in self.owned_tiles(id) {
            for neighbor in self.map.neighbors(coord) {
                let Some(defender) = self.map.province_at(neighbor).and_then(|p| p.owner()) else {
                    continue;
                };
                if defender == id {
                    continue;
                }
                if self.nation(defender).is_some_and(|d| army > d.army()) {
                    return Some(defender);
                }
            }
        }
        None
    }

    fn owned_tiles(&self, id: NationId) -> impl Iterator<Item = Coord> + '_ {
        self.map
            .coordinates()
            .filter(move |&c| self.map.province_at(c).is_some_and(|p| p.is_owned_by(id)))
    }

    /// 每次调用只执行一个动作：优先占领空地，否则随机挑一个相邻敌方省份开战
    ///
    /// 进攻方军队更多时夺取省份；无论胜负双方军队都减半，
    /// 防守方减半后不低于最小规模。
    pub fn expand_or_attack(&mut self, id: NationId) {
        if self.index_of(id).is_none() {
            return;
        }

        let mut empty_frontier = Vec::new();
        let mut capture_candidates = Vec::new();
        for coord in self.owned_tiles(id) {
            for neighbor in self.map.neighbors(coord) {
                match self.map.province_at(neighbor).and_then(|p| p.owner()) {
                    None => empty_frontier.push(neighbor),
                    Some(owner) if owner != id => capture_candidates.push(neighbor),
                    Some(_) => {}
                }
            }
        }

        if !empty_frontier.is_empty() {
            let target = empty_frontier[self.rng.random_range(0..empty_frontier.len())];
            self.claim(id, target);
            return;
        }
        if capture_candidates.is_empty() {
            return;
        }

        let target = capture_candidates[self.rng.random_range(0..capture_candidates.len())];
        let defender_index = self
            .map
            .province_at(target)
            .and_then(|p| p.owner())
            .and_then(|owner| self.index_of(owner));
        let Some(defender_index) = defender_index else {
            // 归属国已不存在，直接占领
            self.claim(id, target);
            return;
        };
        let Some(attacker_index) = self.index_of(id) else {
            return;
        };

        let attacker_army = self.nations[attacker_index].army();
        let defender_army = self.nations[defender_index].army();
        if attacker_army > defender_army {
            debug!(
                "{} 从 {} 夺取了 {:?}",
                self.nations[attacker_index].name(),
                self.nations[defender_index].name(),
                target
            );
            self.claim(id, target);
            self.nations[defender_index].remove_province(target);
        }

        self.nations[attacker_index].suffer_battle_losses();
        let defender = &mut self.nations[defender_index];
        defender.set_army(defender.army() / ARMY_LOSS_FACTOR);
    }

    fn claim(&mut self, id: NationId, coord: Coord) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if let Some(province) = self.map.province_at_mut(coord) {
            province.set_owner(Some(id));
        }
        self.nations[index].capture_province(coord, &mut self.map);
    }
}

impl fmt::Display for Universalis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

/// 创建一局可直接运行的默认游戏：随机命名、随机初始策略、随机落点
pub fn setup_default_game(
    size: usize,
    nation_count: usize,
    mut rng: StdRng,
) -> Result<Universalis, GameError> {
    if size == 0 {
        return Err(GameError::InvalidMapSize);
    }
    if nation_count == 0 {
        return Err(GameError::InvalidNationCount);
    }
    let tiles = match size.checked_mul(size) {
        Some(tiles) if size <= MAX_MAP_SIZE => tiles,
        _ => return Err(GameError::MapTooLarge { size }),
    };
    if nation_count > tiles {
        return Err(GameError::TooManyNations {
            nations: nation_count,
            tiles,
        });
    }

    let mut factory = NationNameFactory::new();
    let mut nations = Vec::with_capacity(nation_count);
    for i in 0..nation_count {
        let mut nation = factory.create_nation(NationId(i), &mut rng)?;
        nation.set_strategy(Strategy::random(&mut rng));
        nations.push(nation);
    }

    let map = MapBuilder::new(&mut rng)
        .create(size)?
        .seed_nations(&mut nations)?
        .build()?;

    info!(
        "已创建 {}x{} 地图, {} 个国家",
        map.width(),
        map.height(),
        nations.len()
    );
    Ok(Universalis::with_rng(map, nations, rng))
}
