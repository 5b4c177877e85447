use std::fmt;

use super::constants::MAX_NAME_LENGTH;
use super::nation::NationId;
use super::strategy::Strategy;
use super::world_map::WorldMap;

/// 某一时刻国家状态的只读摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationSummary {
    pub id: NationId,
    pub name: String,
    pub strategy: Strategy,
    pub province_count: usize,
    pub total_development: i32,
    pub army: i32,
}

/// 发布给订阅者的整局快照，可跨线程传递
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub turn: u32,
    pub map: WorldMap,
    pub nations: Vec<NationSummary>,
}

impl GameSnapshot {
    pub fn nation(&self, id: NationId) -> Option<&NationSummary> {
        self.nations.iter().find(|n| n.id == id)
    }
}

impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n=== Universalis Map snapshot ===\n")?;
        for y in 0..self.map.height() {
            for x in 0..self.map.width() {
                let Some(province) = self.map.province(x, y) else {
                    continue;
                };
                let owner = province
                    .owner()
                    .and_then(|id| self.nation(id))
                    .map_or(".", |n| n.name.as_str());
                let owner: String = owner.chars().take(MAX_NAME_LENGTH).collect();
                write!(f, "{:2}:{:<10} ", province.development(), owner)?;
            }
            writeln!(f)?;
        }

        write!(f, "\n=== Nations ===\n")?;
        for nation in &self.nations {
            writeln!(
                f,
                "{} - provinces={}, totalDev={}, army={}",
                nation.name, nation.province_count, nation.total_development, nation.army
            )?;
        }
        write!(f, "===============================")
    }
}

/// 一局游戏的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub turns: u32,
    /// 剩余国家中的第一个；僵局时同样取第一个
    pub winner: Option<String>,
    /// 结束时领土连续无变化的回合数
    pub idle_turns: u32,
    pub stalemate: bool,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TurnCompleted(GameSnapshot),
    GameFinished {
        snapshot: GameSnapshot,
        outcome: GameOutcome,
    },
}

impl GameEvent {
    pub fn snapshot(&self) -> &GameSnapshot {
        match self {
            GameEvent::TurnCompleted(snapshot) => snapshot,
            GameEvent::GameFinished { snapshot, .. } => snapshot,
        }
    }
}

pub type Subscriber = Box<dyn FnMut(&GameEvent) + Send>;

/// 游戏实例私有的事件总线，按订阅顺序同步派发
#[derive(Default)]
pub struct GameEventBus {
    subscribers: Vec<Subscriber>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, event: &GameEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world_map::MapBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::{Arc, Mutex};

    fn empty_snapshot(turn: u32) -> GameSnapshot {
        let mut rng = StdRng::seed_from_u64(9);
        let map = MapBuilder::new(&mut rng)
            .create(2)
            .and_then(|b| b.build())
            .unwrap();
        GameSnapshot {
            turn,
            map,
            nations: Vec::new(),
        }
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = GameEventBus::new();

        let first = Arc::clone(&log);
        bus.subscribe(move |event| first.lock().unwrap().push(("first", event.snapshot().turn)));
        let second = Arc::clone(&log);
        bus.subscribe(move |event| second.lock().unwrap().push(("second", event.snapshot().turn)));
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(&GameEvent::TurnCompleted(empty_snapshot(1)));
        bus.publish(&GameEvent::TurnCompleted(empty_snapshot(2)));

        assert_eq!(
            *log.lock().unwrap(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );
    }

    #[test]
    fn snapshot_text_truncates_long_names() {
        let mut snapshot = empty_snapshot(0);
        let id = NationId(0);
        snapshot
            .map
            .province_mut(0, 0)
            .unwrap()
            .set_owner(Some(id));
        snapshot.nations.push(NationSummary {
            id,
            name: "Antarctica Confederacy".to_string(),
            strategy: Strategy::NoOp,
            province_count: 1,
            total_development: 2,
            army: 2,
        });

        let text = snapshot.to_string();
        assert!(text.starts_with("\n=== Universalis Map snapshot ===\n"));
        assert!(text.contains(":Antarctica "));
        assert!(!text.contains(":Antarctica C"));
        assert!(text.contains("Antarctica Confederacy - provinces=1, totalDev=2, army=2\n"));
        assert!(text.ends_with("==============================="));
    }
}
