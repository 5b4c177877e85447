use std::fmt;

use log::{debug, warn};

/// 应用生命周期阶段，只能按声明顺序逐步前进
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Starting,
    Running,
    ShuttingDown,
    Terminated,
}

impl LifecycleState {
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::Starting),
            Self::Starting => Some(Self::Running),
            Self::Running => Some(Self::ShuttingDown),
            Self::ShuttingDown => Some(Self::Terminated),
            Self::Terminated => None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "Uninitialized",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::ShuttingDown => "ShuttingDown",
            Self::Terminated => "Terminated",
        };
        f.write_str(name)
    }
}

/// 当前阶段及已经历阶段的有序记录
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
    history: Vec<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            history: vec![LifecycleState::Uninitialized],
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    /// 仅当 `next` 是当前阶段的直接后继时才迁移
    pub fn advance(&mut self, next: LifecycleState) -> bool {
        if self.state.successor() != Some(next) {
            warn!("忽略非法的生命周期迁移: {} -> {}", self.state, next);
            return false;
        }
        debug!("生命周期: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
        true
    }
}
