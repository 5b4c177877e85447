use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::{error, info};

use crate::core::{GameEvent, GameOutcome, setup_default_game};
use crate::io::AppSettings;

pub type SimulationHandle = JoinHandle<Result<GameOutcome, String>>;

/// 在后台线程中运行一局游戏，每个事件转发到 `sender` 并唤醒界面
pub fn spawn_simulation(
    settings: AppSettings,
    sender: Sender<GameEvent>,
    ctx: egui::Context,
    stop_flag: Arc<AtomicBool>,
) -> std::io::Result<SimulationHandle> {
    thread::Builder::new()
        .name("simulation".to_string())
        .spawn(move || run_simulation(&settings, sender, ctx, stop_flag))
}

fn run_simulation(
    settings: &AppSettings,
    sender: Sender<GameEvent>,
    ctx: egui::Context,
    stop_flag: Arc<AtomicBool>,
) -> Result<GameOutcome, String> {
    let mut game = setup_default_game(settings.map_size, settings.nations, settings.rng())
        .map_err(|e| {
            error!("创建对局失败: {}", e);
            e.to_string()
        })?
        .with_turn_delay(settings.turn_delay())
        .with_max_idle_turns(settings.max_idle_turns)
        .with_stop_flag(stop_flag);

    // 先推送开局状态
    if sender.send(GameEvent::TurnCompleted(game.snapshot())).is_ok() {
        ctx.request_repaint();
    }

    game.subscribe(move |event| {
        if sender.send(event.clone()).is_ok() {
            ctx.request_repaint();
        }
    });

    let outcome = game.play_to_completion();
    if outcome.cancelled {
        info!("模拟在第 {} 回合被取消", game.turn());
    }
    Ok(outcome)
}
