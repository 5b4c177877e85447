use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};

use egui::{Align2, Color32, FontId, Rect, RichText, Sense, Stroke, StrokeKind, Vec2};
use log::{debug, error, info};

use super::palette::{UNOWNED_COLOR, nation_color};
use super::simulation::{SimulationHandle, spawn_simulation};
use crate::core::{GameEvent, GameOutcome, GameSnapshot};
use crate::io::AppSettings;
use crate::launcher::CloseSignal;

const LEGEND_WIDTH: f32 = 200.0;
const SWATCH_SIZE: f32 = 15.0;

/// 主窗口内容：地图、图例和结束画面
pub struct UniversalisApp {
    // ===== 配置 =====
    pub settings: AppSettings,

    // ===== 模拟线程 =====
    receiver: Receiver<GameEvent>,
    simulation: Option<SimulationHandle>,
    stop_flag: Arc<AtomicBool>,

    // ===== 界面状态 =====
    /// 最近一次收到的快照
    pub snapshot: Option<GameSnapshot>,
    pub outcome: Option<GameOutcome>,
    pub status_message: String,

    /// 与运行时共享，记录窗口因何关闭
    close_signal: Rc<Cell<CloseSignal>>,
}

impl UniversalisApp {
    pub fn new(
        settings: AppSettings,
        cc: &eframe::CreationContext<'_>,
        close_signal: Rc<Cell<CloseSignal>>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let (simulation, status_message) = match spawn_simulation(
            settings.clone(),
            sender,
            cc.egui_ctx.clone(),
            Arc::clone(&stop_flag),
        ) {
            Ok(handle) => (Some(handle), "Preparing map...".to_string()),
            Err(e) => {
                error!("无法启动模拟线程: {}", e);
                (None, format!("Failed to start simulation: {e}"))
            }
        };

        Self {
            settings,
            receiver,
            simulation,
            stop_flag,
            snapshot: None,
            outcome: None,
            status_message,
            close_signal,
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                GameEvent::TurnCompleted(snapshot) => {
                    self.status_message = format!(
                        "Turn {} - {} nations remaining",
                        snapshot.turn,
                        snapshot.nations.len()
                    );
                    self.snapshot = Some(snapshot);
                }
                GameEvent::GameFinished { snapshot, outcome } => {
                    self.status_message = if outcome.stalemate {
                        format!("Stalemate after {} turns", outcome.turns)
                    } else {
                        format!("Finished after {} turns", outcome.turns)
                    };
                    self.snapshot = Some(snapshot);
                    self.outcome = Some(outcome);
                }
            }
        }
    }

    /// 模拟线程结束后回收句柄并报告错误
    fn check_simulation(&mut self) {
        if !self.simulation.as_ref().is_some_and(|h| h.is_finished()) {
            return;
        }
        let Some(handle) = self.simulation.take() else {
            return;
        };
        match handle.join() {
            Ok(Ok(outcome)) => debug!("模拟线程结束: {:?}", outcome),
            Ok(Err(message)) => {
                error!("模拟失败: {}", message);
                self.status_message = format!("Simulation failed: {message}");
            }
            Err(_) => {
                error!("模拟线程崩溃");
                self.status_message = "Simulation thread panicked".to_string();
            }
        }
    }

    fn request_quit(&self, ctx: &egui::Context) {
        info!("收到退出请求");
        self.close_signal.set(CloseSignal::QuitRequested);
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn draw_map(&self, ui: &mut egui::Ui, snapshot: &GameSnapshot) {
        let tile = self.settings.tile_size;
        let map = &snapshot.map;
        let size = Vec2::new(map.width() as f32 * tile, map.height() as f32 * tile);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let origin = response.rect.min;

        for (x, y) in map.coordinates() {
            let Some(province) = map.province(x, y) else {
                continue;
            };
            let rect = Rect::from_min_size(
                origin + Vec2::new(x as f32 * tile, y as f32 * tile),
                Vec2::splat(tile),
            );
            let owner = province.owner().and_then(|id| snapshot.nation(id));
            let fill = owner.map_or(UNOWNED_COLOR, |n| nation_color(&n.name));

            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::BLACK), StrokeKind::Inside);

            if let Some(initial) = owner.and_then(|n| n.name.chars().next()) {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    initial,
                    FontId::proportional(tile * 0.5),
                    Color32::BLACK,
                );
            }
        }

        if self.outcome.is_some() {
            painter.rect_filled(response.rect, 0.0, Color32::from_black_alpha(178));
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                game_over_message(snapshot),
                FontId::proportional(30.0),
                Color32::WHITE,
            );
        }
    }

    fn draw_legend(&self, ui: &mut egui::Ui, snapshot: &GameSnapshot) {
        ui.heading("Legend");
        ui.add_space(10.0);

        for nation in &snapshot.nations {
            let color = nation_color(&nation.name);
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
                ui.painter().rect_filled(rect, 0.0, color);
                ui.painter().rect_stroke(
                    rect,
                    0.0,
                    Stroke::new(1.0, Color32::BLACK),
                    StrokeKind::Inside,
                );
                ui.label(format!("{} ({})", nation.name, nation.province_count))
                    .on_hover_text(format!(
                        "army={}, totalDev={}, {}",
                        nation.army, nation.total_development, nation.strategy
                    ));
            });
            ui.add_space(4.0);
        }
    }
}

/// 结束画面文字：胜者为剩余国家中的第一个
pub fn game_over_message(snapshot: &GameSnapshot) -> String {
    let mut message = String::from("Game Over");
    match snapshot.nations.first() {
        Some(winner) => {
            message.push_str(&format!("\nWinner: {}", winner.name));
            message.push_str(&format!("\nProvinces: {}", winner.province_count));
            message.push_str(&format!("\nDevelopment: {}", winner.total_development));
        }
        None => message.push_str("\nNo Winner"),
    }
    message
}

impl eframe::App for UniversalisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.check_simulation();

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::Q)) {
            self.request_quit(ctx);
        }
        if ctx.input(|i| i.viewport().close_requested()) {
            debug!("窗口关闭请求: {:?}", self.close_signal.get());
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.settings.window_title);
                ui.separator();
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Quit").clicked() {
                        self.request_quit(ctx);
                    }
                    ui.label("Ctrl+Q: quit");
                });
            });
        });

        let Some(snapshot) = self.snapshot.as_ref() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(100.0);
                    ui.label(
                        RichText::new("Waiting for the first turn...")
                            .size(24.0)
                            .color(Color32::GRAY),
                    );
                });
            });
            return;
        };

        egui::SidePanel::right("legend_panel")
            .exact_width(LEGEND_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_legend(ui, snapshot));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| self.draw_map(ui, snapshot));
        });
    }
}

impl Drop for UniversalisApp {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.simulation.take() {
            if handle.join().is_err() {
                error!("模拟线程在退出时崩溃");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::NationSummary;
    use crate::core::nation::NationId;
    use crate::core::strategy::Strategy;
    use crate::core::world_map::MapBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snapshot(nations: Vec<NationSummary>) -> GameSnapshot {
        let mut rng = StdRng::seed_from_u64(0);
        GameSnapshot {
            turn: 12,
            map: MapBuilder::new(&mut rng)
                .create(2)
                .and_then(|b| b.build())
                .unwrap(),
            nations,
        }
    }

    #[test]
    fn game_over_names_the_first_remaining_nation() {
        let winner = NationSummary {
            id: NationId(3),
            name: "Nepal Clan".to_string(),
            strategy: Strategy::Offensive,
            province_count: 4,
            total_development: 17,
            army: 40,
        };
        assert_eq!(
            game_over_message(&snapshot(vec![winner])),
            "Game Over\nWinner: Nepal Clan\nProvinces: 4\nDevelopment: 17"
        );
    }

    #[test]
    fn game_over_without_nations() {
        assert_eq!(game_over_message(&snapshot(Vec::new())), "Game Over\nNo Winner");
    }
}
