use std::io;
use std::process::ExitCode;

use log::error;

use universalis::core::setup_default_game;
use universalis::io::{AppSettings, SimpleCli, play_headless};
use universalis::launcher::{Launcher, launch};
use universalis::ui::EframeRuntime;
use universalis::utils::logging::init_logging;

/// 在终端中跑完一局，每回合开始前打印快照
fn run_headless(settings: &AppSettings) -> ExitCode {
    let mut game = match setup_default_game(settings.map_size, settings.nations, settings.rng()) {
        Ok(game) => game.with_max_idle_turns(settings.max_idle_turns),
        Err(e) => {
            error!("创建对局失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match play_headless(&mut game, &mut io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("输出失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let (settings, start_gui) = match SimpleCli::process() {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if !start_gui {
        return run_headless(&settings);
    }

    let runtime = EframeRuntime::new(settings.clone());
    let mut launcher =
        Launcher::new(runtime, settings.window_spec()).with_args(std::env::args().skip(1));
    launch(&mut launcher)
}
