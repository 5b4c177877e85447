use std::io::{self, Write};

use crate::core::{GameOutcome, Universalis};

/// 无界面跑完一局：每回合开始前输出地图快照，结束时输出结果
pub fn play_headless<W: Write>(game: &mut Universalis, out: &mut W) -> io::Result<GameOutcome> {
    let mut written = Ok(());
    let outcome = game.play_to_completion_with(|game| {
        if written.is_ok() {
            written = writeln!(out, "{}", game);
        }
    });
    written?;

    if outcome.stalemate {
        writeln!(
            out,
            "Stalemate detected after {} idle turns. Aborting.",
            outcome.idle_turns
        )?;
    }
    writeln!(out, "Took {} turns.", outcome.turns)?;
    writeln!(
        out,
        "Finished. Winner: {}",
        outcome.winner.as_deref().unwrap_or("None")
    )?;
    Ok(outcome)
}
