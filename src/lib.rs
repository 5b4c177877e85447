//! Mini Universalis：回合制领土模拟及其桌面启动器

pub mod core;
pub mod io;
pub mod launcher;
pub mod ui;
pub mod utils;
