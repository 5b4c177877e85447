use env_logger::Env;

/// 初始化日志，RUST_LOG 未设置时默认 info 级别
///
/// 例如 `RUST_LOG=universalis=debug universalis --headless`
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
