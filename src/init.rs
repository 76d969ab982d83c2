use env_logger::Env;

/// 初始化日誌系統，預設等級 info，可用 `RUST_LOG` 覆寫
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
