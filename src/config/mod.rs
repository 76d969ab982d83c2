pub mod load;
pub mod types;

pub use types::{
    Config, EngineSettings, MAX_CLEANUP_GRACE_MS, MAX_DEBOUNCE_MS, MAX_TIMEOUT_SECS,
    OVERRIDE_FILE_NAME, PreviewConfig,
};
