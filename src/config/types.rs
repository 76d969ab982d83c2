use crate::component::composition_planner::{CompositionOptions, ScaleFactor};
use crate::component::preview_scheduler::PreviewSettings;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 覆寫設定檔名稱（工作目錄下，唯讀）
pub const OVERRIDE_FILE_NAME: &str = "image_merger.json";

/// 外部程序逾時上限（秒）
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;
/// 去抖動等待上限（毫秒）
pub const MAX_DEBOUNCE_MS: u64 = 60_000;
/// 預覽暫存檔保留上限（毫秒）
pub const MAX_CLEANUP_GRACE_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub binary: String,
    pub merge_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            binary: "magick".to_string(),
            merge_timeout_secs: 120,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub const fn merge_timeout(&self) -> Duration {
        Duration::from_secs(self.merge_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() {
            bail!("影像引擎路徑不可為空");
        }
        check_range("engine.merge_timeout_secs", self.merge_timeout_secs, 1, MAX_TIMEOUT_SECS)
    }
}

fn check_range(field: &str, value: u64, min: u64, max: u64) -> Result<()> {
    if !(min..=max).contains(&value) {
        bail!("{field} 必須介於 {min} 與 {max} 之間: {value}");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub debounce_ms: u64,
    pub render_timeout_secs: u64,
    pub cleanup_grace_ms: u64,
    pub scale: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            render_timeout_secs: 30,
            cleanup_grace_ms: 5000,
            scale: 0.5,
        }
    }
}

impl PreviewConfig {
    pub fn to_settings(&self) -> Result<PreviewSettings> {
        let Some(scale) = ScaleFactor::new(self.scale) else {
            bail!("預覽倍率必須介於 0 與 1 之間: {}", self.scale);
        };
        check_range("preview.debounce_ms", self.debounce_ms, 0, MAX_DEBOUNCE_MS)?;
        check_range(
            "preview.render_timeout_secs",
            self.render_timeout_secs,
            1,
            MAX_TIMEOUT_SECS,
        )?;
        check_range(
            "preview.cleanup_grace_ms",
            self.cleanup_grace_ms,
            0,
            MAX_CLEANUP_GRACE_MS,
        )?;

        Ok(PreviewSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            render_timeout: Duration::from_secs(self.render_timeout_secs),
            cleanup_grace: Duration::from_millis(self.cleanup_grace_ms),
            scale,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSettings,
    pub preview: PreviewConfig,
    /// 每次啟動時的預設合成選項
    pub defaults: CompositionOptions,
}
