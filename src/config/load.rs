use crate::config::types::{Config, OVERRIDE_FILE_NAME};
use anyhow::{Context, Result};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 編譯時嵌入的預設設定（不需要外部檔案）
const DEFAULT_CONFIG_JSON: &str = include_str!("../data/default_config.json");

impl Config {
    /// 載入嵌入的預設值，工作目錄有覆寫檔時疊加其內容
    pub fn new() -> Result<Self> {
        let path = Path::new(OVERRIDE_FILE_NAME);
        let overrides = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("無法讀取設定檔: {}", path.display()))?;
            info!("套用設定檔: {}", path.display());
            Some(content)
        } else {
            None
        };

        Self::from_sources(DEFAULT_CONFIG_JSON, overrides.as_deref())
    }

    pub fn from_sources(embedded: &str, overrides: Option<&str>) -> Result<Self> {
        let mut merged: Value =
            serde_json::from_str(embedded).context("無法解析嵌入的預設設定")?;

        if let Some(overrides) = overrides {
            let overrides: Value =
                serde_json::from_str(overrides).context("無法解析設定覆寫檔")?;
            merge_values(&mut merged, overrides);
        }

        let config: Self = serde_json::from_value(merged).context("設定內容格式錯誤")?;
        config.engine.validate()?;
        config.preview.to_settings()?;
        Ok(config)
    }
}

/// 物件逐欄位疊加，其他型別直接取代
fn merge_values(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}
