use super::output_naming::merged_output_path;
use crate::component::composition_planner::{
    CompositionOptions, OutputTarget, ScaleFactor, engine_args, plan,
};
use crate::tools::{Engine, EngineError, ImageRef, resolve_dimensions};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// 合併結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub output_path: PathBuf,
    pub image_count: usize,
    /// 無法讀取尺寸的圖片數量
    pub unresolved: usize,
}

/// 以完整解析度合併圖片並寫到第一張圖片旁
pub struct ImageMerger<E: Engine> {
    engine: Arc<E>,
    timeout: Duration,
}

impl<E: Engine> ImageMerger<E> {
    pub const fn new(engine: Arc<E>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    pub fn merge(&self, images: &[ImageRef], options: &CompositionOptions) -> Result<MergeOutcome> {
        self.merge_at(images, options, Local::now().naive_local())
    }

    pub fn merge_at(
        &self,
        images: &[ImageRef],
        options: &CompositionOptions,
        timestamp: NaiveDateTime,
    ) -> Result<MergeOutcome> {
        let output_path = merged_output_path(images, options.mode, options.format, timestamp)
            .context("沒有可合併的圖片")?;

        let dims = resolve_dimensions(images);
        let unresolved = dims.iter().filter(|d| !d.is_resolved()).count();
        if unresolved > 0 {
            warn!("{unresolved} 張圖片無法讀取尺寸，仍交由影像引擎處理");
        }

        let plan = plan(
            images,
            &dims,
            options,
            ScaleFactor::FULL,
            OutputTarget::File(output_path.clone()),
        )?;

        info!(
            "合併 {} 張圖片 ({}) -> {}",
            images.len(),
            options.mode,
            output_path.display()
        );

        let result = self
            .engine
            .invoke(&engine_args(plan), self.timeout)
            .map_err(anyhow::Error::from)
            .and_then(|exit| {
                if exit.success() {
                    Ok(())
                } else {
                    Err(anyhow::Error::from(EngineError::from_exit(&exit))
                        .context(format!("ImageMagick 錯誤: {}", exit.stderr.trim())))
                }
            });

        if let Err(e) = result {
            remove_partial_output(&output_path);
            return Err(e.context("合併圖片失敗"));
        }

        if !output_path.exists() {
            anyhow::bail!("輸出檔案未建立: {}", output_path.display());
        }

        info!("合併完成: {}", output_path.display());
        Ok(MergeOutcome {
            output_path,
            image_count: images.len(),
            unresolved,
        })
    }
}

fn remove_partial_output(path: &std::path::Path) {
    if path.exists() {
        match fs::remove_file(path) {
            Ok(()) => info!("已刪除失敗的輸出檔案: {}", path.display()),
            Err(e) => warn!("無法刪除失敗的輸出檔案 {}: {e}", path.display()),
        }
    }
}
