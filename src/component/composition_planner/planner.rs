use super::ashlar::plan_ashlar;
use super::grid::plan_grid;
use super::linear::plan_linear;
use super::options::{CompositionOptions, LayoutMode, PREVIEW_QUALITY, ScaleFactor};
use super::plan::{Axis, CompositionPlan, EncodeSpec, OutputTarget, PlanError, Step, Tool};
use crate::tools::{Dimensions, ImageRef};
use log::debug;

/// 建立合成計畫
///
/// 純函式：只依據傳入的圖片、尺寸與選項快照產生步驟，不讀取任何檔案。
/// `dims` 與 `images` 依索引對應，缺少的項目視為無法解析。
/// `scale` 小於 1 時為低解析度預覽：所有像素目標乘上倍率，品質固定為 85。
pub fn plan(
    images: &[ImageRef],
    dims: &[Dimensions],
    options: &CompositionOptions,
    scale: ScaleFactor,
    output: OutputTarget,
) -> Result<CompositionPlan, PlanError> {
    if images.len() < 2 {
        return Err(PlanError::EmptyInput {
            count: images.len(),
        });
    }

    let options = options.sanitized();
    let dims: Vec<Dimensions> = (0..images.len())
        .map(|i| dims.get(i).copied().unwrap_or(Dimensions::UNRESOLVED))
        .collect();

    let unresolved = dims.iter().filter(|d| !d.is_resolved()).count();
    if unresolved > 0 {
        debug!("{unresolved} 張圖片尺寸無法解析，不列入尺寸統計");
    }

    let mut steps = Vec::new();
    let tool = match options.mode {
        LayoutMode::Horizontal => {
            plan_linear(Axis::Horizontal, &dims, &options, scale, &mut steps);
            Tool::Convert
        }
        LayoutMode::Vertical => {
            plan_linear(Axis::Vertical, &dims, &options, scale, &mut steps);
            Tool::Convert
        }
        LayoutMode::Grid => {
            plan_grid(&dims, &options, scale, &mut steps);
            Tool::Montage
        }
        LayoutMode::Ashlar => {
            plan_ashlar(&dims, &options, scale, &mut steps);
            Tool::Convert
        }
    };

    debug!(
        "建立 {} 合成計畫: {} 張圖片, {} 個步驟, 倍率 {}",
        options.mode,
        images.len(),
        steps.len(),
        scale.get()
    );

    Ok(CompositionPlan {
        mode: options.mode,
        tool,
        inputs: images.to_vec(),
        steps,
        output,
    })
}

/// 預覽時品質固定，避免使用者設定影響預覽速度
#[must_use]
pub fn effective_quality(options: &CompositionOptions, scale: ScaleFactor) -> u8 {
    if scale.is_reduced() {
        PREVIEW_QUALITY
    } else {
        options.quality
    }
}

pub(super) fn encode_step(
    options: &CompositionOptions,
    scale: ScaleFactor,
    flatten_alpha: bool,
) -> Step {
    Step::EncodeAs(EncodeSpec {
        format: options.format,
        quality: effective_quality(options, scale),
        flatten_alpha,
    })
}
