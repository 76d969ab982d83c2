use super::options::{CompositionOptions, ScaleFactor};
use super::plan::{Fill, Geometry, PackSpec, Step};
use super::planner::encode_step;
use crate::tools::Dimensions;

/// 自動畫布的最小邊長
pub const MIN_AUTO_CANVAS_SIDE: u32 = 1000;

/// 自動正方形畫布邊長：max(sqrt(總面積 × 1.5), 1000, 最大寬度 × 1.2)，無條件捨去
#[must_use]
pub fn auto_canvas_side(dims: &[Dimensions]) -> u32 {
    let total_area: u64 = dims.iter().map(Dimensions::area).sum();
    let max_width = dims.iter().map(|d| d.width).max().unwrap_or(0);

    let by_area = ((total_area as f64) * 1.5).sqrt() as u32;
    let by_width = (f64::from(max_width) * 1.2) as u32;
    by_area.max(MIN_AUTO_CANVAS_SIDE).max(by_width)
}

pub(super) fn plan_ashlar(
    dims: &[Dimensions],
    options: &CompositionOptions,
    scale: ScaleFactor,
    steps: &mut Vec<Step>,
) {
    let (canvas_width, canvas_height) = if options.canvas_width == 0 || options.canvas_height == 0
    {
        let side = auto_canvas_side(dims);
        (side, side)
    } else {
        (options.canvas_width, options.canvas_height)
    };

    steps.push(Step::Depth(8));

    if options.normalize_size && options.target_size > 0 {
        let target = scale.apply(options.target_size);
        if target > 0 {
            steps.push(Step::Resize(Geometry::Fit {
                width: target,
                height: target,
            }));
        }
    }

    // 打包器需要非零接縫，0 視為 1px 透明接縫
    let (border, seam_fill) = match options.border {
        0 => (1, Some(Fill::Transparent)),
        border => (border, None),
    };

    steps.push(Step::Pack(PackSpec {
        canvas_width: scale.apply(canvas_width).max(1),
        canvas_height: scale.apply(canvas_height).max(1),
        border,
        seam_fill,
        best_fit: options.best_fit,
        show_labels: options.show_labels,
    }));
    steps.push(encode_step(options, scale, false));
}
