use super::options::{CompositionOptions, GridFit, ScaleFactor};
use super::plan::{Fill, Geometry, Step};
use super::planner::encode_step;
use crate::tools::Dimensions;

/// 未指定欄數時的自動欄數：ceil(sqrt(n))
#[must_use]
pub fn auto_grid_columns(image_count: usize) -> u32 {
    let mut columns: u32 = 1;
    while (columns as usize) * (columns as usize) < image_count {
        columns += 1;
    }
    columns
}

/// 每格目標尺寸：面積最小的圖片，或所有圖片的平均寬高（無條件捨去）
#[must_use]
pub fn cell_target(dims: &[Dimensions], use_smallest: bool) -> Option<Dimensions> {
    let resolved: Vec<&Dimensions> = dims.iter().filter(|d| d.is_resolved()).collect();
    if resolved.is_empty() {
        return None;
    }

    if use_smallest {
        return resolved.into_iter().min_by_key(|d| d.area()).copied();
    }

    let count = resolved.len() as u64;
    let total_width: u64 = resolved.iter().map(|d| u64::from(d.width)).sum();
    let total_height: u64 = resolved.iter().map(|d| u64::from(d.height)).sum();
    Some(Dimensions::new(
        (total_width / count) as u32,
        (total_height / count) as u32,
    ))
}

pub(super) fn plan_grid(
    dims: &[Dimensions],
    options: &CompositionOptions,
    scale: ScaleFactor,
    steps: &mut Vec<Step>,
) {
    let columns = if options.grid_columns > 0 {
        options.grid_columns
    } else {
        auto_grid_columns(dims.len())
    };

    steps.push(Step::Depth(8));

    if options.grid_fit != GridFit::Original {
        if let Some(target) = cell_target(dims, options.use_smallest) {
            let width = scale.apply(target.width);
            let height = scale.apply(target.height);
            if width > 0 && height > 0 {
                push_fit_steps(options, width, height, steps);
            }
        }
    }

    let background = if options.format.is_opaque_lossy() {
        Fill::White
    } else {
        Fill::Transparent
    };

    steps.push(Step::Tile {
        columns,
        gap: options.spacing,
        background,
    });
    steps.push(encode_step(options, scale, true));
}

fn push_fit_steps(options: &CompositionOptions, width: u32, height: u32, steps: &mut Vec<Step>) {
    match options.grid_fit {
        GridFit::Crop => {
            steps.push(Step::Resize(Geometry::Fill { width, height }));
            steps.push(Step::Extent { width, height });
        }
        GridFit::Scale if options.use_smallest => {
            steps.push(Step::Resize(Geometry::Fit { width, height }));
        }
        GridFit::Scale => {
            steps.push(Step::Resize(Geometry::Exact { width, height }));
        }
        GridFit::Original => {}
    }
}
