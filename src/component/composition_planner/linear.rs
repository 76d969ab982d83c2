use super::options::{CompositionOptions, ScaleFactor};
use super::plan::{Axis, Fill, Geometry, Step};
use super::planner::encode_step;
use crate::tools::Dimensions;

/// 預覽時先將輸入縮小到此百分比，再套用統一尺寸
pub const PREVIEW_SHRINK_PERCENT: u32 = 25;

/// 水平或垂直串接
pub(super) fn plan_linear(
    axis: Axis,
    dims: &[Dimensions],
    options: &CompositionOptions,
    scale: ScaleFactor,
    steps: &mut Vec<Step>,
) {
    let match_resize = options
        .match_size
        .then(|| match_geometry(axis, dims, options.match_smallest, scale))
        .flatten();

    if scale.is_reduced() {
        steps.push(Step::Resize(Geometry::Percent(PREVIEW_SHRINK_PERCENT)));
    }
    if let Some(geometry) = match_resize {
        steps.push(Step::Resize(geometry));
    }

    if options.spacing > 0 {
        steps.push(Step::Pad {
            size: options.spacing,
            fill: Fill::Transparent,
        });
    }

    steps.push(Step::Append(axis));
    steps.push(encode_step(options, scale, false));
}

/// 統一交叉軸尺寸：水平串接統一高度，垂直串接統一寬度
fn match_geometry(
    axis: Axis,
    dims: &[Dimensions],
    smallest: bool,
    scale: ScaleFactor,
) -> Option<Geometry> {
    let cross = dims
        .iter()
        .map(|d| match axis {
            Axis::Horizontal => d.height,
            Axis::Vertical => d.width,
        })
        .filter(|&value| value > 0);

    let target = if smallest { cross.min() } else { cross.max() };
    let target = scale.apply(target?);
    if target == 0 {
        return None;
    }

    Some(match axis {
        Axis::Horizontal => Geometry::Height(target),
        Axis::Vertical => Geometry::Width(target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_geometry_ignores_unresolved() {
        let dims = [
            Dimensions::UNRESOLVED,
            Dimensions::new(300, 200),
            Dimensions::new(500, 100),
        ];
        assert_eq!(
            match_geometry(Axis::Horizontal, &dims, true, ScaleFactor::FULL),
            Some(Geometry::Height(100))
        );
        assert_eq!(
            match_geometry(Axis::Vertical, &dims, false, ScaleFactor::PREVIEW),
            Some(Geometry::Width(250))
        );
        assert_eq!(
            match_geometry(Axis::Vertical, &[Dimensions::UNRESOLVED], true, ScaleFactor::FULL),
            None
        );
    }
}
