//! 合成計畫元件
//!
//! 將圖片清單與選項快照轉為與引擎無關的合成步驟，再序列化為 ImageMagick 參數：
//! - 水平/垂直：統一交叉軸尺寸、間距後串接
//! - 網格：依欄數排列，每格可裁切、縮放或保留原尺寸
//! - 拼貼（ashlar）：在單一畫布上打包不同尺寸的圖片

mod ashlar;
mod grid;
mod linear;
mod magick_args;
mod options;
mod plan;
mod planner;

pub use ashlar::{MIN_AUTO_CANVAS_SIDE, auto_canvas_side};
pub use grid::{auto_grid_columns, cell_target};
pub use linear::PREVIEW_SHRINK_PERCENT;
pub use magick_args::{engine_args, escape_path};
pub use options::{
    CompositionOptions, GridFit, LayoutMode, MAX_BORDER, MAX_QUALITY, MAX_SPACING, MIN_QUALITY,
    OutputFormat, PREVIEW_QUALITY, ScaleFactor,
};
pub use plan::{
    Axis, CompositionPlan, EncodeSpec, Fill, Geometry, OutputTarget, PackSpec, PlanError, Step,
    Tool,
};
pub use planner::{effective_quality, plan};
