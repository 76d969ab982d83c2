use super::options::{LayoutMode, OutputFormat};
use crate::tools::ImageRef;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("至少需要 2 張圖片，目前只有 {count} 張")]
    EmptyInput { count: usize },
}

/// 執行合成的引擎子命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Convert,
    Montage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Transparent,
    White,
}

impl Fill {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transparent => "transparent",
            Self::White => "white",
        }
    }
}

/// 縮放幾何
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    /// 依百分比縮放
    Percent(u32),
    /// 限制寬度，高度依比例
    Width(u32),
    /// 限制高度，寬度依比例
    Height(u32),
    /// 等比縮放至框內
    Fit { width: u32, height: u32 },
    /// 等比縮放至覆蓋整個框（可能超出一邊）
    Fill { width: u32, height: u32 },
    /// 不等比拉伸至精確尺寸
    Exact { width: u32, height: u32 },
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(percent) => write!(f, "{percent}%"),
            Self::Width(width) => write!(f, "{width}x"),
            Self::Height(height) => write!(f, "x{height}"),
            Self::Fit { width, height } => write!(f, "{width}x{height}"),
            Self::Fill { width, height } => write!(f, "{width}x{height}^"),
            Self::Exact { width, height } => write!(f, "{width}x{height}!"),
        }
    }
}

/// 拼貼（ashlar）打包參數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSpec {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub border: u32,
    /// 使用者邊框為 0 時改用 1px 透明接縫
    pub seam_fill: Option<Fill>,
    pub best_fit: bool,
    pub show_labels: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSpec {
    pub format: OutputFormat,
    pub quality: u8,
    /// 輸出前移除透明通道
    pub flatten_alpha: bool,
}

/// 合成步驟，依序交給引擎執行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Depth(u8),
    Resize(Geometry),
    /// 置中裁切到精確尺寸
    Extent { width: u32, height: u32 },
    Pad { size: u32, fill: Fill },
    Append(Axis),
    Tile {
        columns: u32,
        gap: u32,
        background: Fill,
    },
    Pack(PackSpec),
    EncodeAs(EncodeSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// 最終輸出檔案
    File(PathBuf),
    /// 預覽用暫存檔，顯示後即刪除
    Probe(PathBuf),
}

impl OutputTarget {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Probe(path) => path,
        }
    }
}

/// 與引擎無關的合成計畫，建立後不可變更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionPlan {
    pub(super) mode: LayoutMode,
    pub(super) tool: Tool,
    pub(super) inputs: Vec<ImageRef>,
    pub(super) steps: Vec<Step>,
    pub(super) output: OutputTarget,
}

impl CompositionPlan {
    #[must_use]
    pub const fn mode(&self) -> LayoutMode {
        self.mode
    }

    #[must_use]
    pub const fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn inputs(&self) -> &[ImageRef] {
        &self.inputs
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub const fn output(&self) -> &OutputTarget {
        &self.output
    }

    /// 打包步驟（只有拼貼模式會有）
    #[must_use]
    pub fn pack_spec(&self) -> Option<&PackSpec> {
        self.steps.iter().find_map(|step| match step {
            Step::Pack(spec) => Some(spec),
            _ => None,
        })
    }

    #[must_use]
    pub fn encode_spec(&self) -> Option<&EncodeSpec> {
        self.steps.iter().find_map(|step| match step {
            Step::EncodeAs(spec) => Some(spec),
            _ => None,
        })
    }
}
