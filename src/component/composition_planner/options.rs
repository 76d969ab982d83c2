use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_QUALITY: u8 = 50;
pub const MAX_QUALITY: u8 = 100;
pub const MAX_SPACING: u32 = 20;
pub const MAX_BORDER: u32 = 20;

/// 預覽輸出固定使用的品質
pub const PREVIEW_QUALITY: u8 = 85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
    Grid,
    Ashlar,
}

impl LayoutMode {
    pub const ALL: [Self; 4] = [Self::Horizontal, Self::Vertical, Self::Grid, Self::Ashlar];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Grid => "grid",
            Self::Ashlar => "ashlar",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "jpeg")]
    Jpg,
    Png,
    Webp,
    Gif,
}

impl OutputFormat {
    pub const ALL: [Self; 4] = [Self::Jpg, Self::Png, Self::Webp, Self::Gif];

    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    /// 是否支援色度子取樣（只有 JPEG 會輸出品質與取樣參數）
    #[must_use]
    pub const fn has_chroma_subsampling(&self) -> bool {
        matches!(self, Self::Jpg)
    }

    /// 有損且不支援透明通道
    #[must_use]
    pub const fn is_opaque_lossy(&self) -> bool {
        matches!(self, Self::Jpg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 網格模式中每格圖片的尺寸策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridFit {
    #[default]
    Crop,
    Scale,
    Original,
}

impl fmt::Display for GridFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Crop => "crop",
            Self::Scale => "scale",
            Self::Original => "original",
        })
    }
}

/// 合成選項快照
///
/// 建立後不再修改；每次預覽或合併都取得一份完整複本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionOptions {
    pub mode: LayoutMode,
    pub format: OutputFormat,
    pub quality: u8,
    pub spacing: u32,
    /// 0 表示自動
    pub grid_columns: u32,
    pub grid_fit: GridFit,
    pub use_smallest: bool,
    pub match_size: bool,
    pub match_smallest: bool,
    /// 任一邊為 0 表示自動計算畫布
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub border: u32,
    pub normalize_size: bool,
    /// 0 表示不正規化
    pub target_size: u32,
    pub best_fit: bool,
    pub show_labels: bool,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Horizontal,
            format: OutputFormat::Jpg,
            quality: 94,
            spacing: 0,
            grid_columns: 0,
            grid_fit: GridFit::Crop,
            use_smallest: false,
            match_size: false,
            match_smallest: true,
            canvas_width: 0,
            canvas_height: 0,
            border: 0,
            normalize_size: false,
            target_size: 800,
            best_fit: false,
            show_labels: false,
        }
    }
}

impl CompositionOptions {
    /// 將數值限制在允許範圍內
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            quality: self.quality.clamp(MIN_QUALITY, MAX_QUALITY),
            spacing: self.spacing.min(MAX_SPACING),
            border: self.border.min(MAX_BORDER),
            ..self.clone()
        }
    }
}

/// 像素尺寸縮放倍率，保證落在 (0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const FULL: Self = Self(1.0);
    pub const PREVIEW: Self = Self(0.5);

    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value > 0.0 && value <= 1.0).then_some(Self(value))
    }

    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_reduced(&self) -> bool {
        self.0 < 1.0
    }

    /// 縮放後無條件捨去
    #[must_use]
    pub fn apply(&self, pixels: u32) -> u32 {
        (f64::from(pixels) * self.0) as u32
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::FULL
    }
}
